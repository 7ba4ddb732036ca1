//! # iBank Core
//!
//! Domain types cho retail banking ledger: tiền tệ fixed-point, tài khoản,
//! giao dịch, khoản vay, người thụ hưởng và state machine khóa đăng nhập.
//!
//! Crate này không biết gì về storage; mọi kiểu ở đây là giá trị thuần.

pub mod account;
pub mod beneficiary;
pub mod customer;
pub mod error;
pub mod loan;
pub mod lockout;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountType};
pub use beneficiary::{Beneficiary, NewBeneficiary};
pub use customer::{Branch, Customer};
pub use error::{CoreError, CoreResult};
pub use loan::{Loan, LoanApplication, LoanStatus};
pub use lockout::{LockoutPolicy, LockoutState};
pub use money::{Amount, InterestRate};
pub use transaction::{Transaction, TransactionType};
