//! # iBank Business
//!
//! Business logic layer - các operation mà presentation layer gọi vào.
//!
//! | Service | Operations |
//! |---------|------------|
//! | [`LedgerService`] | deposit, withdraw, transfer |
//! | [`AuthService`] | register, authenticate, lockout status |
//! | [`AccountService`] | create, list, show, deactivate, history |
//! | [`BeneficiaryService`] | add, list, delete |
//! | [`LoanService`] | apply, list |
//! | [`BranchService`] | create, list |
//!
//! Mọi service mượn một [`ServiceContext`] chứa database handle, clock và
//! lockout policy; không có state toàn cục.

pub mod accounts;
pub mod auth;
pub mod beneficiary;
pub mod branch;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod loan;
pub mod password;
pub mod services;

pub use accounts::AccountService;
pub use auth::AuthService;
pub use beneficiary::BeneficiaryService;
pub use branch::BranchService;
pub use clock::{Clock, MockClock, SystemClock};
pub use config::BankConfig;
pub use error::{BankError, BankResult};
pub use ledger::LedgerService;
pub use loan::LoanService;
pub use services::{MovementReceipt, ServiceContext, TransferReceipt};
