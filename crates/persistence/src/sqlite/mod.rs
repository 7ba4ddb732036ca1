//! SQLite persistence module
//!
//! Repository pattern cho SQLite database access. Mọi repo nhận một
//! `sqlx::Executor`, nên cùng một hàm chạy được trên pool hoặc bên trong
//! một `sqlx::Transaction`.

pub mod repos;
pub mod schema;

pub use repos::{
    connect, run_migrations, AccountRepo, BeneficiaryRepo, BranchRepo, CredentialRepo,
    CustomerRepo, LoanRepo, TransactionRepo,
};
pub use schema::{
    AccountRow, BeneficiaryRow, BranchRow, CustomerRow, LoanRow, LoginRow, NewTransaction,
    TransactionRow,
};
