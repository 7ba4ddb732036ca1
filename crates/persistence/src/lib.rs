//! # iBank Persistence
//!
//! Ledger Store cho iBank - SQLite qua sqlx.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Database                          │
//! │  ┌─────────────┐    ┌──────────────┐    ┌─────────────┐  │
//! │  │ SqlitePool  │ -> │ Transaction  │ -> │    Repos    │  │
//! │  │  (handle)   │    │ (atomic unit)│    │  (queries)  │  │
//! │  └─────────────┘    └──────────────┘    └─────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Không có connection toàn cục: `Database` được truyền tường minh vào mọi
//! operation. Một `LedgerTx` rollback khi bị drop mà chưa `commit()`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ibank_persistence::{AccountRepo, Database};
//!
//! let db = Database::open("sqlite:data/ibank.db?mode=rwc", 5).await?;
//!
//! let mut tx = db.begin().await?;
//! let new_balance = AccountRepo::debit(&mut *tx, account_id, customer_id, 3000, now).await?;
//! tx.commit().await?;
//! ```

pub mod error;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use sqlite::schema::convert_all;
pub use sqlite::{
    AccountRepo, AccountRow, BeneficiaryRepo, BeneficiaryRow, BranchRepo, BranchRow,
    CredentialRepo, CustomerRepo, CustomerRow, LoanRepo, LoanRow, LoginRow, NewTransaction,
    TransactionRepo, TransactionRow,
};

use sqlx::{Sqlite, SqlitePool};

/// An open atomic unit against the ledger store.
pub type LedgerTx = sqlx::Transaction<'static, Sqlite>;

/// Database handle - shared by every service, cheap to clone
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Mở database và chạy migrations
    ///
    /// # Arguments
    /// * `db_url` - SQLite database URL (e.g., "sqlite:data/ibank.db?mode=rwc")
    /// * `max_connections` - kích thước pool
    pub async fn open(db_url: &str, max_connections: u32) -> PersistenceResult<Self> {
        let pool = sqlite::connect(db_url, max_connections).await?;
        sqlite::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Get SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bắt đầu một atomic unit
    pub async fn begin(&self) -> PersistenceResult<LedgerTx> {
        Ok(self.pool.begin().await?)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ibank_core::{AccountType, NewBeneficiary, TransactionType};
    use tempfile::TempDir;

    async fn open_temp() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
        let db = Database::open(&url, 4).await.unwrap();
        (dir, db)
    }

    async fn seed_customer(db: &Database, username: &str) -> i64 {
        let now = Utc::now();
        let credential_id = CredentialRepo::insert(db.pool(), username, "hash", "salt", now)
            .await
            .unwrap();
        CustomerRepo::insert(db.pool(), credential_id, "0901", "Hanoi", now)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_conditional_debit() {
        let (_dir, db) = open_temp().await;
        let customer = seed_customer(&db, "alice").await;
        let now = Utc::now();
        let account =
            AccountRepo::insert(db.pool(), customer, None, AccountType::Savings, 10_000, now)
                .await
                .unwrap();

        let balance = AccountRepo::debit(db.pool(), account, customer, 3_000, now)
            .await
            .unwrap();
        assert_eq!(balance, Some(7_000));

        // Không đủ tiền: không row nào bị ảnh hưởng
        let balance = AccountRepo::debit(db.pool(), account, customer, 7_001, now)
            .await
            .unwrap();
        assert_eq!(balance, None);

        // Sai chủ sở hữu
        let balance = AccountRepo::debit(db.pool(), account, customer + 1, 1, now)
            .await
            .unwrap();
        assert_eq!(balance, None);

        let row = AccountRepo::get_by_id(db.pool(), account).await.unwrap();
        assert_eq!(row.balance_minor, 7_000);
    }

    #[tokio::test]
    async fn test_credit_respects_active_flag_and_cap() {
        let (_dir, db) = open_temp().await;
        let customer = seed_customer(&db, "bob").await;
        let now = Utc::now();
        let account =
            AccountRepo::insert(db.pool(), customer, None, AccountType::Current, 0, now)
                .await
                .unwrap();

        let cap = ibank_core::money::MAX_BALANCE_MINOR;
        assert_eq!(
            AccountRepo::credit(db.pool(), account, None, cap, now)
                .await
                .unwrap(),
            Some(cap)
        );
        assert_eq!(
            AccountRepo::credit(db.pool(), account, None, 1, now)
                .await
                .unwrap(),
            None
        );

        assert!(AccountRepo::deactivate(db.pool(), account, customer, now)
            .await
            .unwrap());
        assert_eq!(
            AccountRepo::debit(db.pool(), account, customer, 1, now)
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let (_dir, db) = open_temp().await;
        let customer = seed_customer(&db, "carol").await;
        let now = Utc::now();
        let account =
            AccountRepo::insert(db.pool(), customer, None, AccountType::Savings, 5_000, now)
                .await
                .unwrap();

        {
            let mut tx = db.begin().await.unwrap();
            AccountRepo::debit(&mut *tx, account, customer, 1_000, now)
                .await
                .unwrap();
            TransactionRepo::insert(
                &mut *tx,
                &NewTransaction {
                    account_id: account,
                    transaction_type: TransactionType::Withdraw,
                    amount_minor: 1_000,
                    timestamp: now,
                    description: None,
                },
            )
            .await
            .unwrap();
            // tx dropped without commit
        }

        let row = AccountRepo::get_by_id(db.pool(), account).await.unwrap();
        assert_eq!(row.balance_minor, 5_000);
        assert_eq!(
            TransactionRepo::count_by_account(db.pool(), account)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_record_failed_attempt_locks_at_threshold() {
        let (_dir, db) = open_temp().await;
        let customer = seed_customer(&db, "dave").await;
        let now = Utc::now();
        let until = now + chrono::Duration::minutes(15);

        for expected in 1..=2 {
            let (attempts, locked) =
                CustomerRepo::record_failed_attempt(db.pool(), customer, 3, until, now)
                    .await
                    .unwrap()
                    .unwrap();
            assert_eq!(attempts, expected);
            assert_eq!(locked, None);
        }

        let (attempts, locked) =
            CustomerRepo::record_failed_attempt(db.pool(), customer, 3, until, now)
                .await
                .unwrap()
                .unwrap();
        assert_eq!(attempts, 0);
        assert!(locked.is_some());

        // Đang bị khóa: không cập nhật gì
        let outcome = CustomerRepo::record_failed_attempt(db.pool(), customer, 3, until, now)
            .await
            .unwrap();
        assert!(outcome.is_none());

        CustomerRepo::reset_failed_attempts(db.pool(), customer)
            .await
            .unwrap();
        let row = CustomerRepo::get_by_id(db.pool(), customer).await.unwrap();
        assert_eq!(row.failed_attempts, 0);
        assert_eq!(row.locked_until, None);
        assert_eq!(row.username, "dave");
    }

    #[tokio::test]
    async fn test_beneficiary_unique_constraint() {
        let (_dir, db) = open_temp().await;
        let customer = seed_customer(&db, "erin").await;
        let new = NewBeneficiary::new("Bob", "ACC123", "Acme Bank", None).unwrap();

        BeneficiaryRepo::insert(db.pool(), customer, &new)
            .await
            .unwrap();
        let err = BeneficiaryRepo::insert(db.pool(), customer, &new)
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
        assert!(BeneficiaryRepo::exists(db.pool(), customer, "ACC123")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let (_dir, db) = open_temp().await;
        seed_customer(&db, "frank").await;
        let err = CredentialRepo::insert(db.pool(), "frank", "h", "s", Utc::now())
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }
}
