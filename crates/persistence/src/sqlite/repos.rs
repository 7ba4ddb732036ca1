//! Repository implementations cho SQLite
//!
//! Các repo là stateless; mỗi hàm nhận một executor (`&SqlitePool` hoặc
//! `&mut *tx`). Các hàm ghi balance đều là một câu UPDATE có điều kiện,
//! trả về balance mới qua `RETURNING`, hoặc `None` khi điều kiện không thỏa.

use chrono::{DateTime, Utc};
use ibank_core::money::MAX_BALANCE_MINOR;
use ibank_core::{AccountType, LoanApplication, LoanStatus, NewBeneficiary};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Executor, Sqlite, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::*;

// ============================================================================
// Branch Repository
// ============================================================================

/// Repository cho branches table
pub struct BranchRepo;

impl BranchRepo {
    /// Thêm branch mới, trả về id
    pub async fn insert<'e, E>(
        executor: E,
        name: &str,
        address: &str,
        contact_number: &str,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result =
            sqlx::query("INSERT INTO branches (name, address, contact_number) VALUES (?, ?, ?)")
                .bind(name)
                .bind(address)
                .bind(contact_number)
                .execute(executor)
                .await?;
        Ok(result.last_insert_rowid())
    }

    /// Lấy branch theo ID
    pub async fn get_by_id<'e, E>(executor: E, id: i64) -> PersistenceResult<BranchRow>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, BranchRow>("SELECT * FROM branches WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Branch", id))
    }

    /// Lấy tất cả branches
    pub async fn get_all<'e, E>(executor: E) -> PersistenceResult<Vec<BranchRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, BranchRow>("SELECT * FROM branches ORDER BY name")
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }
}

// ============================================================================
// Credential Repository
// ============================================================================

/// Repository cho credentials table
pub struct CredentialRepo;

impl CredentialRepo {
    /// Thêm credential mới. Username trùng trả về `UniqueViolation`.
    pub async fn insert<'e, E>(
        executor: E,
        username: &str,
        password_hash: &str,
        salt: &str,
        created_at: DateTime<Utc>,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "INSERT INTO credentials (username, password_hash, salt, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(salt)
        .bind(created_at)
        .execute(executor)
        .await
        .map_err(|e| PersistenceError::from_write(e, "credentials.username"))?;
        Ok(result.last_insert_rowid())
    }

    /// Kiểm tra username đã tồn tại chưa
    pub async fn username_exists<'e, E>(executor: E, username: &str) -> PersistenceResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM credentials WHERE username = ?")
            .bind(username)
            .fetch_one(executor)
            .await?;
        Ok(row.0 > 0)
    }
}

// ============================================================================
// Customer Repository
// ============================================================================

const CUSTOMER_SELECT: &str = r#"
    SELECT c.id, c.credential_id, cr.username, c.phone, c.address,
           c.failed_attempts, c.locked_until, c.created_at
    FROM customers c
    JOIN credentials cr ON cr.id = c.credential_id
"#;

/// Repository cho customers table
pub struct CustomerRepo;

impl CustomerRepo {
    /// Thêm customer mới với failed_attempts = 0, không bị khóa
    pub async fn insert<'e, E>(
        executor: E,
        credential_id: i64,
        phone: &str,
        address: &str,
        created_at: DateTime<Utc>,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO customers (credential_id, phone, address, failed_attempts, locked_until, created_at)
            VALUES (?, ?, ?, 0, NULL, ?)
            "#,
        )
        .bind(credential_id)
        .bind(phone)
        .bind(address)
        .bind(created_at)
        .execute(executor)
        .await
        .map_err(|e| PersistenceError::from_write(e, "customers.credential_id"))?;
        Ok(result.last_insert_rowid())
    }

    /// Lấy customer theo ID
    pub async fn get_by_id<'e, E>(executor: E, id: i64) -> PersistenceResult<CustomerRow>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{} WHERE c.id = ?", CUSTOMER_SELECT);
        sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Customer", id))
    }

    /// Lấy thông tin đăng nhập theo username
    pub async fn find_login<'e, E>(executor: E, username: &str) -> PersistenceResult<Option<LoginRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, LoginRow>(
            r#"
            SELECT c.id AS customer_id, cr.username, cr.password_hash, cr.salt,
                   c.failed_attempts, c.locked_until
            FROM credentials cr
            JOIN customers c ON c.credential_id = cr.id
            WHERE cr.username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Reset bộ đếm sau khi đăng nhập thành công
    pub async fn reset_failed_attempts<'e, E>(executor: E, id: i64) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE customers SET failed_attempts = 0, locked_until = NULL WHERE id = ?",
        )
        .bind(id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Customer", id));
        }
        Ok(())
    }

    /// Ghi nhận một lần đăng nhập sai trong một câu UPDATE duy nhất.
    ///
    /// Nếu lần sai này đạt `threshold`, account bị khóa đến `lock_until` và
    /// bộ đếm quay về 0. Không làm gì nếu customer đang bị khóa tại `now`
    /// (trả về `None`); ngược lại trả về `(failed_attempts, locked_until)` mới.
    pub async fn record_failed_attempt<'e, E>(
        executor: E,
        id: i64,
        threshold: u32,
        lock_until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> PersistenceResult<Option<(i64, Option<DateTime<Utc>>)>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let threshold = i64::from(threshold);
        let row = sqlx::query_as::<_, (i64, Option<DateTime<Utc>>)>(
            r#"
            UPDATE customers SET
                failed_attempts = CASE WHEN failed_attempts + 1 >= ? THEN 0
                                       ELSE failed_attempts + 1 END,
                locked_until    = CASE WHEN failed_attempts + 1 >= ? THEN ?
                                       ELSE NULL END
            WHERE id = ? AND (locked_until IS NULL OR locked_until <= ?)
            RETURNING failed_attempts, locked_until
            "#,
        )
        .bind(threshold)
        .bind(threshold)
        .bind(lock_until)
        .bind(id)
        .bind(now)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }
}

// ============================================================================
// Account Repository
// ============================================================================

/// Repository cho accounts table
pub struct AccountRepo;

impl AccountRepo {
    /// Thêm account mới (is_active = true), trả về id
    pub async fn insert<'e, E>(
        executor: E,
        customer_id: i64,
        branch_id: Option<i64>,
        account_type: AccountType,
        balance_minor: i64,
        now: DateTime<Utc>,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (customer_id, branch_id, account_type, balance_minor, created_at, updated_at, is_active)
            VALUES (?, ?, ?, ?, ?, ?, 1)
            "#,
        )
        .bind(customer_id)
        .bind(branch_id)
        .bind(account_type.as_str())
        .bind(balance_minor)
        .bind(now)
        .bind(now)
        .execute(executor)
        .await
        .map_err(|e| PersistenceError::from_write(e, "accounts"))?;
        Ok(result.last_insert_rowid())
    }

    /// Lấy account theo ID
    pub async fn get_by_id<'e, E>(executor: E, id: i64) -> PersistenceResult<AccountRow>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Account", id))
    }

    /// Lấy account theo ID, chỉ khi thuộc về customer
    pub async fn get_owned<'e, E>(
        executor: E,
        id: i64,
        customer_id: i64,
    ) -> PersistenceResult<AccountRow>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = ? AND customer_id = ?")
            .bind(id)
            .bind(customer_id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Account", id))
    }

    /// Lấy tất cả accounts của customer, mới nhất trước
    pub async fn get_by_customer<'e, E>(
        executor: E,
        customer_id: i64,
    ) -> PersistenceResult<Vec<AccountRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT * FROM accounts WHERE customer_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(customer_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Debit (trừ tiền) có điều kiện: account active, thuộc customer và
    /// `balance >= amount`. Trả về balance mới, hoặc `None` nếu không có
    /// row nào thỏa điều kiện.
    pub async fn debit<'e, E>(
        executor: E,
        id: i64,
        customer_id: i64,
        amount_minor: i64,
        now: DateTime<Utc>,
    ) -> PersistenceResult<Option<i64>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let balance = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE accounts
            SET balance_minor = balance_minor - ?, updated_at = ?
            WHERE id = ? AND customer_id = ? AND is_active = 1 AND balance_minor >= ?
            RETURNING balance_minor
            "#,
        )
        .bind(amount_minor)
        .bind(now)
        .bind(id)
        .bind(customer_id)
        .bind(amount_minor)
        .fetch_optional(executor)
        .await?;
        Ok(balance)
    }

    /// Credit (cộng tiền) có điều kiện: account active và balance mới không
    /// vượt quá giới hạn. `owner` giới hạn thêm theo customer (deposit);
    /// `None` cho phía nhận của transfer.
    pub async fn credit<'e, E>(
        executor: E,
        id: i64,
        owner: Option<i64>,
        amount_minor: i64,
        now: DateTime<Utc>,
    ) -> PersistenceResult<Option<i64>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let balance = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE accounts
            SET balance_minor = balance_minor + ?, updated_at = ?
            WHERE id = ? AND (? IS NULL OR customer_id = ?) AND is_active = 1
              AND balance_minor <= ? - ?
            RETURNING balance_minor
            "#,
        )
        .bind(amount_minor)
        .bind(now)
        .bind(id)
        .bind(owner)
        .bind(owner)
        .bind(MAX_BALANCE_MINOR)
        .bind(amount_minor)
        .fetch_optional(executor)
        .await?;
        Ok(balance)
    }

    /// Soft-deactivate. Trả về false nếu account không tồn tại hoặc không
    /// thuộc customer.
    pub async fn deactivate<'e, E>(
        executor: E,
        id: i64,
        customer_id: i64,
        now: DateTime<Utc>,
    ) -> PersistenceResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET is_active = 0,
                updated_at = CASE WHEN is_active = 1 THEN ? ELSE updated_at END
            WHERE id = ? AND customer_id = ?
            "#,
        )
        .bind(now)
        .bind(id)
        .bind(customer_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Transaction Repository
// ============================================================================

/// Repository cho transactions table (append-only)
pub struct TransactionRepo;

impl TransactionRepo {
    /// Thêm transaction mới, trả về id
    pub async fn insert<'e, E>(executor: E, tx: &NewTransaction) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (account_id, transaction_type, amount_minor, timestamp, description)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(tx.account_id)
        .bind(tx.transaction_type.as_str())
        .bind(tx.amount_minor)
        .bind(tx.timestamp)
        .bind(&tx.description)
        .execute(executor)
        .await
        .map_err(|e| PersistenceError::from_write(e, "transactions"))?;
        Ok(result.last_insert_rowid())
    }

    /// Lấy transactions theo account, mới nhất trước
    pub async fn get_by_account<'e, E>(
        executor: E,
        account_id: i64,
        limit: i64,
    ) -> PersistenceResult<Vec<TransactionRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT * FROM transactions
            WHERE account_id = ?
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(account_id)
        .bind(limit)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Lấy transactions trên mọi account của customer, mới nhất trước
    pub async fn get_by_customer<'e, E>(
        executor: E,
        customer_id: i64,
        limit: i64,
    ) -> PersistenceResult<Vec<TransactionRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT t.* FROM transactions t
            JOIN accounts a ON a.id = t.account_id
            WHERE a.customer_id = ?
            ORDER BY t.timestamp DESC, t.id DESC
            LIMIT ?
            "#,
        )
        .bind(customer_id)
        .bind(limit)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Đếm transactions của account
    pub async fn count_by_account<'e, E>(executor: E, account_id: i64) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions WHERE account_id = ?")
            .bind(account_id)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Loan Repository
// ============================================================================

/// Repository cho loans table
pub struct LoanRepo;

impl LoanRepo {
    /// Thêm loan mới với status = pending
    pub async fn insert<'e, E>(
        executor: E,
        customer_id: i64,
        application: &LoanApplication,
        now: DateTime<Utc>,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO loans (customer_id, branch_id, amount_minor, interest_rate_hundredths,
                               start_date, end_date, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(customer_id)
        .bind(application.branch_id)
        .bind(application.amount.to_minor_units())
        .bind(application.interest_rate.to_hundredths())
        .bind(application.start_date)
        .bind(application.end_date)
        .bind(LoanStatus::Pending.as_str())
        .bind(now)
        .execute(executor)
        .await
        .map_err(|e| PersistenceError::from_write(e, "loans"))?;
        Ok(result.last_insert_rowid())
    }

    /// Lấy loan theo ID
    pub async fn get_by_id<'e, E>(executor: E, id: i64) -> PersistenceResult<LoanRow>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, LoanRow>("SELECT * FROM loans WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Loan", id))
    }

    /// Lấy loans của customer, mới nhất trước
    pub async fn get_by_customer<'e, E>(
        executor: E,
        customer_id: i64,
    ) -> PersistenceResult<Vec<LoanRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, LoanRow>(
            "SELECT * FROM loans WHERE customer_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(customer_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}

// ============================================================================
// Beneficiary Repository
// ============================================================================

/// Repository cho beneficiaries table
pub struct BeneficiaryRepo;

impl BeneficiaryRepo {
    /// Kiểm tra cặp (customer_id, account_number) đã tồn tại chưa
    pub async fn exists<'e, E>(
        executor: E,
        customer_id: i64,
        account_number: &str,
    ) -> PersistenceResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM beneficiaries WHERE customer_id = ? AND account_number = ?",
        )
        .bind(customer_id)
        .bind(account_number)
        .fetch_one(executor)
        .await?;
        Ok(row.0 > 0)
    }

    /// Thêm beneficiary. Cặp trùng trả về `UniqueViolation`.
    pub async fn insert<'e, E>(
        executor: E,
        customer_id: i64,
        beneficiary: &NewBeneficiary,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO beneficiaries (customer_id, name, account_number, bank_name, ifsc_code)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(customer_id)
        .bind(&beneficiary.name)
        .bind(&beneficiary.account_number)
        .bind(&beneficiary.bank_name)
        .bind(&beneficiary.ifsc_code)
        .execute(executor)
        .await
        .map_err(|e| PersistenceError::from_write(e, "beneficiaries.customer_id+account_number"))?;
        Ok(result.last_insert_rowid())
    }

    /// Lấy beneficiaries của customer theo tên
    pub async fn get_by_customer<'e, E>(
        executor: E,
        customer_id: i64,
    ) -> PersistenceResult<Vec<BeneficiaryRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, BeneficiaryRow>(
            "SELECT * FROM beneficiaries WHERE customer_id = ? ORDER BY name, id",
        )
        .bind(customer_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Xóa beneficiary của customer. Trả về số row bị xóa.
    pub async fn delete<'e, E>(executor: E, id: i64, customer_id: i64) -> PersistenceResult<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM beneficiaries WHERE id = ? AND customer_id = ?")
            .bind(id)
            .bind(customer_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Khởi tạo connection pool: WAL, busy timeout 5s, foreign keys bật
pub async fn connect(database_url: &str, max_connections: u32) -> PersistenceResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Chạy migrations
pub async fn run_migrations(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}
