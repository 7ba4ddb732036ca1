//! Database schema definitions
//!
//! Row types cho sqlx mapping từ SQLite tables.
//! Schema được định nghĩa trong migrations/20261019000000_init.sql

use chrono::{DateTime, NaiveDate, Utc};
use ibank_core::money::from_minor_units;
use ibank_core::{
    Account, AccountType, Beneficiary, Branch, Customer, Loan, LoanStatus, Transaction,
    TransactionType,
};
use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, PersistenceResult};

/// Row type cho bảng `branches`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct BranchRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub contact_number: String,
}

/// Row type cho `customers` JOIN `credentials`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id: i64,
    pub credential_id: i64,
    pub username: String,
    pub phone: String,
    pub address: String,
    pub failed_attempts: i64,
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Mọi thứ cần cho một lần đăng nhập, đọc trong một query
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LoginRow {
    pub customer_id: i64,
    pub username: String,
    pub password_hash: String,
    pub salt: String,
    pub failed_attempts: i64,
    pub locked_until: Option<DateTime<Utc>>,
}

/// Row type cho bảng `accounts`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: i64,
    pub customer_id: i64,
    pub branch_id: Option<i64>,
    pub account_type: String,
    pub balance_minor: i64, // cents
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Row type cho bảng `transactions`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TransactionRow {
    pub id: i64,
    pub account_id: i64,
    pub transaction_type: String,
    pub amount_minor: i64, // cents
    pub timestamp: DateTime<Utc>,
    pub description: Option<String>,
}

/// Transaction chưa có id, dùng khi insert
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: i64,
    pub transaction_type: TransactionType,
    pub amount_minor: i64,
    pub timestamp: DateTime<Utc>,
    pub description: Option<String>,
}

/// Row type cho bảng `loans`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct LoanRow {
    pub id: i64,
    pub customer_id: i64,
    pub branch_id: Option<i64>,
    pub amount_minor: i64,
    pub interest_rate_hundredths: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Row type cho bảng `beneficiaries`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct BeneficiaryRow {
    pub id: i64,
    pub customer_id: i64,
    pub name: String,
    pub account_number: String,
    pub bank_name: String,
    pub ifsc_code: Option<String>,
}

// === Conversion implementations ===

impl From<BranchRow> for Branch {
    fn from(row: BranchRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            contact_number: row.contact_number,
        }
    }
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            credential_id: row.credential_id,
            username: row.username,
            phone: row.phone,
            address: row.address,
            failed_attempts: u32::try_from(row.failed_attempts).unwrap_or(0),
            locked_until: row.locked_until,
            created_at: row.created_at,
        }
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = PersistenceError;

    fn try_from(row: AccountRow) -> PersistenceResult<Self> {
        let account_type = AccountType::from_str(&row.account_type)
            .ok_or_else(|| PersistenceError::invalid_value("account_type", &row.account_type))?;
        if row.balance_minor < 0 {
            return Err(PersistenceError::invalid_value(
                "balance_minor",
                row.balance_minor,
            ));
        }
        Ok(Self {
            id: row.id,
            customer_id: row.customer_id,
            branch_id: row.branch_id,
            account_type,
            balance: from_minor_units(row.balance_minor),
            created_at: row.created_at,
            updated_at: row.updated_at,
            is_active: row.is_active,
        })
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = PersistenceError;

    fn try_from(row: TransactionRow) -> PersistenceResult<Self> {
        let transaction_type = TransactionType::from_str(&row.transaction_type).ok_or_else(
            || PersistenceError::invalid_value("transaction_type", &row.transaction_type),
        )?;
        Ok(Self {
            id: row.id,
            account_id: row.account_id,
            transaction_type,
            amount: from_minor_units(row.amount_minor),
            timestamp: row.timestamp,
            description: row.description,
        })
    }
}

impl TryFrom<LoanRow> for Loan {
    type Error = PersistenceError;

    fn try_from(row: LoanRow) -> PersistenceResult<Self> {
        let status = LoanStatus::from_str(&row.status)
            .ok_or_else(|| PersistenceError::invalid_value("status", &row.status))?;
        Ok(Self {
            id: row.id,
            customer_id: row.customer_id,
            branch_id: row.branch_id,
            amount: from_minor_units(row.amount_minor),
            interest_rate: from_minor_units(row.interest_rate_hundredths),
            start_date: row.start_date,
            end_date: row.end_date,
            status,
        })
    }
}

impl From<BeneficiaryRow> for Beneficiary {
    fn from(row: BeneficiaryRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            name: row.name,
            account_number: row.account_number,
            bank_name: row.bank_name,
            ifsc_code: row.ifsc_code,
        }
    }
}

/// Convert a batch of rows, failing on the first bad one.
pub fn convert_all<R, T>(rows: Vec<R>) -> PersistenceResult<Vec<T>>
where
    T: TryFrom<R, Error = PersistenceError>,
{
    rows.into_iter().map(T::try_from).collect()
}
