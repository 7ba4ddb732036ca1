//! Business layer errors
//!
//! Typed failures returned to the presentation layer. Validation errors are
//! raised before the store is touched; anything the store reports becomes
//! `StorageFailure` after the atomic unit has rolled back.

use chrono::{DateTime, Utc};
use ibank_core::CoreError;
use ibank_persistence::PersistenceError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Business operation errors
#[derive(Debug, Error)]
pub enum BankError {
    // === Validation errors ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid account type: {0}")]
    InvalidAccountType(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Cannot transfer to the same account")]
    SameAccountTransfer,

    #[error("Validation error: {0}")]
    Validation(String),

    // === Ledger errors ===
    #[error("Insufficient funds in account {account_id}: requested {requested}")]
    InsufficientFunds { account_id: i64, requested: Decimal },

    #[error("Account not found: {0}")]
    AccountNotFound(i64),

    #[error("Account is inactive: {0}")]
    AccountInactive(i64),

    #[error("Recipient account is inactive: {0}")]
    RecipientInactive(i64),

    // === Record errors ===
    #[error("Beneficiary with account number {account_number} already exists")]
    DuplicateBeneficiary { account_number: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    // === Auth errors ===
    #[error("Account locked until {until}")]
    AccountLocked { until: DateTime<Utc> },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    // === Wrapped errors ===
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] PersistenceError),
}

/// Result type alias for business operations
pub type BankResult<T> = Result<T, BankError>;

impl BankError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn insufficient_funds(account_id: i64, requested: Decimal) -> Self {
        Self::InsufficientFunds {
            account_id,
            requested,
        }
    }

    /// Lỗi do input, phát hiện trước khi chạm vào store
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidAccountType(_)
                | Self::InvalidDateRange(_)
                | Self::SameAccountTransfer
                | Self::Validation(_)
        )
    }

    /// Lỗi xác thực (sai mật khẩu hoặc đang bị khóa)
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AccountLocked { .. } | Self::InvalidCredentials)
    }
}

impl From<CoreError> for BankError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAmount(msg) => Self::InvalidAmount(msg),
            CoreError::InvalidAccountType(value) => Self::InvalidAccountType(value),
            CoreError::InvalidDateRange(msg) => Self::InvalidDateRange(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for BankError {
    fn from(err: sqlx::Error) -> Self {
        Self::StorageFailure(PersistenceError::Database(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_funds_error() {
        let err = BankError::insufficient_funds(7, dec!(30.00));
        assert_eq!(
            err.to_string(),
            "Insufficient funds in account 7: requested 30.00"
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn test_core_error_mapping() {
        let err: BankError = CoreError::InvalidAmount("-5".to_string()).into();
        assert!(matches!(err, BankError::InvalidAmount(_)));
        assert!(err.is_validation());

        let err: BankError = CoreError::validation("phone", "must not be empty").into();
        assert!(matches!(err, BankError::Validation(_)));
    }

    #[test]
    fn test_persistence_error_is_storage_failure() {
        let err: BankError = PersistenceError::not_found("Account", 1).into();
        assert!(matches!(err, BankError::StorageFailure(_)));
    }

    #[test]
    fn test_auth_errors() {
        assert!(BankError::InvalidCredentials.is_auth());
        assert!(BankError::AccountLocked { until: Utc::now() }.is_auth());
        assert!(!BankError::SameAccountTransfer.is_auth());
    }
}
