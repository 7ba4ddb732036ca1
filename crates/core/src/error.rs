//! # Error Module
//!
//! Domain errors cho iBank, dùng thiserror. Không chứa lỗi infrastructure.

use thiserror::Error;

/// Core domain errors.
///
/// Raised while validating input before anything touches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // === Money errors ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // === Account errors ===
    #[error("Invalid account type: {0}")]
    InvalidAccountType(String),

    // === Loan errors ===
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Invalid loan status: {0}")]
    InvalidLoanStatus(String),

    // === Transaction errors ===
    #[error("Invalid transaction type: {0}")]
    InvalidTransactionType(String),

    // === Validation errors ===
    #[error("Validation error: {field}: {reason}")]
    Validation { field: String, reason: String },
}

/// Result type alias với CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Tạo Validation error cho một field
    pub fn validation(field: &str, reason: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Kiểm tra có phải lỗi amount không
    pub fn is_invalid_amount(&self) -> bool {
        matches!(self, CoreError::InvalidAmount(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidAmount("-5".to_string());
        assert_eq!(err.to_string(), "Invalid amount: -5");

        let err = CoreError::validation("phone", "must not be empty");
        assert_eq!(err.to_string(), "Validation error: phone: must not be empty");
    }

    #[test]
    fn test_error_checks() {
        assert!(CoreError::InvalidAmount("0".to_string()).is_invalid_amount());
        assert!(!CoreError::InvalidAccountType("gold".to_string()).is_invalid_amount());
    }
}
