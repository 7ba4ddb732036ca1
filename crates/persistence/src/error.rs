//! # Persistence Errors
//!
//! Error types cho persistence layer, wrapping sqlx errors.

use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Database errors ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    // === Conversion errors ===
    #[error("Invalid stored value: {field} = {value}")]
    InvalidStoredValue { field: String, value: String },
}

/// Result type alias cho PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    /// Tạo NotFound error
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Tạo InvalidStoredValue error
    pub fn invalid_value(field: &str, value: impl ToString) -> Self {
        Self::InvalidStoredValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Phân loại lỗi constraint từ sqlx; các lỗi khác giữ nguyên
    pub fn from_write(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::UniqueViolation(what.to_string());
            }
            if db_err.is_foreign_key_violation() {
                return Self::ForeignKeyViolation(what.to_string());
            }
        }
        Self::Database(err)
    }

    /// Kiểm tra có phải lỗi not found không
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Kiểm tra có phải lỗi unique constraint không
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = PersistenceError::not_found("Account", 42);
        assert_eq!(err.to_string(), "Record not found: Account with id 42");
        assert!(err.is_not_found());
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn test_from_write_passes_through_other_errors() {
        let err = PersistenceError::from_write(sqlx::Error::RowNotFound, "beneficiary");
        assert!(matches!(err, PersistenceError::Database(_)));
    }
}
