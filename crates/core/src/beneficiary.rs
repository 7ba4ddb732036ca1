//! # Beneficiary Module
//!
//! Saved payees. `account_number` is an external reference, not a link to
//! a ledger account. Each customer may save a given account number once.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

const MAX_NAME_LEN: usize = 100;
const MAX_ACCOUNT_NUMBER_LEN: usize = 20;
const MAX_IFSC_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: i64,
    pub customer_id: i64,
    pub name: String,
    pub account_number: String,
    pub bank_name: String,
    /// Mã định tuyến ngân hàng (IFSC), có thể bỏ trống
    pub ifsc_code: Option<String>,
}

/// Input đã được chuẩn hóa cho AddBeneficiary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBeneficiary {
    pub name: String,
    pub account_number: String,
    pub bank_name: String,
    pub ifsc_code: Option<String>,
}

impl NewBeneficiary {
    /// Trim và validate các field
    pub fn new(
        name: &str,
        account_number: &str,
        bank_name: &str,
        ifsc_code: Option<&str>,
    ) -> CoreResult<Self> {
        let name = required("name", name, MAX_NAME_LEN)?;
        let account_number = required("account_number", account_number, MAX_ACCOUNT_NUMBER_LEN)?;
        let bank_name = required("bank_name", bank_name, MAX_NAME_LEN)?;

        let ifsc_code = match ifsc_code.map(str::trim).filter(|s| !s.is_empty()) {
            Some(code) if code.chars().count() > MAX_IFSC_LEN => {
                return Err(CoreError::validation("ifsc_code", "at most 11 characters"));
            }
            Some(code) => Some(code.to_uppercase()),
            None => None,
        };

        Ok(Self {
            name,
            account_number,
            bank_name,
            ifsc_code,
        })
    }
}

fn required(field: &str, value: &str, max_len: usize) -> CoreResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::validation(field, "must not be empty"));
    }
    if value.chars().count() > max_len {
        return Err(CoreError::validation(
            field,
            &format!("at most {} characters", max_len),
        ));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_beneficiary_trims() {
        let b = NewBeneficiary::new(" Bob ", " ACC123 ", "Acme Bank", Some(" sbin0001 ")).unwrap();
        assert_eq!(b.name, "Bob");
        assert_eq!(b.account_number, "ACC123");
        assert_eq!(b.ifsc_code.as_deref(), Some("SBIN0001"));
    }

    #[test]
    fn test_blank_ifsc_is_none() {
        let b = NewBeneficiary::new("Bob", "ACC123", "Acme Bank", Some("  ")).unwrap();
        assert_eq!(b.ifsc_code, None);
    }

    #[test]
    fn test_rejects_invalid_fields() {
        assert!(NewBeneficiary::new("", "ACC123", "Acme", None).is_err());
        assert!(NewBeneficiary::new("Bob", &"9".repeat(21), "Acme", None).is_err());
        assert!(NewBeneficiary::new("Bob", "ACC123", " ", None).is_err());
        assert!(NewBeneficiary::new("Bob", "ACC123", "Acme", Some("ABCDEFGHIJKL")).is_err());
    }
}
