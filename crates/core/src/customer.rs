//! # Customer Module
//!
//! Customer profile, branch reference data, and the validation rules for
//! registration input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::lockout::LockoutState;

/// Chi nhánh ngân hàng (reference data, immutable)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub contact_number: String,
}

/// Khách hàng, liên kết 1:1 với một credential đăng nhập
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub credential_id: i64,
    pub username: String,
    pub phone: String,
    pub address: String,
    pub failed_attempts: u32,
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Lockout state tại thời điểm `now`
    pub fn lockout_state(&self, now: DateTime<Utc>) -> LockoutState {
        LockoutState::from_record(self.failed_attempts, self.locked_until, now)
    }
}

const MAX_USERNAME_LEN: usize = 150;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_PHONE_LEN: usize = 15;

/// Username: 1..=150 ký tự, chỉ gồm chữ, số và `@.+-_`
pub fn validate_username(username: &str) -> CoreResult<()> {
    if username.is_empty() {
        return Err(CoreError::validation("username", "must not be empty"));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(CoreError::validation("username", "at most 150 characters"));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || "@.+-_".contains(c);
    if !username.chars().all(allowed) {
        return Err(CoreError::validation(
            "username",
            "only letters, digits and @/./+/-/_ are allowed",
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> CoreResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::validation("password", "at least 8 characters"));
    }
    Ok(())
}

pub fn validate_contact(phone: &str, address: &str) -> CoreResult<()> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(CoreError::validation("phone", "must not be empty"));
    }
    if phone.chars().count() > MAX_PHONE_LEN {
        return Err(CoreError::validation("phone", "at most 15 characters"));
    }
    if address.trim().is_empty() {
        return Err(CoreError::validation("address", "must not be empty"));
    }
    Ok(())
}
