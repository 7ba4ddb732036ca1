//! Configuration
//!
//! `BankConfig` đọc từ environment variables, giá trị không hợp lệ thì
//! dùng default.

use ibank_core::lockout::{DEFAULT_LOCKOUT_MINUTES, DEFAULT_LOCKOUT_THRESHOLD};
use ibank_core::LockoutPolicy;
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/ibank.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Số lần đăng nhập sai liên tiếp trước khi khóa
    pub lockout_threshold: u32,
    /// Thời gian khóa (phút)
    pub lockout_minutes: i64,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            lockout_threshold: DEFAULT_LOCKOUT_THRESHOLD,
            lockout_minutes: DEFAULT_LOCKOUT_MINUTES,
        }
    }
}

impl BankConfig {
    /// Load config từ environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load config qua một hàm lookup (dùng cho test)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            database_url: lookup("IBANK_DATABASE_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.database_url),
            max_connections: lookup("IBANK_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_connections),
            lockout_threshold: lookup("IBANK_LOCKOUT_THRESHOLD")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.lockout_threshold),
            lockout_minutes: lookup("IBANK_LOCKOUT_MINUTES")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.lockout_minutes),
        }
    }

    /// Override database URL (CLI --db)
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    pub fn lockout_policy(&self) -> LockoutPolicy {
        LockoutPolicy::new(self.lockout_threshold, self.lockout_minutes)
    }
}
