//! # Account Module
//!
//! Định nghĩa AccountType và Account. Balance chỉ được thay đổi bởi
//! money-movement engine; account không bao giờ bị xóa, chỉ bị deactivate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Loại tài khoản
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Tài khoản tiết kiệm
    Savings,
    /// Tài khoản thanh toán
    Current,
}

impl AccountType {
    /// Trả về code string cho DB
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "savings",
            AccountType::Current => "current",
        }
    }

    /// Parse từ string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "savings" => Some(AccountType::Savings),
            "current" => Some(AccountType::Current),
            _ => None,
        }
    }

    /// Parse, failing with `InvalidAccountType` for anything else.
    pub fn parse(s: &str) -> CoreResult<Self> {
        Self::from_str(s).ok_or_else(|| CoreError::InvalidAccountType(s.to_string()))
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A customer's account as read from the ledger store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    /// Customer sở hữu account
    pub customer_id: i64,
    pub branch_id: Option<i64>,
    pub account_type: AccountType,
    /// Balance (scale 2, luôn >= 0 sau mỗi operation đã commit)
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Account {
    /// Kiểm tra account có thuộc về customer không
    pub fn is_owned_by(&self, customer_id: i64) -> bool {
        self.customer_id == customer_id
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account #{} ({}, balance: {}{})",
            self.id,
            self.account_type,
            self.balance,
            if self.is_active { "" } else { ", inactive" }
        )
    }
}
