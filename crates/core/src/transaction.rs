//! # Transaction Module
//!
//! Transaction rows are append-only. A transfer is recorded as two legs:
//! the debit leg on the sender (type `transfer`) and the credit leg on the
//! recipient (type `deposit`), each naming the counterpart account.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Loại giao dịch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdraw,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdraw => "withdraw",
            TransactionType::Transfer => "transfer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "deposit" => Some(TransactionType::Deposit),
            "withdraw" => Some(TransactionType::Withdraw),
            "transfer" => Some(TransactionType::Transfer),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub transaction_type: TransactionType,
    /// Luôn > 0
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub description: Option<String>,
}

/// Description cho debit leg của transfer (ghi trên account gửi)
pub fn transfer_debit_description(to_account_id: i64, note: &str) -> String {
    with_note(format!("Transfer to account #{}", to_account_id), note)
}

/// Description cho credit leg của transfer (ghi trên account nhận)
pub fn transfer_credit_description(from_account_id: i64, note: &str) -> String {
    with_note(format!("Transfer from account #{}", from_account_id), note)
}

fn with_note(head: String, note: &str) -> String {
    let note = note.trim();
    if note.is_empty() {
        head
    } else {
        format!("{}: {}", head, note)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} on {}",
            self.transaction_type.as_str().to_uppercase(),
            self.amount,
            self.timestamp.format("%Y-%m-%d %H:%M")
        )
    }
}
