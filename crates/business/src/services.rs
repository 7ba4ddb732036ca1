//! Service context and operation results
//!
//! `ServiceContext` là storage handle được truyền tường minh vào mọi service.

use chrono::{DateTime, NaiveDate, Utc};
use ibank_core::LockoutPolicy;
use ibank_persistence::{Database, LedgerTx};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::BankConfig;
use crate::error::BankResult;

/// Context for business operations - database, clock and lockout policy
#[derive(Clone)]
pub struct ServiceContext {
    db: Database,
    clock: Arc<dyn Clock>,
    lockout: LockoutPolicy,
}

impl ServiceContext {
    /// Create service context from an open database
    pub fn new(db: Database, config: &BankConfig) -> Self {
        Self {
            db,
            clock: Arc::new(SystemClock),
            lockout: config.lockout_policy(),
        }
    }

    /// Open the database named by the config and run migrations
    pub async fn connect(config: &BankConfig) -> BankResult<Self> {
        let db = Database::open(&config.database_url, config.max_connections).await?;
        Ok(Self::new(db, config))
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Get database pool
    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    /// Bắt đầu một atomic unit
    pub async fn begin(&self) -> BankResult<LedgerTx> {
        Ok(self.db.begin().await?)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn lockout_policy(&self) -> LockoutPolicy {
        self.lockout
    }
}

/// Result of a committed deposit or withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementReceipt {
    pub transaction_id: i64,
    pub account_id: i64,
    pub amount: Decimal,
    pub new_balance: Decimal,
}

/// Result of a committed transfer, as seen by the sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    pub debit_transaction_id: i64,
    pub credit_transaction_id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: Decimal,
    /// Balance mới của account gửi
    pub new_balance: Decimal,
}
