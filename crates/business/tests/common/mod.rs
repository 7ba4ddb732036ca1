//! Shared fixtures for business integration tests

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use ibank_business::{AccountService, AuthService, BankConfig, MockClock, ServiceContext};
use std::sync::Arc;
use tempfile::TempDir;

pub const PASSWORD: &str = "s3cret-pass";

/// Fresh database in a temp dir. Keep the `TempDir` alive for the test.
pub async fn setup() -> (TempDir, ServiceContext) {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("ibank.db").display());
    let config = BankConfig::default().with_database_url(url);
    let ctx = ServiceContext::connect(&config).await.unwrap();
    (dir, ctx)
}

/// Same as [`setup`], with time driven by the returned clock
pub async fn setup_with_clock() -> (TempDir, ServiceContext, Arc<MockClock>) {
    let (dir, ctx) = setup().await;
    let clock = Arc::new(MockClock::new(t0()));
    let ctx = ctx.with_clock(clock.clone());
    (dir, ctx, clock)
}

pub fn t0() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-02T09:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub async fn register(ctx: &ServiceContext, username: &str) -> i64 {
    AuthService::new(ctx)
        .register(username, PASSWORD, "0901234567", "12 Hang Bai, Hanoi")
        .await
        .unwrap()
        .id
}

pub async fn open_account(ctx: &ServiceContext, customer_id: i64, initial: &str) -> i64 {
    AccountService::new(ctx)
        .create_account(customer_id, None, "savings", initial)
        .await
        .unwrap()
        .id
}
