//! Subcommand handlers

pub mod account;
pub mod beneficiary;
pub mod branch;
pub mod customer;
pub mod loan;
pub mod money;

use anyhow::Result;
use ibank_business::{AuthService, ServiceContext};
use ibank_core::Customer;
use serde::Serialize;

use crate::Identity;

/// Text or JSON output, chosen by `--json`
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

/// Đăng nhập bằng `--username/--password`, trả về customer
pub async fn authenticate(ctx: &ServiceContext, identity: &Identity) -> Result<Customer> {
    let customer = AuthService::new(ctx)
        .authenticate(&identity.username, &identity.password)
        .await?;
    Ok(customer)
}
