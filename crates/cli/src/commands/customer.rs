//! Registration and login

use anyhow::Result;
use ibank_business::{AuthService, ServiceContext};
use serde_json::json;

use super::{authenticate, Output};
use crate::Identity;

pub async fn register(
    ctx: &ServiceContext,
    out: &Output,
    username: &str,
    password: &str,
    phone: &str,
    address: &str,
) -> Result<()> {
    let customer = AuthService::new(ctx)
        .register(username, password, phone, address)
        .await?;

    if out.is_json() {
        return out.json(&customer);
    }
    println!("✅ Registered customer:");
    println!("   Customer ID: {}", customer.id);
    println!("   Username:    {}", customer.username);
    println!("   Phone:       {}", customer.phone);
    Ok(())
}

pub async fn login(ctx: &ServiceContext, out: &Output, identity: &Identity) -> Result<()> {
    let customer = authenticate(ctx, identity).await?;
    let status = AuthService::new(ctx).lockout_status(customer.id).await?;

    if out.is_json() {
        return out.json(&json!({ "customer": customer, "lockout": status }));
    }
    println!("✅ Logged in as {} (customer #{})", customer.username, customer.id);
    println!("   Address: {}", customer.address);
    Ok(())
}
