//! Deposit, withdraw, transfer

use anyhow::Result;
use ibank_business::{LedgerService, MovementReceipt, ServiceContext};

use super::{authenticate, Output};
use crate::Identity;

pub async fn deposit(
    ctx: &ServiceContext,
    out: &Output,
    identity: &Identity,
    account_id: i64,
    amount: &str,
    note: &str,
) -> Result<()> {
    let customer = authenticate(ctx, identity).await?;
    let receipt = LedgerService::new(ctx)
        .deposit(customer.id, account_id, amount, note)
        .await?;
    print_receipt(out, "Deposited", &receipt)
}

pub async fn withdraw(
    ctx: &ServiceContext,
    out: &Output,
    identity: &Identity,
    account_id: i64,
    amount: &str,
    note: &str,
) -> Result<()> {
    let customer = authenticate(ctx, identity).await?;
    let receipt = LedgerService::new(ctx)
        .withdraw(customer.id, account_id, amount, note)
        .await?;
    print_receipt(out, "Withdrew", &receipt)
}

pub async fn transfer(
    ctx: &ServiceContext,
    out: &Output,
    identity: &Identity,
    from_account_id: i64,
    to_account_id: i64,
    amount: &str,
    note: &str,
) -> Result<()> {
    let customer = authenticate(ctx, identity).await?;
    let receipt = LedgerService::new(ctx)
        .transfer(customer.id, from_account_id, to_account_id, amount, note)
        .await?;

    if out.is_json() {
        return out.json(&receipt);
    }
    println!(
        "✅ Transferred {} from #{} to #{}",
        receipt.amount, receipt.from_account_id, receipt.to_account_id
    );
    println!("   New balance:  {}", receipt.new_balance);
    println!(
        "   Transactions: #{} / #{}",
        receipt.debit_transaction_id, receipt.credit_transaction_id
    );
    Ok(())
}

fn print_receipt(out: &Output, verb: &str, receipt: &MovementReceipt) -> Result<()> {
    if out.is_json() {
        return out.json(receipt);
    }
    println!("✅ {} {} (account #{})", verb, receipt.amount, receipt.account_id);
    println!("   New balance: {}", receipt.new_balance);
    println!("   Transaction: #{}", receipt.transaction_id);
    Ok(())
}
