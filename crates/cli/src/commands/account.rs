//! Account management and history

use anyhow::Result;
use ibank_business::{AccountService, ServiceContext};
use ibank_core::Transaction;

use super::{authenticate, Output};
use crate::{AccountAction, Identity};

/// Handle account subcommands
pub async fn handle(
    ctx: &ServiceContext,
    out: &Output,
    identity: &Identity,
    action: AccountAction,
) -> Result<()> {
    let customer = authenticate(ctx, identity).await?;
    let service = AccountService::new(ctx);

    match action {
        AccountAction::Open {
            r#type,
            branch,
            initial,
        } => {
            let account = service
                .create_account(customer.id, branch, r#type.as_str(), &initial)
                .await?;
            if out.is_json() {
                return out.json(&account);
            }
            println!("✅ Opened {} account:", account.account_type);
            println!("   Account ID: {}", account.id);
            println!("   Balance:    {}", account.balance);
        }
        AccountAction::List => {
            let accounts = service.list_accounts(customer.id).await?;
            if out.is_json() {
                return out.json(&accounts);
            }
            if accounts.is_empty() {
                println!("No accounts found.");
                return Ok(());
            }
            println!("{:<8} {:<10} {:>16} {:<8}", "ID", "TYPE", "BALANCE", "STATUS");
            println!("{}", "-".repeat(46));
            for account in accounts {
                println!(
                    "{:<8} {:<10} {:>16} {:<8}",
                    account.id,
                    account.account_type.as_str(),
                    account.balance,
                    if account.is_active { "active" } else { "closed" }
                );
            }
        }
        AccountAction::Show { account_id } => {
            let account = service.get_account(customer.id, account_id).await?;
            if out.is_json() {
                return out.json(&account);
            }
            println!("{}", account);
            println!("   Opened:  {}", account.created_at.format("%Y-%m-%d %H:%M"));
            println!("   Updated: {}", account.updated_at.format("%Y-%m-%d %H:%M"));
            if let Some(branch_id) = account.branch_id {
                println!("   Branch:  #{}", branch_id);
            }
        }
        AccountAction::Close { account_id } => {
            let account = service.deactivate_account(customer.id, account_id).await?;
            if out.is_json() {
                return out.json(&account);
            }
            println!("✅ Account #{} deactivated", account.id);
        }
    }

    Ok(())
}

/// Lịch sử giao dịch: một account, hoặc mọi account nếu không chỉ định
pub async fn history(
    ctx: &ServiceContext,
    out: &Output,
    identity: &Identity,
    account_id: Option<i64>,
    limit: u32,
) -> Result<()> {
    let customer = authenticate(ctx, identity).await?;
    let service = AccountService::new(ctx);
    let transactions = match account_id {
        Some(id) => service.list_transactions(customer.id, id, limit).await?,
        None => service.recent_transactions(customer.id, limit).await?,
    };

    if out.is_json() {
        return out.json(&transactions);
    }
    print_transactions(&transactions);
    Ok(())
}

fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }
    println!(
        "{:<8} {:<8} {:<17} {:<9} {:>14}  {}",
        "ID", "ACCOUNT", "TIME", "TYPE", "AMOUNT", "DESCRIPTION"
    );
    println!("{}", "-".repeat(80));
    for tx in transactions {
        println!(
            "{:<8} {:<8} {:<17} {:<9} {:>14}  {}",
            tx.id,
            tx.account_id,
            tx.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            tx.transaction_type.as_str(),
            tx.amount,
            tx.description.as_deref().unwrap_or("")
        );
    }
}
