//! Branch commands

use anyhow::Result;
use ibank_business::{BranchService, ServiceContext};

use super::Output;
use crate::BranchAction;

/// Handle branch subcommands
pub async fn handle(ctx: &ServiceContext, out: &Output, action: BranchAction) -> Result<()> {
    let service = BranchService::new(ctx);

    match action {
        BranchAction::Add {
            name,
            address,
            contact,
        } => {
            let branch = service.create_branch(&name, &address, &contact).await?;
            if out.is_json() {
                return out.json(&branch);
            }
            println!("✅ Created branch #{} ({})", branch.id, branch.name);
        }
        BranchAction::List => {
            let branches = service.list_branches().await?;
            if out.is_json() {
                return out.json(&branches);
            }
            if branches.is_empty() {
                println!("No branches found.");
                return Ok(());
            }
            println!("{:<6} {:<24} {:<32} {:<15}", "ID", "NAME", "ADDRESS", "CONTACT");
            println!("{}", "-".repeat(80));
            for b in branches {
                println!("{:<6} {:<24} {:<32} {:<15}", b.id, b.name, b.address, b.contact_number);
            }
        }
    }

    Ok(())
}
