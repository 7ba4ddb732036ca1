//! Beneficiary commands

use anyhow::Result;
use ibank_business::{BeneficiaryService, ServiceContext};
use serde_json::json;

use super::{authenticate, Output};
use crate::{BeneficiaryAction, Identity};

/// Handle beneficiary subcommands
pub async fn handle(
    ctx: &ServiceContext,
    out: &Output,
    identity: &Identity,
    action: BeneficiaryAction,
) -> Result<()> {
    let customer = authenticate(ctx, identity).await?;
    let service = BeneficiaryService::new(ctx);

    match action {
        BeneficiaryAction::Add {
            name,
            account_number,
            bank,
            ifsc,
        } => {
            let id = service
                .add_beneficiary(customer.id, &name, &account_number, &bank, ifsc.as_deref())
                .await?;
            if out.is_json() {
                return out.json(&json!({ "beneficiary_id": id }));
            }
            println!("✅ Saved beneficiary #{} ({})", id, name.trim());
        }
        BeneficiaryAction::List => {
            let beneficiaries = service.list_beneficiaries(customer.id).await?;
            if out.is_json() {
                return out.json(&beneficiaries);
            }
            if beneficiaries.is_empty() {
                println!("No beneficiaries saved.");
                return Ok(());
            }
            println!("{:<6} {:<24} {:<20} {:<20} {:<11}", "ID", "NAME", "ACCOUNT", "BANK", "IFSC");
            println!("{}", "-".repeat(85));
            for b in beneficiaries {
                println!(
                    "{:<6} {:<24} {:<20} {:<20} {:<11}",
                    b.id,
                    b.name,
                    b.account_number,
                    b.bank_name,
                    b.ifsc_code.as_deref().unwrap_or("-")
                );
            }
        }
        BeneficiaryAction::Remove { beneficiary_id } => {
            service
                .delete_beneficiary(customer.id, beneficiary_id)
                .await?;
            if out.is_json() {
                return out.json(&json!({ "deleted": beneficiary_id }));
            }
            println!("🗑️  Removed beneficiary #{}", beneficiary_id);
        }
    }

    Ok(())
}
