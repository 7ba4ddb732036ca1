//! Loan commands

use anyhow::Result;
use ibank_business::{LoanService, ServiceContext};

use super::{authenticate, Output};
use crate::{Identity, LoanAction};

/// Handle loan subcommands
pub async fn handle(
    ctx: &ServiceContext,
    out: &Output,
    identity: &Identity,
    action: LoanAction,
) -> Result<()> {
    let customer = authenticate(ctx, identity).await?;
    let service = LoanService::new(ctx);

    match action {
        LoanAction::Apply {
            amount,
            rate,
            start,
            end,
            branch,
        } => {
            let loan = service
                .apply_loan(customer.id, branch, &amount, &rate, start, end)
                .await?;
            if out.is_json() {
                return out.json(&loan);
            }
            println!("✅ Loan application #{} submitted ({})", loan.id, loan.status);
            println!("   Amount: {} at {}%", loan.amount, loan.interest_rate);
            println!("   Term:   {} to {}", loan.start_date, loan.end_date);
        }
        LoanAction::List => {
            let loans = service.list_loans(customer.id).await?;
            if out.is_json() {
                return out.json(&loans);
            }
            if loans.is_empty() {
                println!("No loans found.");
                return Ok(());
            }
            println!(
                "{:<6} {:>16} {:>7} {:<10} {:<10} {:<9}",
                "ID", "AMOUNT", "RATE", "START", "END", "STATUS"
            );
            println!("{}", "-".repeat(64));
            for loan in loans {
                println!(
                    "{:<6} {:>16} {:>7} {:<10} {:<10} {:<9}",
                    loan.id,
                    loan.amount,
                    loan.interest_rate,
                    loan.start_date.to_string(),
                    loan.end_date.to_string(),
                    loan.status.as_str()
                );
            }
        }
    }

    Ok(())
}
