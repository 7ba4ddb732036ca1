//! Loan applications
//!
//! Đơn vay được validate rồi lưu với status `pending`. Không có workflow
//! duyệt và không tính lãi.

use chrono::NaiveDate;
use ibank_core::{CoreError, Loan, LoanApplication};
use ibank_persistence::{convert_all, LoanRepo};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::info;

use crate::accounts::{ensure_branch, ensure_customer};
use crate::error::BankResult;
use crate::services::ServiceContext;

/// Loan Service - apply, list
pub struct LoanService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LoanService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Nộp đơn vay, trả về loan vừa tạo (status = pending)
    pub async fn apply_loan(
        &self,
        customer_id: i64,
        branch_id: Option<i64>,
        amount: &str,
        interest_rate: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> BankResult<Loan> {
        let amount = parse_decimal("amount", amount)?;
        let interest_rate = parse_decimal("interest rate", interest_rate)?;
        let application = LoanApplication::new(
            branch_id,
            amount,
            interest_rate,
            start_date,
            end_date,
            self.ctx.today(),
        )?;

        ensure_customer(self.ctx, customer_id).await?;
        if let Some(branch_id) = branch_id {
            ensure_branch(self.ctx, branch_id).await?;
        }

        let loan_id = LoanRepo::insert(self.ctx.pool(), customer_id, &application, self.ctx.now())
            .await?;
        let loan = Loan::try_from(LoanRepo::get_by_id(self.ctx.pool(), loan_id).await?)?;

        info!(
            loan_id,
            customer_id,
            amount = %loan.amount,
            start = %loan.start_date,
            end = %loan.end_date,
            "Loan application recorded"
        );
        Ok(loan)
    }

    /// Liệt kê loans của customer, mới nhất trước
    pub async fn list_loans(&self, customer_id: i64) -> BankResult<Vec<Loan>> {
        let rows = LoanRepo::get_by_customer(self.ctx.pool(), customer_id).await?;
        Ok(convert_all(rows)?)
    }
}

fn parse_decimal(what: &str, input: &str) -> Result<Decimal, CoreError> {
    Decimal::from_str(input.trim())
        .map_err(|_| CoreError::InvalidAmount(format!("malformed {}: {:?}", what, input)))
}
