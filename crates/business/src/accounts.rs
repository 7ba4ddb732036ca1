//! Account lifecycle and history
//!
//! Mở account (kèm transaction "Opening balance" nếu balance ban đầu > 0),
//! liệt kê, xem, đóng (soft-deactivate) và lịch sử giao dịch.

use ibank_core::money::opening_balance_minor;
use ibank_core::{Account, AccountType, CoreError, Transaction, TransactionType};
use ibank_persistence::{
    convert_all, AccountRepo, BranchRepo, CustomerRepo, NewTransaction, TransactionRepo,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::{BankError, BankResult};
use crate::services::ServiceContext;

/// Số giao dịch mặc định khi xem lịch sử
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

const OPENING_BALANCE_NOTE: &str = "Opening balance";

/// Account Service - create, list, show, deactivate, history
pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Mở account mới cho customer
    pub async fn create_account(
        &self,
        customer_id: i64,
        branch_id: Option<i64>,
        account_type: &str,
        initial_balance: &str,
    ) -> BankResult<Account> {
        let account_type = AccountType::parse(account_type)?;
        let initial_balance = Decimal::from_str(initial_balance.trim()).map_err(|_| {
            CoreError::InvalidAmount(format!("malformed initial balance: {:?}", initial_balance))
        })?;
        let opening_minor = opening_balance_minor(initial_balance)?;

        ensure_customer(self.ctx, customer_id).await?;
        if let Some(branch_id) = branch_id {
            ensure_branch(self.ctx, branch_id).await?;
        }

        let now = self.ctx.now();
        let mut tx = self.ctx.begin().await?;

        let account_id =
            AccountRepo::insert(&mut *tx, customer_id, branch_id, account_type, opening_minor, now)
                .await?;
        if opening_minor > 0 {
            TransactionRepo::insert(
                &mut *tx,
                &NewTransaction {
                    account_id,
                    transaction_type: TransactionType::Deposit,
                    amount_minor: opening_minor,
                    timestamp: now,
                    description: Some(OPENING_BALANCE_NOTE.to_string()),
                },
            )
            .await?;
        }
        let row = AccountRepo::get_by_id(&mut *tx, account_id).await?;
        tx.commit().await?;

        info!(
            account_id,
            customer_id,
            account_type = %account_type,
            balance = %initial_balance,
            "Account opened"
        );
        Ok(Account::try_from(row)?)
    }

    /// Liệt kê mọi account của customer (kể cả inactive), mới nhất trước
    pub async fn list_accounts(&self, customer_id: i64) -> BankResult<Vec<Account>> {
        let rows = AccountRepo::get_by_customer(self.ctx.pool(), customer_id).await?;
        Ok(convert_all(rows)?)
    }

    /// Xem một account, chỉ khi thuộc về customer
    pub async fn get_account(&self, customer_id: i64, account_id: i64) -> BankResult<Account> {
        match AccountRepo::get_owned(self.ctx.pool(), account_id, customer_id).await {
            Ok(row) => Ok(Account::try_from(row)?),
            Err(err) if err.is_not_found() => Err(BankError::AccountNotFound(account_id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Soft-deactivate account. Gọi lại trên account đã inactive không lỗi.
    pub async fn deactivate_account(
        &self,
        customer_id: i64,
        account_id: i64,
    ) -> BankResult<Account> {
        let now = self.ctx.now();
        let mut tx = self.ctx.begin().await?;
        if !AccountRepo::deactivate(&mut *tx, account_id, customer_id, now).await? {
            return Err(BankError::AccountNotFound(account_id));
        }
        let row = AccountRepo::get_by_id(&mut *tx, account_id).await?;
        tx.commit().await?;

        info!(account_id, customer_id, "Account deactivated");
        Ok(Account::try_from(row)?)
    }

    /// Lịch sử giao dịch của một account, mới nhất trước
    pub async fn list_transactions(
        &self,
        customer_id: i64,
        account_id: i64,
        limit: u32,
    ) -> BankResult<Vec<Transaction>> {
        // Ownership check
        self.get_account(customer_id, account_id).await?;

        let rows =
            TransactionRepo::get_by_account(self.ctx.pool(), account_id, i64::from(limit)).await?;
        debug!(account_id, count = rows.len(), "Loaded transactions");
        Ok(convert_all(rows)?)
    }

    /// Giao dịch gần đây trên mọi account của customer
    pub async fn recent_transactions(
        &self,
        customer_id: i64,
        limit: u32,
    ) -> BankResult<Vec<Transaction>> {
        let rows =
            TransactionRepo::get_by_customer(self.ctx.pool(), customer_id, i64::from(limit))
                .await?;
        Ok(convert_all(rows)?)
    }
}

/// `NotFound` nếu customer không tồn tại
pub(crate) async fn ensure_customer(ctx: &ServiceContext, customer_id: i64) -> BankResult<()> {
    match CustomerRepo::get_by_id(ctx.pool(), customer_id).await {
        Ok(_) => Ok(()),
        Err(err) if err.is_not_found() => Err(BankError::not_found("Customer", customer_id)),
        Err(err) => Err(err.into()),
    }
}

/// `NotFound` nếu branch không tồn tại
pub(crate) async fn ensure_branch(ctx: &ServiceContext, branch_id: i64) -> BankResult<()> {
    match BranchRepo::get_by_id(ctx.pool(), branch_id).await {
        Ok(_) => Ok(()),
        Err(err) if err.is_not_found() => Err(BankError::not_found("Branch", branch_id)),
        Err(err) => Err(err.into()),
    }
}
