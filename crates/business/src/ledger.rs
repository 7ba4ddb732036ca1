//! Money-movement engine - deposit, withdraw, transfer
//!
//! Every operation validates its input first, then runs exactly one atomic
//! unit against the store. Balance checks are never trusted from an earlier
//! read: the debit itself is an `UPDATE .. WHERE balance >= amount`, and a
//! zero-row result aborts the unit. Dropping the transaction rolls back.

use ibank_core::money::from_minor_units;
use ibank_core::transaction::{transfer_credit_description, transfer_debit_description};
use ibank_core::{Amount, TransactionType};
use ibank_persistence::{AccountRepo, AccountRow, LedgerTx, NewTransaction, TransactionRepo};
use tracing::{debug, info, warn};

use crate::error::{BankError, BankResult};
use crate::services::{MovementReceipt, ServiceContext, TransferReceipt};

/// Ledger Service - handles deposit, withdraw, transfer operations
pub struct LedgerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LedgerService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Deposit vào account của customer
    pub async fn deposit(
        &self,
        customer_id: i64,
        account_id: i64,
        amount: &str,
        description: &str,
    ) -> BankResult<MovementReceipt> {
        let amount = parse_amount(amount)?;

        // Advisory check for a precise error; the guarded UPDATE decides.
        self.load_active_owned(customer_id, account_id).await?;

        let now = self.ctx.now();
        let mut tx = self.ctx.begin().await?;

        let Some(balance) = AccountRepo::credit(
            &mut *tx,
            account_id,
            Some(customer_id),
            amount.to_minor_units(),
            now,
        )
        .await?
        else {
            let err = explain_credit_failure(&mut tx, account_id, Some(customer_id)).await?;
            warn!(account_id, amount = %amount, error = %err, "Deposit rolled back");
            return Err(err);
        };

        let transaction_id = TransactionRepo::insert(
            &mut *tx,
            &NewTransaction {
                account_id,
                transaction_type: TransactionType::Deposit,
                amount_minor: amount.to_minor_units(),
                timestamp: now,
                description: optional_note(description),
            },
        )
        .await?;

        tx.commit().await?;

        let new_balance = from_minor_units(balance);
        info!(account_id, amount = %amount, balance = %new_balance, "Deposit committed");

        Ok(MovementReceipt {
            transaction_id,
            account_id,
            amount: amount.value(),
            new_balance,
        })
    }

    /// Withdraw từ account của customer
    pub async fn withdraw(
        &self,
        customer_id: i64,
        account_id: i64,
        amount: &str,
        description: &str,
    ) -> BankResult<MovementReceipt> {
        let amount = parse_amount(amount)?;

        self.load_active_owned(customer_id, account_id).await?;

        let now = self.ctx.now();
        let mut tx = self.ctx.begin().await?;

        let Some(balance) =
            AccountRepo::debit(&mut *tx, account_id, customer_id, amount.to_minor_units(), now)
                .await?
        else {
            let err = explain_debit_failure(&mut tx, account_id, customer_id, amount).await?;
            warn!(account_id, amount = %amount, error = %err, "Withdrawal rolled back");
            return Err(err);
        };

        let transaction_id = TransactionRepo::insert(
            &mut *tx,
            &NewTransaction {
                account_id,
                transaction_type: TransactionType::Withdraw,
                amount_minor: amount.to_minor_units(),
                timestamp: now,
                description: optional_note(description),
            },
        )
        .await?;

        tx.commit().await?;

        let new_balance = from_minor_units(balance);
        info!(account_id, amount = %amount, balance = %new_balance, "Withdrawal committed");

        Ok(MovementReceipt {
            transaction_id,
            account_id,
            amount: amount.value(),
            new_balance,
        })
    }

    /// Transfer giữa hai account trong cùng ledger.
    ///
    /// Debit sender, credit recipient, ghi hai leg: tất cả trong một atomic
    /// unit. Bất kỳ lỗi nào sau bước debit đều rollback cả khoản trừ.
    pub async fn transfer(
        &self,
        customer_id: i64,
        from_account_id: i64,
        to_account_id: i64,
        amount: &str,
        description: &str,
    ) -> BankResult<TransferReceipt> {
        let amount = parse_amount(amount)?;
        if from_account_id == to_account_id {
            debug!(account_id = from_account_id, "Rejected transfer to same account");
            return Err(BankError::SameAccountTransfer);
        }

        self.load_active_owned(customer_id, from_account_id).await?;
        let recipient = load_account(self.ctx, to_account_id).await?;
        if !recipient.is_active {
            return Err(BankError::RecipientInactive(to_account_id));
        }

        let now = self.ctx.now();
        let minor = amount.to_minor_units();
        let mut tx = self.ctx.begin().await?;

        // (a) debit sender
        let Some(sender_balance) =
            AccountRepo::debit(&mut *tx, from_account_id, customer_id, minor, now).await?
        else {
            let err = explain_debit_failure(&mut tx, from_account_id, customer_id, amount).await?;
            warn!(from_account_id, to_account_id, amount = %amount, error = %err, "Transfer rolled back");
            return Err(err);
        };

        // (b) credit recipient
        if AccountRepo::credit(&mut *tx, to_account_id, None, minor, now)
            .await?
            .is_none()
        {
            let err = match explain_credit_failure(&mut tx, to_account_id, None).await? {
                BankError::AccountInactive(id) => BankError::RecipientInactive(id),
                other => other,
            };
            warn!(from_account_id, to_account_id, amount = %amount, error = %err, "Transfer rolled back");
            return Err(err);
        }

        // (c) both legs
        let debit_transaction_id = TransactionRepo::insert(
            &mut *tx,
            &NewTransaction {
                account_id: from_account_id,
                transaction_type: TransactionType::Transfer,
                amount_minor: minor,
                timestamp: now,
                description: Some(transfer_debit_description(to_account_id, description)),
            },
        )
        .await?;
        let credit_transaction_id = TransactionRepo::insert(
            &mut *tx,
            &NewTransaction {
                account_id: to_account_id,
                transaction_type: TransactionType::Deposit,
                amount_minor: minor,
                timestamp: now,
                description: Some(transfer_credit_description(from_account_id, description)),
            },
        )
        .await?;

        tx.commit().await?;

        let new_balance = from_minor_units(sender_balance);
        info!(
            from_account_id,
            to_account_id,
            amount = %amount,
            balance = %new_balance,
            "Transfer committed"
        );

        Ok(TransferReceipt {
            debit_transaction_id,
            credit_transaction_id,
            from_account_id,
            to_account_id,
            amount: amount.value(),
            new_balance,
        })
    }

    async fn load_active_owned(&self, customer_id: i64, account_id: i64) -> BankResult<AccountRow> {
        let account = load_account(self.ctx, account_id).await?;
        if account.customer_id != customer_id {
            debug!(account_id, customer_id, "Account not owned by caller");
            return Err(BankError::AccountNotFound(account_id));
        }
        if !account.is_active {
            return Err(BankError::AccountInactive(account_id));
        }
        Ok(account)
    }
}

fn parse_amount(input: &str) -> BankResult<Amount> {
    Amount::parse(input).map_err(|err| {
        debug!(input, "Rejected amount");
        BankError::from(err)
    })
}

fn optional_note(description: &str) -> Option<String> {
    let note = description.trim();
    (!note.is_empty()).then(|| note.to_string())
}

async fn load_account(ctx: &ServiceContext, account_id: i64) -> BankResult<AccountRow> {
    match AccountRepo::get_by_id(ctx.pool(), account_id).await {
        Ok(row) => Ok(row),
        Err(err) if err.is_not_found() => Err(BankError::AccountNotFound(account_id)),
        Err(err) => Err(err.into()),
    }
}

/// Vì sao debit có điều kiện không ảnh hưởng row nào (đọc trong cùng tx)
async fn explain_debit_failure(
    tx: &mut LedgerTx,
    account_id: i64,
    customer_id: i64,
    amount: Amount,
) -> BankResult<BankError> {
    let err = match AccountRepo::get_by_id(&mut **tx, account_id).await {
        Ok(row) if row.customer_id != customer_id => BankError::AccountNotFound(account_id),
        Ok(row) if !row.is_active => BankError::AccountInactive(account_id),
        Ok(_) => BankError::insufficient_funds(account_id, amount.value()),
        Err(err) if err.is_not_found() => BankError::AccountNotFound(account_id),
        Err(err) => return Err(err.into()),
    };
    Ok(err)
}

/// Vì sao credit có điều kiện không ảnh hưởng row nào (đọc trong cùng tx)
async fn explain_credit_failure(
    tx: &mut LedgerTx,
    account_id: i64,
    owner: Option<i64>,
) -> BankResult<BankError> {
    let err = match AccountRepo::get_by_id(&mut **tx, account_id).await {
        Ok(row) if owner.is_some_and(|id| id != row.customer_id) => {
            BankError::AccountNotFound(account_id)
        }
        Ok(row) if !row.is_active => BankError::AccountInactive(account_id),
        Ok(_) => BankError::InvalidAmount(format!(
            "credit would exceed the maximum balance of account {}",
            account_id
        )),
        Err(err) if err.is_not_found() => BankError::AccountNotFound(account_id),
        Err(err) => return Err(err.into()),
    };
    Ok(err)
}
