//! Money movement: deposit, withdraw, transfer

mod common;

use common::{open_account, register, setup};
use ibank_business::{AccountService, BankError, LedgerService};
use ibank_core::TransactionType;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_withdraw_then_transfer() {
    let (_dir, ctx) = setup().await;
    let alice = register(&ctx, "alice").await;
    let bob = register(&ctx, "bob").await;
    let a = open_account(&ctx, alice, "100.00").await;
    let b = open_account(&ctx, bob, "10.00").await;

    let ledger = LedgerService::new(&ctx);
    let receipt = ledger.withdraw(alice, a, "30.00", "").await.unwrap();
    assert_eq!(receipt.new_balance, dec!(70.00));

    let receipt = ledger.transfer(alice, a, b, "50.00", "rent").await.unwrap();
    assert_eq!(receipt.new_balance, dec!(20.00));
    assert_eq!(receipt.amount, dec!(50.00));

    let accounts = AccountService::new(&ctx);
    assert_eq!(accounts.get_account(alice, a).await.unwrap().balance, dec!(20.00));
    assert_eq!(accounts.get_account(bob, b).await.unwrap().balance, dec!(60.00));

    // Sender: opening + withdraw + transfer leg, newest first
    let history = accounts.list_transactions(alice, a, 50).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].id, receipt.debit_transaction_id);
    assert_eq!(history[0].transaction_type, TransactionType::Transfer);
    assert_eq!(history[0].amount, dec!(50.00));
    assert_eq!(
        history[0].description.as_deref(),
        Some(format!("Transfer to account #{}: rent", b).as_str())
    );

    let history = accounts.list_transactions(bob, b, 50).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, receipt.credit_transaction_id);
    assert_eq!(history[0].transaction_type, TransactionType::Deposit);
    assert_eq!(history[0].amount, dec!(50.00));
}

#[tokio::test]
async fn test_deposit() {
    let (_dir, ctx) = setup().await;
    let alice = register(&ctx, "alice").await;
    let a = open_account(&ctx, alice, "0").await;

    let receipt = LedgerService::new(&ctx)
        .deposit(alice, a, "12.34", "salary")
        .await
        .unwrap();
    assert_eq!(receipt.new_balance, dec!(12.34));

    let history = AccountService::new(&ctx)
        .list_transactions(alice, a, 10)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].description.as_deref(), Some("salary"));
}

#[tokio::test]
async fn test_invalid_amount_has_no_effect() {
    let (_dir, ctx) = setup().await;
    let alice = register(&ctx, "alice").await;
    let a = open_account(&ctx, alice, "100").await;
    let ledger = LedgerService::new(&ctx);

    for bad in ["-5", "0", "abc", "1.005", "79228162514264337593543950335"] {
        let err = ledger.deposit(alice, a, bad, "").await.unwrap_err();
        assert!(matches!(err, BankError::InvalidAmount(_)), "{}: {:?}", bad, err);
    }

    let accounts = AccountService::new(&ctx);
    assert_eq!(accounts.get_account(alice, a).await.unwrap().balance, dec!(100.00));
    assert_eq!(accounts.list_transactions(alice, a, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_insufficient_funds_leaves_no_trace() {
    let (_dir, ctx) = setup().await;
    let alice = register(&ctx, "alice").await;
    let bob = register(&ctx, "bob").await;
    let a = open_account(&ctx, alice, "20.00").await;
    let b = open_account(&ctx, bob, "0").await;
    let ledger = LedgerService::new(&ctx);

    let err = ledger.withdraw(alice, a, "20.01", "").await.unwrap_err();
    assert!(matches!(err, BankError::InsufficientFunds { account_id, .. } if account_id == a));

    let err = ledger.transfer(alice, a, b, "50", "").await.unwrap_err();
    assert!(matches!(err, BankError::InsufficientFunds { .. }));

    let accounts = AccountService::new(&ctx);
    assert_eq!(accounts.get_account(alice, a).await.unwrap().balance, dec!(20.00));
    assert_eq!(accounts.get_account(bob, b).await.unwrap().balance, dec!(0.00));
    assert_eq!(accounts.list_transactions(alice, a, 10).await.unwrap().len(), 1);
    assert!(accounts.list_transactions(bob, b, 10).await.unwrap().is_empty());

    // Withdrawing the exact balance is allowed
    let receipt = ledger.withdraw(alice, a, "20", "").await.unwrap();
    assert_eq!(receipt.new_balance, dec!(0.00));
}

#[tokio::test]
async fn test_transfer_rejections() {
    let (_dir, ctx) = setup().await;
    let alice = register(&ctx, "alice").await;
    let bob = register(&ctx, "bob").await;
    let a = open_account(&ctx, alice, "100").await;
    let b = open_account(&ctx, bob, "0").await;
    let ledger = LedgerService::new(&ctx);

    let err = ledger.transfer(alice, a, a, "10", "").await.unwrap_err();
    assert!(matches!(err, BankError::SameAccountTransfer));

    let err = ledger.transfer(alice, a, 9_999, "10", "").await.unwrap_err();
    assert!(matches!(err, BankError::AccountNotFound(9_999)));

    // Cannot spend from someone else's account
    let err = ledger.transfer(alice, b, a, "10", "").await.unwrap_err();
    assert!(matches!(err, BankError::AccountNotFound(id) if id == b));

    AccountService::new(&ctx)
        .deactivate_account(bob, b)
        .await
        .unwrap();
    let err = ledger.transfer(alice, a, b, "10", "").await.unwrap_err();
    assert!(matches!(err, BankError::RecipientInactive(id) if id == b));

    let account = AccountService::new(&ctx).get_account(alice, a).await.unwrap();
    assert_eq!(account.balance, dec!(100.00));
}

#[tokio::test]
async fn test_inactive_account_rejects_movement() {
    let (_dir, ctx) = setup().await;
    let alice = register(&ctx, "alice").await;
    let a = open_account(&ctx, alice, "100").await;
    AccountService::new(&ctx)
        .deactivate_account(alice, a)
        .await
        .unwrap();

    let ledger = LedgerService::new(&ctx);
    let err = ledger.deposit(alice, a, "10", "").await.unwrap_err();
    assert!(matches!(err, BankError::AccountInactive(_)));
    let err = ledger.withdraw(alice, a, "10", "").await.unwrap_err();
    assert!(matches!(err, BankError::AccountInactive(_)));
}

#[tokio::test]
async fn test_deposit_beyond_max_balance() {
    let (_dir, ctx) = setup().await;
    let alice = register(&ctx, "alice").await;
    let a = open_account(&ctx, alice, "9999999999.99").await;

    let err = LedgerService::new(&ctx)
        .deposit(alice, a, "0.01", "")
        .await
        .unwrap_err();
    assert!(matches!(err, BankError::InvalidAmount(_)));
}

#[tokio::test]
async fn test_out_of_range_amount_is_rejected_everywhere() {
    let (_dir, ctx) = setup().await;
    let alice = register(&ctx, "alice").await;
    let bob = register(&ctx, "bob").await;
    let a = open_account(&ctx, alice, "100").await;
    let b = open_account(&ctx, bob, "0").await;
    let ledger = LedgerService::new(&ctx);
    let huge = "79228162514264337593543950335";

    let err = ledger.withdraw(alice, a, huge, "").await.unwrap_err();
    assert!(matches!(err, BankError::InvalidAmount(_)));
    let err = ledger.transfer(alice, a, b, huge, "").await.unwrap_err();
    assert!(matches!(err, BankError::InvalidAmount(_)));

    let err = AccountService::new(&ctx)
        .create_account(alice, None, "savings", huge)
        .await
        .unwrap_err();
    assert!(matches!(err, BankError::InvalidAmount(_)));

    let accounts = AccountService::new(&ctx);
    assert_eq!(accounts.list_accounts(alice).await.unwrap().len(), 1);
    assert_eq!(accounts.get_account(alice, a).await.unwrap().balance, dec!(100.00));
}

#[tokio::test]
async fn test_failed_credit_rolls_back_debit() {
    let (_dir, ctx) = setup().await;
    let alice = register(&ctx, "alice").await;
    let bob = register(&ctx, "bob").await;
    let a = open_account(&ctx, alice, "100").await;
    // Recipient đã ở balance tối đa: debit thành công, credit không cập nhật dòng nào
    let b = open_account(&ctx, bob, "9999999999.99").await;

    let err = LedgerService::new(&ctx)
        .transfer(alice, a, b, "10", "")
        .await
        .unwrap_err();
    assert!(matches!(err, BankError::InvalidAmount(_)), "{:?}", err);

    let accounts = AccountService::new(&ctx);
    assert_eq!(accounts.get_account(alice, a).await.unwrap().balance, dec!(100.00));
    assert_eq!(accounts.list_transactions(alice, a, 10).await.unwrap().len(), 1);
    assert_eq!(
        accounts.get_account(bob, b).await.unwrap().balance,
        dec!(9999999999.99)
    );
    assert_eq!(accounts.list_transactions(bob, b, 10).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_transfers_conserve_money() {
    let (_dir, ctx) = setup().await;
    let alice = register(&ctx, "alice").await;
    let bob = register(&ctx, "bob").await;
    let a = open_account(&ctx, alice, "100.00").await;
    let b = open_account(&ctx, bob, "0").await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let ctx = ctx.clone();
        handles.push(tokio::spawn(async move {
            LedgerService::new(&ctx).transfer(alice, a, b, "7", "").await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(BankError::InsufficientFunds { .. }) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }
    assert_eq!(succeeded, 14);

    let accounts = AccountService::new(&ctx);
    assert_eq!(accounts.get_account(alice, a).await.unwrap().balance, dec!(2.00));
    assert_eq!(accounts.get_account(bob, b).await.unwrap().balance, dec!(98.00));
    assert_eq!(accounts.list_transactions(bob, b, 50).await.unwrap().len(), 14);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_withdrawals_never_overdraw() {
    let (_dir, ctx) = setup().await;
    let alice = register(&ctx, "alice").await;
    let a = open_account(&ctx, alice, "100.00").await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let ctx = ctx.clone();
        handles.push(tokio::spawn(async move {
            LedgerService::new(&ctx).withdraw(alice, a, "30", "").await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(BankError::InsufficientFunds { .. }) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }
    assert_eq!(succeeded, 3);

    let accounts = AccountService::new(&ctx);
    assert_eq!(accounts.get_account(alice, a).await.unwrap().balance, dec!(10.00));
    let withdrawals = accounts
        .list_transactions(alice, a, 50)
        .await
        .unwrap()
        .into_iter()
        .filter(|t| t.transaction_type == TransactionType::Withdraw)
        .count();
    assert_eq!(withdrawals, 3);
}
