//! Registration and login lockout

mod common;

use chrono::Duration;
use common::{register, setup, setup_with_clock, t0, PASSWORD};
use ibank_business::{AuthService, BankError};
use ibank_core::LockoutState;

#[tokio::test]
async fn test_register_and_login() {
    let (_dir, ctx) = setup().await;
    let id = register(&ctx, "alice").await;

    let auth = AuthService::new(&ctx);
    let customer = auth.authenticate("alice", PASSWORD).await.unwrap();
    assert_eq!(customer.id, id);
    assert_eq!(customer.username, "alice");
    assert_eq!(customer.failed_attempts, 0);
}

#[tokio::test]
async fn test_register_validation() {
    let (_dir, ctx) = setup().await;
    register(&ctx, "alice").await;
    let auth = AuthService::new(&ctx);

    let err = auth
        .register("alice", PASSWORD, "0901", "Hanoi")
        .await
        .unwrap_err();
    assert!(matches!(err, BankError::DuplicateUsername(name) if name == "alice"));

    let err = auth.register("bob", "short", "0901", "Hanoi").await.unwrap_err();
    assert!(err.is_validation());

    let err = auth
        .register("bad name", PASSWORD, "0901", "Hanoi")
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = auth.register("bob", PASSWORD, "", "Hanoi").await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_unknown_username() {
    let (_dir, ctx) = setup().await;
    let err = AuthService::new(&ctx)
        .authenticate("nobody", PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, BankError::InvalidCredentials));
}

#[tokio::test]
async fn test_lockout_after_five_failures() {
    let (_dir, ctx, clock) = setup_with_clock().await;
    let id = register(&ctx, "alice").await;
    let auth = AuthService::new(&ctx);

    for attempt in 1..=4u32 {
        let err = auth.authenticate("alice", "wrong-pass").await.unwrap_err();
        assert!(matches!(err, BankError::InvalidCredentials));
        assert_eq!(
            auth.lockout_status(id).await.unwrap(),
            LockoutState::Unlocked {
                failed_attempts: attempt
            }
        );
    }

    // Fifth failure reports bad credentials and locks
    let err = auth.authenticate("alice", "wrong-pass").await.unwrap_err();
    assert!(matches!(err, BankError::InvalidCredentials));
    let until = t0() + Duration::minutes(15);
    assert_eq!(
        auth.lockout_status(id).await.unwrap(),
        LockoutState::Locked { until }
    );

    // Correct password is refused while locked
    let err = auth.authenticate("alice", PASSWORD).await.unwrap_err();
    assert!(matches!(err, BankError::AccountLocked { until: u } if u == until));

    // Wrong password while locked does not extend the window
    clock.advance(Duration::minutes(10));
    let err = auth.authenticate("alice", "wrong-pass").await.unwrap_err();
    assert!(matches!(err, BankError::AccountLocked { until: u } if u == until));

    // Window elapsed
    clock.advance(Duration::minutes(5));
    assert_eq!(
        auth.lockout_status(id).await.unwrap(),
        LockoutState::unlocked()
    );
    let customer = auth.authenticate("alice", PASSWORD).await.unwrap();
    assert_eq!(customer.id, id);
    assert_eq!(customer.failed_attempts, 0);
    assert_eq!(customer.locked_until, None);
}

#[tokio::test]
async fn test_success_resets_counter() {
    let (_dir, ctx, _clock) = setup_with_clock().await;
    let id = register(&ctx, "alice").await;
    let auth = AuthService::new(&ctx);

    for _ in 0..4 {
        auth.authenticate("alice", "wrong-pass").await.unwrap_err();
    }
    auth.authenticate("alice", PASSWORD).await.unwrap();
    assert_eq!(
        auth.lockout_status(id).await.unwrap(),
        LockoutState::unlocked()
    );

    // Counter starts over: four more failures still do not lock
    for _ in 0..4 {
        auth.authenticate("alice", "wrong-pass").await.unwrap_err();
    }
    assert!(!auth.lockout_status(id).await.unwrap().is_locked());
}

#[tokio::test]
async fn test_lockout_status_unknown_customer() {
    let (_dir, ctx) = setup().await;
    let err = AuthService::new(&ctx).lockout_status(42).await.unwrap_err();
    assert!(matches!(err, BankError::NotFound { entity: "Customer", id: 42 }));
}
