//! Customer registration and login lockout
//!
//! `authenticate` áp dụng state machine trong [`ibank_core::lockout`]: khi
//! đang bị khóa thì không kiểm tra mật khẩu; lần sai thứ `threshold` khóa
//! account trong `window`. Bộ đếm được tăng bằng một câu UPDATE duy nhất nên
//! hai lần đăng nhập sai đồng thời không làm mất lần đếm nào.

use ibank_core::customer::{validate_contact, validate_password, validate_username};
use ibank_core::{Customer, LockoutState};
use ibank_persistence::{CredentialRepo, CustomerRepo};
use tracing::{debug, info, warn};

use crate::error::{BankError, BankResult};
use crate::password::{generate_salt, hash_password, verify_password};
use crate::services::ServiceContext;

/// Auth Service - register, authenticate, lockout status
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Đăng ký customer mới, trả về customer vừa tạo
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        phone: &str,
        address: &str,
    ) -> BankResult<Customer> {
        let username = username.trim();
        validate_username(username)?;
        validate_password(password)?;
        validate_contact(phone, address)?;

        if CredentialRepo::username_exists(self.ctx.pool(), username).await? {
            return Err(BankError::DuplicateUsername(username.to_string()));
        }

        let salt = generate_salt();
        let password_hash = hash_password(password, &salt);
        let now = self.ctx.now();

        let mut tx = self.ctx.begin().await?;
        let credential_id =
            match CredentialRepo::insert(&mut *tx, username, &password_hash, &salt, now).await {
                Ok(id) => id,
                // Lost a race with a concurrent registration
                Err(err) if err.is_unique_violation() => {
                    return Err(BankError::DuplicateUsername(username.to_string()));
                }
                Err(err) => return Err(err.into()),
            };
        let customer_id =
            CustomerRepo::insert(&mut *tx, credential_id, phone.trim(), address.trim(), now)
                .await?;
        tx.commit().await?;

        info!(customer_id, username, "Customer registered");
        self.get_customer(customer_id).await
    }

    /// Đăng nhập.
    ///
    /// Trả về `AccountLocked` khi đang trong cửa sổ khóa (kể cả khi mật khẩu
    /// đúng), `InvalidCredentials` khi username không tồn tại hoặc sai mật khẩu.
    pub async fn authenticate(&self, username: &str, password: &str) -> BankResult<Customer> {
        let Some(login) = CustomerRepo::find_login(self.ctx.pool(), username.trim()).await? else {
            debug!(username, "Login for unknown username");
            return Err(BankError::InvalidCredentials);
        };

        let now = self.ctx.now();
        let failed_attempts = u32::try_from(login.failed_attempts).unwrap_or(0);
        let state = LockoutState::from_record(failed_attempts, login.locked_until, now);
        if let LockoutState::Locked { until } = state {
            warn!(customer_id = login.customer_id, %until, "Login rejected, account locked");
            return Err(BankError::AccountLocked { until });
        }

        if verify_password(password, &login.salt, &login.password_hash) {
            if login.failed_attempts > 0 || login.locked_until.is_some() {
                CustomerRepo::reset_failed_attempts(self.ctx.pool(), login.customer_id).await?;
            }
            info!(customer_id = login.customer_id, "Login succeeded");
            return self.get_customer(login.customer_id).await;
        }

        let policy = self.ctx.lockout_policy();
        let recorded = CustomerRepo::record_failed_attempt(
            self.ctx.pool(),
            login.customer_id,
            policy.threshold,
            policy.lock_until(now),
            now,
        )
        .await?;

        match recorded {
            Some((_, Some(until))) => {
                warn!(customer_id = login.customer_id, %until, "Too many failed logins, account locked");
            }
            Some((failed, None)) => {
                let remaining = policy.remaining_attempts(LockoutState::Unlocked {
                    failed_attempts: u32::try_from(failed).unwrap_or(0),
                });
                debug!(customer_id = login.customer_id, failed, remaining, "Login failed");
            }
            // Another attempt locked the account between our read and write
            None => debug!(customer_id = login.customer_id, "Login failed, already locked"),
        }

        Err(BankError::InvalidCredentials)
    }

    /// Lockout state hiện tại của customer (read-only)
    pub async fn lockout_status(&self, customer_id: i64) -> BankResult<LockoutState> {
        let customer = self.get_customer(customer_id).await?;
        Ok(customer.lockout_state(self.ctx.now()))
    }

    /// Lấy profile customer
    pub async fn get_customer(&self, customer_id: i64) -> BankResult<Customer> {
        match CustomerRepo::get_by_id(self.ctx.pool(), customer_id).await {
            Ok(row) => Ok(row.into()),
            Err(err) if err.is_not_found() => Err(BankError::not_found("Customer", customer_id)),
            Err(err) => Err(err.into()),
        }
    }
}
