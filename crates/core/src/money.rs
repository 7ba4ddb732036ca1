//! # Money Module
//!
//! Fixed-point money cho ledger. Mọi số tiền có tối đa 2 chữ số thập phân
//! và được lưu trong storage dưới dạng minor units (cents, i64), nên phép so
//! sánh `balance >= amount` trong SQL là phép so sánh số nguyên chính xác.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Số chữ số thập phân của mọi số tiền trong ledger.
pub const MONEY_SCALE: u32 = 2;

/// Balance lớn nhất một account có thể giữ, tính bằng cents (NUMERIC(12,2)).
pub const MAX_BALANCE_MINOR: i64 = 999_999_999_999;

/// Số tiền lớn nhất cho một giao dịch hoặc khoản vay, tính bằng cents (NUMERIC(15,2)).
pub const MAX_AMOUNT_MINOR: i64 = 999_999_999_999_999;

/// Lãi suất lớn nhất (exclusive), tính bằng phần trăm (NUMERIC(5,2)).
const MAX_INTEREST_RATE_HUNDREDTHS: i64 = 100_000;

/// A strictly positive money amount with at most two decimal places.
///
/// # Examples
/// ```
/// use ibank_core::Amount;
///
/// let amount = Amount::parse("30.00").unwrap();
/// assert_eq!(amount.to_minor_units(), 3000);
///
/// assert!(Amount::parse("-5").is_err());
/// assert!(Amount::parse("0").is_err());
/// assert!(Amount::parse("1.005").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Tạo Amount từ Decimal, từ chối số <= 0 hoặc quá 2 chữ số thập phân
    pub fn new(value: Decimal) -> CoreResult<Self> {
        if value <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "amount must be positive: {}",
                value
            )));
        }
        let minor = to_minor_units(value)?;
        if minor > MAX_AMOUNT_MINOR {
            return Err(CoreError::InvalidAmount(format!(
                "amount exceeds maximum: {}",
                value
            )));
        }
        Ok(Self(from_minor_units(minor)))
    }

    /// Parse từ decimal string (input từ presentation layer)
    pub fn parse(input: &str) -> CoreResult<Self> {
        let value = Decimal::from_str(input.trim())
            .map_err(|_| CoreError::InvalidAmount(format!("malformed amount: {:?}", input)))?;
        Self::new(value)
    }

    /// Giá trị Decimal (scale 2)
    #[inline]
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Giá trị tính bằng cents
    pub fn to_minor_units(&self) -> i64 {
        // Constructor guarantees scale <= 2 and at most MAX_AMOUNT_MINOR cents
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.to_i64())
            .unwrap_or(MAX_AMOUNT_MINOR)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = CoreError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Đổi Decimal sang cents. Lỗi nếu có nhiều hơn 2 chữ số thập phân.
pub fn to_minor_units(value: Decimal) -> CoreResult<i64> {
    let scaled = value
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| CoreError::InvalidAmount(format!("amount out of range: {}", value)))?;
    if !scaled.fract().is_zero() {
        return Err(CoreError::InvalidAmount(format!(
            "at most {} decimal places allowed: {}",
            MONEY_SCALE, value
        )));
    }
    scaled
        .to_i64()
        .ok_or_else(|| CoreError::InvalidAmount(format!("amount out of range: {}", value)))
}

/// Đổi cents sang Decimal với scale 2
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MONEY_SCALE)
}

/// Validate một balance khởi tạo (>= 0, <= MAX_BALANCE_MINOR), trả về cents.
pub fn opening_balance_minor(value: Decimal) -> CoreResult<i64> {
    if value < Decimal::ZERO {
        return Err(CoreError::InvalidAmount(format!(
            "initial balance cannot be negative: {}",
            value
        )));
    }
    let minor = to_minor_units(value)?;
    if minor > MAX_BALANCE_MINOR {
        return Err(CoreError::InvalidAmount(format!(
            "initial balance exceeds maximum: {}",
            value
        )));
    }
    Ok(minor)
}

/// Annual interest rate in percent, e.g. `7.50` for 7.5%.
///
/// Strictly positive, at most two decimals, below 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct InterestRate(Decimal);

impl InterestRate {
    pub fn new(value: Decimal) -> CoreResult<Self> {
        if value <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "interest rate must be positive: {}",
                value
            )));
        }
        let hundredths = to_minor_units(value)?;
        if hundredths >= MAX_INTEREST_RATE_HUNDREDTHS {
            return Err(CoreError::InvalidAmount(format!(
                "interest rate too large: {}",
                value
            )));
        }
        Ok(Self(from_minor_units(hundredths)))
    }

    pub fn parse(input: &str) -> CoreResult<Self> {
        let value = Decimal::from_str(input.trim()).map_err(|_| {
            CoreError::InvalidAmount(format!("malformed interest rate: {:?}", input))
        })?;
        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Hundredths of a percent, the stored representation.
    pub fn to_hundredths(&self) -> i64 {
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.to_i64())
            .unwrap_or(0)
    }
}

impl fmt::Display for InterestRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<Decimal> for InterestRate {
    type Error = CoreError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InterestRate> for Decimal {
    fn from(rate: InterestRate) -> Self {
        rate.0
    }
}
