//! # Loan Module
//!
//! Loans are plain records. Applications are validated and stored as
//! `pending`; there is no approval workflow and no interest accrual.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::money::{Amount, InterestRate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
    Closed,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(LoanStatus::Pending),
            "approved" => Some(LoanStatus::Approved),
            "rejected" => Some(LoanStatus::Rejected),
            "closed" => Some(LoanStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    pub customer_id: i64,
    pub branch_id: Option<i64>,
    pub amount: Decimal,
    pub interest_rate: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LoanStatus,
}

/// Đơn vay đã qua validate, sẵn sàng ghi vào store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanApplication {
    pub branch_id: Option<i64>,
    pub amount: Amount,
    pub interest_rate: InterestRate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl LoanApplication {
    /// Validate đơn vay so với ngày hiện tại `today`.
    ///
    /// `start_date` phải trước `end_date` và không được ở quá khứ.
    pub fn new(
        branch_id: Option<i64>,
        amount: Decimal,
        interest_rate: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
        today: NaiveDate,
    ) -> CoreResult<Self> {
        let amount = Amount::new(amount)?;
        let interest_rate = InterestRate::new(interest_rate)?;

        if start_date >= end_date {
            return Err(CoreError::InvalidDateRange(format!(
                "start date {} must be before end date {}",
                start_date, end_date
            )));
        }
        if start_date < today {
            return Err(CoreError::InvalidDateRange(format!(
                "start date {} is in the past",
                start_date
            )));
        }

        Ok(Self {
            branch_id,
            amount,
            interest_rate,
            start_date,
            end_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_valid_application() {
        let app = LoanApplication::new(
            Some(1),
            dec!(5000),
            dec!(7.25),
            date("2026-02-01"),
            date("2027-02-01"),
            date("2026-01-15"),
        )
        .unwrap();
        assert_eq!(app.amount.to_minor_units(), 500_000);
        assert_eq!(app.interest_rate.to_hundredths(), 725);
    }

    #[test]
    fn test_start_today_is_allowed() {
        let today = date("2026-01-15");
        assert!(
            LoanApplication::new(None, dec!(1), dec!(1), today, date("2026-06-01"), today).is_ok()
        );
    }

    #[test]
    fn test_invalid_dates() {
        let today = date("2026-01-15");
        let err = LoanApplication::new(
            None,
            dec!(1000),
            dec!(5),
            date("2026-03-01"),
            date("2026-03-01"),
            today,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidDateRange(_)));

        let err = LoanApplication::new(
            None,
            dec!(1000),
            dec!(5),
            date("2026-01-14"),
            date("2026-03-01"),
            today,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidDateRange(_)));
    }

    #[test]
    fn test_invalid_amounts() {
        let today = date("2026-01-15");
        let start = date("2026-02-01");
        let end = date("2026-12-01");

        assert!(LoanApplication::new(None, dec!(0), dec!(5), start, end, today)
            .unwrap_err()
            .is_invalid_amount());
        assert!(LoanApplication::new(None, dec!(100), dec!(-1), start, end, today)
            .unwrap_err()
            .is_invalid_amount());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(LoanStatus::from_str("pending"), Some(LoanStatus::Pending));
        assert_eq!(LoanStatus::Closed.to_string(), "closed");
        assert_eq!(LoanStatus::from_str("paid"), None);
    }
}
