//! Money and percentages as `Decimal`.
//!
//! SQLite has no decimal column type, so amounts, limits and thresholds are
//! stored as TEXT and summed here rather than with SQL `SUM`.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use validator::ValidationError;

use crate::errors::AppError;

const CENT_DIGITS: u32 = 2;

/// Read a decimal TEXT column.
pub fn decode(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let text: String = row.try_get(column)?;
    parse(&text)
}

pub fn parse(text: &str) -> Result<Decimal, sqlx::Error> {
    Decimal::from_str(text)
        .map_err(|e| sqlx::Error::Decode(format!("Invalid decimal '{text}': {e}").into()))
}

/// Storage form: no trailing zeros, so `50.00` and `50` are kept alike.
pub fn encode(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Sum of stored TEXT amounts without trailing zeros; 0 for no rows.
pub fn sum<I>(values: I) -> Result<Decimal, AppError>
where
    I: IntoIterator<Item = String>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, text| {
            parse(&text)
                .map(|amount| total + amount)
                .map_err(|e| AppError::InternalError(e.to_string()))
        })
        .map(|total| total.normalize())
}

/// Cents, half away from zero, without trailing zeros.
pub fn round_cents(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(CENT_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// `part` as a percentage of `whole`, or 0 when `whole` is not positive.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        part / whole * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

fn has_cents_only(value: &Decimal) -> bool {
    value.normalize().scale() <= CENT_DIGITS
}

/// Transaction amounts: zero or more, whole cents.
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("amount_negative")
            .with_message("Amount cannot be negative".into()));
    }
    if !has_cents_only(value) {
        return Err(ValidationError::new("amount_precision")
            .with_message("Amount can have at most 2 decimal places".into()));
    }
    Ok(())
}

/// Budget limits: more than zero, whole cents.
pub fn validate_limit(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("limit_not_positive")
            .with_message("Limit must be greater than zero".into()));
    }
    if !has_cents_only(value) {
        return Err(ValidationError::new("limit_precision")
            .with_message("Limit can have at most 2 decimal places".into()));
    }
    Ok(())
}

/// Validate that a Decimal is between 0 and 100 (inclusive)
pub fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("percentage_range")
            .with_message("Alert threshold must be between 0 and 100".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_sum_is_exact_on_cents() {
        let total = sum(["0.1", "0.2", "2.2"].map(String::from)).unwrap();
        assert_eq!(total, dec("2.5"));
        assert_eq!(sum(Vec::new()).unwrap(), Decimal::ZERO);
        assert_eq!(sum(["1.5", "1.5"].map(String::from)).unwrap().to_string(), "3");
    }

    #[test]
    fn test_sum_rejects_garbage() {
        assert!(sum(vec!["12".to_string(), "twelve".to_string()]).is_err());
    }

    #[test]
    fn test_encode_drops_trailing_zeros() {
        assert_eq!(encode(dec("50.00")), "50");
        assert_eq!(encode(dec("0.10")), "0.1");
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(dec("2.345")), dec("2.35"));
        assert_eq!(round_cents(dec("92.592592")).to_string(), "92.59");
        assert_eq!(round_cents(dec("60.00")).to_string(), "60");
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec("55"), dec("100")), dec("55"));
        assert_eq!(percent_of(dec("10"), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_amount_rules() {
        assert!(validate_amount(&dec("0")).is_ok());
        assert!(validate_amount(&dec("12.50")).is_ok());
        assert!(validate_amount(&dec("-0.01")).is_err());
        assert!(validate_amount(&dec("1.005")).is_err());
    }

    #[test]
    fn test_limit_and_percentage_rules() {
        assert!(validate_limit(&dec("0")).is_err());
        assert!(validate_limit(&dec("0.01")).is_ok());
        assert!(validate_percentage(&dec("100")).is_ok());
        assert!(validate_percentage(&dec("100.5")).is_err());
    }
}
