use rust_decimal::{Decimal, RoundingStrategy};

/// `$1,234.56`; negative amounts render as `-$12.00`.
pub fn format_currency(amount: Decimal) -> String {
    let mut cents = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    cents.rescale(2);
    let sign = if amount.is_sign_negative() && !cents.is_zero() { "-" } else { "" };

    let text = cents.to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{fraction}", group_thousands(whole))
}

/// One decimal place, e.g. `60.0%`
pub fn format_percent(percent: Decimal) -> String {
    let mut rounded = percent.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    format!("{rounded}%")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_currency_grouping() {
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
        assert_eq!(format_currency(dec("80")), "$80.00");
        assert_eq!(format_currency(dec("1234.56")), "$1,234.56");
        assert_eq!(format_currency(dec("1000000")), "$1,000,000.00");
        assert_eq!(format_currency(dec("999.999")), "$1,000.00");
    }

    #[test]
    fn test_currency_beyond_u64() {
        assert_eq!(
            format_currency(dec("123456789012345678901.5")),
            "$123,456,789,012,345,678,901.50"
        );
    }

    #[test]
    fn test_currency_rounds_half_cents_away_from_zero() {
        assert_eq!(format_currency(dec("2.345")), "$2.35");
        assert_eq!(format_currency(dec("2.335")), "$2.34");
        assert_eq!(format_currency(dec("0.1") + dec("0.2")), "$0.30");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(format_currency(dec("-12")), "-$12.00");
        assert_eq!(format_currency(dec("-0.001")), "$0.00");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(dec("60")), "60.0%");
        assert_eq!(format_percent(dec("33.333")), "33.3%");
        assert_eq!(format_percent(dec("92.59")), "92.6%");
    }
}
