//! Minor-unit amounts. All parsing is integer arithmetic; no floats touch money.

use thiserror::Error;

/// Largest amount a form accepts, in cents (one hundred million units)
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000;

/// Amounts above this many cents are highlighted in the list
pub const LARGE_AMOUNT_CENTS: i64 = 100 * 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Please enter an amount")]
    Empty,
    #[error("'{0}' is not a valid amount")]
    InvalidFormat(String),
    #[error("Amounts can have at most two decimal places")]
    TooPrecise,
    #[error("Amount must be greater than zero")]
    NotPositive,
    #[error("Amount is too large")]
    TooLarge,
}

/// Parse user input such as `"12.5"`, `"¥1,234.56"` or `" 3 "` into cents
pub fn parse_amount_to_cents(input: &str) -> Result<i64, AmountError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches(['¥', '$', '￥'])
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(AmountError::Empty);
    }
    if cleaned.starts_with('-') {
        return Err(AmountError::NotPositive);
    }

    let (whole, fraction) = match cleaned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (cleaned.as_str(), ""),
    };

    let invalid = || AmountError::InvalidFormat(input.trim().to_string());
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if fraction.len() > 2 {
        return Err(AmountError::TooPrecise);
    }
    // Anything longer than this cannot fit under the limit anyway
    if whole.len() > 12 {
        return Err(AmountError::TooLarge);
    }

    let units: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };

    let total = units * 100 + cents;
    if total == 0 {
        return Err(AmountError::NotPositive);
    }
    if total > MAX_AMOUNT_CENTS {
        return Err(AmountError::TooLarge);
    }
    Ok(total)
}

/// `123456` -> `"1234.56"`, `-5` -> `"-0.05"`
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Cents as currency units for charts. Display only, never fed back into money.
pub fn cents_to_units(cents: i64) -> f64 {
    cents as f64 / 100.0
}

pub fn is_large_amount(cents: i64) -> bool {
    cents.abs() > LARGE_AMOUNT_CENTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_decorated_amounts() {
        assert_eq!(parse_amount_to_cents("10.50"), Ok(1050));
        assert_eq!(parse_amount_to_cents("10.5"), Ok(1050));
        assert_eq!(parse_amount_to_cents("5"), Ok(500));
        assert_eq!(parse_amount_to_cents(" ¥1,234.56 "), Ok(123456));
        assert_eq!(parse_amount_to_cents("$0.01"), Ok(1));
        assert_eq!(parse_amount_to_cents(".75"), Ok(75));
        assert_eq!(parse_amount_to_cents("3."), Ok(300));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(parse_amount_to_cents(""), Err(AmountError::Empty));
        assert_eq!(parse_amount_to_cents("   "), Err(AmountError::Empty));
        assert!(matches!(parse_amount_to_cents("abc"), Err(AmountError::InvalidFormat(_))));
        assert!(matches!(parse_amount_to_cents("1.2.3"), Err(AmountError::InvalidFormat(_))));
        assert!(matches!(parse_amount_to_cents("."), Err(AmountError::InvalidFormat(_))));
        assert_eq!(parse_amount_to_cents("1.234"), Err(AmountError::TooPrecise));
        assert_eq!(parse_amount_to_cents("-5"), Err(AmountError::NotPositive));
        assert_eq!(parse_amount_to_cents("0.00"), Err(AmountError::NotPositive));
        assert_eq!(parse_amount_to_cents("100000001"), Err(AmountError::TooLarge));
        assert_eq!(parse_amount_to_cents("99999999999999999999"), Err(AmountError::TooLarge));
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(123456), "1234.56");
        assert_eq!(format_cents(-5), "-0.05");
        assert_eq!(format_cents(-100), "-1.00");
    }

    #[test]
    fn test_large_amount_threshold() {
        assert!(!is_large_amount(10_000));
        assert!(is_large_amount(10_001));
        assert!(is_large_amount(-20_000));
    }

    #[test]
    fn test_cents_to_units() {
        assert_eq!(cents_to_units(250), 2.5);
    }
}
