//! Tip amount input validation.
//!
//! The engine requires a positive total; these helpers turn raw user input
//! into that total or into the error shown next to the input field.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Message shown when a tip amount cannot be used.
pub const INVALID_AMOUNT_MESSAGE: &str = "Please enter a valid amount";

/// Parses a typed tip amount such as `"123.45"` or `"$1,234.50"`.
///
/// A leading `$`, thousands separators and surrounding whitespace are ignored.
/// The result is rounded to cents.
///
/// # Errors
///
/// Returns `InvalidAmount` if the input is empty, not a number, zero or
/// negative.
///
/// # Examples
///
/// ```
/// use tip_pool_engine::calculation::parse_tip_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_tip_amount("$1,234.50").unwrap(), Decimal::new(123450, 2));
/// assert!(parse_tip_amount("0").is_err());
/// assert!(parse_tip_amount("abc").is_err());
/// ```
pub fn parse_tip_amount(input: &str) -> EngineResult<Decimal> {
    let invalid = || EngineError::InvalidAmount {
        input: input.to_string(),
        message: INVALID_AMOUNT_MESSAGE.to_string(),
    };

    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(invalid());
    }

    let amount = Decimal::from_str(&cleaned).map_err(|_| invalid())?;
    let amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    if amount <= Decimal::ZERO {
        return Err(invalid());
    }
    Ok(amount)
}

/// Reads keypad-style input as cents.
///
/// Every non-digit character is dropped and the remaining digits are read as
/// a number of cents, so typing `1`, `2`, `3`, `4`, `5` yields `123.45`.
/// Returns `None` when no digits remain or the number is too large.
///
/// # Examples
///
/// ```
/// use tip_pool_engine::calculation::amount_from_cents_input;
/// use rust_decimal::Decimal;
///
/// assert_eq!(amount_from_cents_input("12345"), Some(Decimal::new(12345, 2)));
/// assert_eq!(amount_from_cents_input("$1.2a3"), Some(Decimal::new(123, 2)));
/// assert_eq!(amount_from_cents_input("abc"), None);
/// ```
pub fn amount_from_cents_input(input: &str) -> Option<Decimal> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok().map(|cents| Decimal::new(cents, 2))
}
