//! Display helpers and calculation id generation.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as dollars with two decimal places.
///
/// # Examples
///
/// ```
/// use tip_pool_engine::calculation::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::from(48)), "$48.00");
/// assert_eq!(format_currency(Decimal::new(12345, 3)), "$12.35");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    format_currency_with_symbol(amount, "$")
}

/// Formats an amount with the given currency symbol and two decimal places.
pub fn format_currency_with_symbol(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{:.2}", symbol, rounded)
}

/// Formats a shift magnitude in hours, e.g. `4.5h`.
pub fn format_shift(shift: Decimal) -> String {
    format!("{}h", shift.normalize())
}

/// Formats a calculation date for history listings, e.g. `Oct 19, 2026, 02:30 PM`.
pub fn format_calculation_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y, %I:%M %p").to_string()
}

static LAST_CALCULATION_ID: AtomicI64 = AtomicI64::new(0);

/// Generates an id for a new tip calculation.
///
/// Ids are the current Unix time in milliseconds, bumped when needed so that
/// every id handed out by this process is strictly greater than the previous
/// one.
///
/// # Examples
///
/// ```
/// use tip_pool_engine::calculation::generate_calculation_id;
///
/// let first: i64 = generate_calculation_id().parse().unwrap();
/// let second: i64 = generate_calculation_id().parse().unwrap();
/// assert!(second > first);
/// ```
pub fn generate_calculation_id() -> String {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_CALCULATION_ID
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    now.max(previous + 1).to_string()
}
