//! Pool-specific payout rounding.
//!
//! Payouts are rounded to whole currency units. The large pool rounds down
//! unless the fractional part is close to a whole unit, so leftovers stay
//! undistributed; the small pool always rounds up.

use rust_decimal::Decimal;

use crate::config::{PoolPolicy, RoundingRule};
use crate::models::PoolId;

/// Decimal places kept from a raw share before whole-unit rounding.
///
/// Shares are computed by division, which can leave residue in the last
/// places of a `Decimal` (e.g. `2.9999999999999999999999999999`).
pub const RAW_SHARE_PRECISION: u32 = 10;

/// Applies a rounding rule to an amount.
///
/// # Examples
///
/// ```
/// use tip_pool_engine::calculation::apply_rounding_rule;
/// use tip_pool_engine::config::RoundingRule;
/// use rust_decimal::Decimal;
///
/// let threshold = RoundingRule::Threshold { threshold: Decimal::new(85, 2) };
/// assert_eq!(apply_rounding_rule(Decimal::new(4850, 2), threshold), Decimal::from(48));
/// assert_eq!(apply_rounding_rule(Decimal::new(4885, 2), threshold), Decimal::from(49));
/// assert_eq!(apply_rounding_rule(Decimal::new(301, 2), RoundingRule::Ceiling), Decimal::from(4));
/// ```
pub fn apply_rounding_rule(amount: Decimal, rule: RoundingRule) -> Decimal {
    let amount = amount.round_dp(RAW_SHARE_PRECISION);
    match rule {
        RoundingRule::Ceiling => amount.ceil(),
        RoundingRule::Threshold { threshold } => {
            let whole = amount.floor();
            if amount - whole >= threshold {
                amount.ceil()
            } else {
                whole
            }
        }
    }
}

/// Rounds a raw payout according to the pool it is paid from.
///
/// # Arguments
///
/// * `amount` - The raw, unrounded payout
/// * `pool` - The pool the payout comes from
/// * `policy` - The pool policy carrying each pool's rounding rule
///
/// # Examples
///
/// ```
/// use tip_pool_engine::calculation::round_pool_amount;
/// use tip_pool_engine::config::PoolPolicy;
/// use tip_pool_engine::models::PoolId;
/// use rust_decimal::Decimal;
///
/// let policy = PoolPolicy::default();
/// assert_eq!(round_pool_amount(Decimal::new(7275, 2), PoolId::Pool1, &policy), Decimal::from(72));
/// assert_eq!(round_pool_amount(Decimal::new(75, 2), PoolId::Pool2, &policy), Decimal::from(1));
/// ```
pub fn round_pool_amount(amount: Decimal, pool: PoolId, policy: &PoolPolicy) -> Decimal {
    apply_rounding_rule(amount, policy.rounding(pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn pool1(amount: &str) -> Decimal {
        round_pool_amount(dec(amount), PoolId::Pool1, &PoolPolicy::default())
    }

    fn pool2(amount: &str) -> Decimal {
        round_pool_amount(dec(amount), PoolId::Pool2, &PoolPolicy::default())
    }

    #[test]
    fn test_pool1_truncates_below_threshold() {
        assert_eq!(pool1("48.50"), dec("48"));
        assert_eq!(pool1("48.84"), dec("48"));
        assert_eq!(pool1("48.01"), dec("48"));
    }

    #[test]
    fn test_pool1_rounds_up_at_threshold() {
        assert_eq!(pool1("48.85"), dec("49"));
        assert_eq!(pool1("48.99"), dec("49"));
    }

    #[test]
    fn test_pool1_keeps_whole_amounts() {
        assert_eq!(pool1("97"), dec("97"));
        assert_eq!(pool1("0"), dec("0"));
    }

    #[test]
    fn test_pool2_always_rounds_up() {
        assert_eq!(pool2("0.01"), dec("1"));
        assert_eq!(pool2("1.50"), dec("2"));
        assert_eq!(pool2("2.99"), dec("3"));
    }

    #[test]
    fn test_pool2_keeps_whole_amounts() {
        assert_eq!(pool2("3.00"), dec("3"));
        assert_eq!(pool2("0"), dec("0"));
    }

    #[test]
    fn test_division_residue_does_not_trigger_ceiling() {
        // 3 x (1 / 3) leaves 0.9999999999999999999999999999
        let amount = dec("3") * (Decimal::ONE / dec("3"));
        assert!(amount < dec("1"));
        assert_eq!(apply_rounding_rule(amount, RoundingRule::Ceiling), dec("1"));
        assert_eq!(pool2("1.0000000000000000000000000001"), dec("1"));
    }

    #[test]
    fn test_custom_threshold() {
        let rule = RoundingRule::Threshold {
            threshold: dec("0.5"),
        };
        assert_eq!(apply_rounding_rule(dec("10.49"), rule), dec("10"));
        assert_eq!(apply_rounding_rule(dec("10.50"), rule), dec("11"));
    }
}
