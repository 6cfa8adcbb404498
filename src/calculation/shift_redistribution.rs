//! Shift clamping and shortfall redistribution.
//!
//! Part-shift workers cede the unworked part of their share to the full-shift
//! workers of the same pool instead of leaving it with the house.

use rust_decimal::Decimal;

use crate::models::{AuditStep, PoolId};

/// Hours in a full shift.
///
/// Shift magnitudes are stored in hours; a staff member who worked this many
/// hours (or more) in a meal period counts as a full-shift worker.
pub const FULL_SHIFT_UNIT: Decimal = Decimal::from_parts(6, 0, 0, false, 0);

/// Clamps a raw shift magnitude to `[0, full_shift_unit]`.
///
/// # Examples
///
/// ```
/// use tip_pool_engine::calculation::{clamp_shift, FULL_SHIFT_UNIT};
/// use rust_decimal::Decimal;
///
/// assert_eq!(clamp_shift(Decimal::from(8), FULL_SHIFT_UNIT), Decimal::from(6));
/// assert_eq!(clamp_shift(Decimal::from(-1), FULL_SHIFT_UNIT), Decimal::ZERO);
/// assert_eq!(clamp_shift(Decimal::new(45, 1), FULL_SHIFT_UNIT), Decimal::new(45, 1));
/// ```
pub fn clamp_shift(raw_shift: Decimal, full_shift_unit: Decimal) -> Decimal {
    raw_shift.max(Decimal::ZERO).min(full_shift_unit)
}

/// The result of redistributing a pool's shortfall.
#[derive(Debug, Clone)]
pub struct ShortfallRedistribution {
    /// Each member's shift after clamping, in input order.
    pub clamped_shifts: Vec<Decimal>,
    /// Each member's shift after redistribution, in input order.
    pub effective_shifts: Vec<Decimal>,
    /// Total hours short of a full shift across all part-shift members.
    pub shortfall: Decimal,
    /// Number of members who worked a full shift.
    pub full_shift_count: usize,
    /// Hours added to each full-shift member.
    pub share_per_full_shift: Decimal,
    /// The audit step recording this redistribution.
    pub audit_step: AuditStep,
}

impl ShortfallRedistribution {
    /// Returns the sum of all effective shifts, the pool's share denominator.
    pub fn total_effective_shift(&self) -> Decimal {
        self.effective_shifts.iter().copied().sum()
    }

    /// Returns true if part of the shortfall could not be handed to anyone.
    pub fn is_unabsorbed(&self) -> bool {
        self.shortfall > Decimal::ZERO && self.full_shift_count == 0
    }
}

/// Clamps each member's shift and hands the pool's shortfall to its
/// full-shift members.
///
/// The shortfall is the sum of `full_shift_unit - clamped` over members below a
/// full shift. It is split evenly among members whose clamped shift equals
/// `full_shift_unit`; everyone else keeps their clamped value. When nobody in
/// the pool worked a full shift the shortfall is simply not redistributed.
///
/// # Arguments
///
/// * `raw_shifts` - Each pool member's recorded shift, in input order
/// * `full_shift_unit` - Hours in a full shift
/// * `pool` - The pool being processed, for the audit trail
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use tip_pool_engine::calculation::{redistribute_shift_shortfall, FULL_SHIFT_UNIT};
/// use tip_pool_engine::models::PoolId;
/// use rust_decimal::Decimal;
///
/// // A half shift next to a full shift: the full-shift worker absorbs 3 hours.
/// let result = redistribute_shift_shortfall(
///     &[Decimal::from(3), Decimal::from(6)],
///     FULL_SHIFT_UNIT,
///     PoolId::Pool1,
///     1,
/// );
/// assert_eq!(result.effective_shifts, vec![Decimal::from(3), Decimal::from(9)]);
/// assert_eq!(result.shortfall, Decimal::from(3));
/// ```
pub fn redistribute_shift_shortfall(
    raw_shifts: &[Decimal],
    full_shift_unit: Decimal,
    pool: PoolId,
    step_number: u32,
) -> ShortfallRedistribution {
    let clamped_shifts: Vec<Decimal> = raw_shifts
        .iter()
        .map(|s| clamp_shift(*s, full_shift_unit))
        .collect();

    let shortfall: Decimal = clamped_shifts
        .iter()
        .filter(|s| **s < full_shift_unit)
        .map(|s| full_shift_unit - *s)
        .sum();

    let full_shift_count = clamped_shifts
        .iter()
        .filter(|s| **s == full_shift_unit)
        .count();

    let share_per_full_shift = if full_shift_count > 0 {
        shortfall / Decimal::from(full_shift_count)
    } else {
        Decimal::ZERO
    };

    let effective_shifts: Vec<Decimal> = clamped_shifts
        .iter()
        .map(|s| {
            if *s == full_shift_unit {
                *s + share_per_full_shift
            } else {
                *s
            }
        })
        .collect();

    let reasoning = if shortfall.is_zero() {
        format!(
            "No shortfall in {}: all {} member(s) worked a full shift",
            pool.as_str(),
            clamped_shifts.len()
        )
    } else if full_shift_count == 0 {
        format!(
            "{}h shortfall in {} not redistributed: no member worked a full shift",
            shortfall.normalize(),
            pool.as_str()
        )
    } else {
        format!(
            "{}h shortfall in {} split across {} full-shift member(s): +{}h each",
            shortfall.normalize(),
            pool.as_str(),
            full_shift_count,
            share_per_full_shift.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "shortfall_redistribution".to_string(),
        rule_name: "Shortfall Redistribution".to_string(),
        input: serde_json::json!({
            "pool": pool.as_str(),
            "full_shift_unit": full_shift_unit.normalize().to_string(),
            "raw_shifts": raw_shifts.iter().map(|s| s.normalize().to_string()).collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "clamped_shifts": clamped_shifts.iter().map(|s| s.normalize().to_string()).collect::<Vec<_>>(),
            "effective_shifts": effective_shifts.iter().map(|s| s.normalize().to_string()).collect::<Vec<_>>(),
            "shortfall": shortfall.normalize().to_string(),
            "full_shift_count": full_shift_count
        }),
        reasoning,
    };

    ShortfallRedistribution {
        clamped_shifts,
        effective_shifts,
        shortfall,
        full_shift_count,
        share_per_full_shift,
        audit_step,
    }
}
