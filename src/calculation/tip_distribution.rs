//! Tip distribution across the two role-based pools.
//!
//! This module provides [`calculate_tips`], which splits a shift's cash tips
//! between Pool 1 and Pool 2, shares each pool by effective shift, rounds
//! each payout by its pool's rule, and accounts for the money left over or
//! added by rounding.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::PoolPolicy;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, CalculationStaff, DistributionResult, MealPeriod, PoolId,
    Staff,
};

use super::rounding::round_pool_amount;
use super::shift_redistribution::{ShortfallRedistribution, redistribute_shift_shortfall};

/// Payouts for one pool, in member order.
struct PoolPayout {
    line_items: Vec<CalculationStaff>,
    audit_step: AuditStep,
}

/// Distributes a shift's tips among staff.
///
/// The distribution runs in five steps:
/// 1. Each staff member is placed in the pool their role maps to. Roles the
///    policy does not map are left out and reported as `UNMAPPED_ROLE` warnings.
/// 2. Within each pool shifts are clamped to `[0, full_shift_unit]` and the
///    shortfall of part-shift members is handed to the full-shift members.
/// 3. Each member receives `pool_amount * effective_shift / total_effective_shift`,
///    or zero when the pool's total effective shift is zero.
/// 4. Payouts are rounded to whole units by the pool's rounding rule.
/// 5. The undistributed remainder and the Pool 2 overage are computed.
///
/// The function is total over its input domain and has no side effects:
/// identical inputs always produce identical results. Totals up to
/// [`Decimal::MAX`] are accepted; sums that rounding would push past it
/// saturate instead of overflowing. Callers validate that
/// `total_amount` is positive before calling; an empty `staff` slice yields
/// [`DistributionResult::empty`].
///
/// # Arguments
///
/// * `total_amount` - The cash tips collected for the meal period
/// * `staff` - The staff members sharing the tips, in display order
/// * `meal_period` - Selects each member's lunch or dinner shift
/// * `policy` - Pool membership, shares, rounding rules and full shift unit
///
/// # Examples
///
/// ```
/// use tip_pool_engine::calculation::calculate_tips;
/// use tip_pool_engine::config::PoolPolicy;
/// use tip_pool_engine::models::{MealPeriod, Staff, StaffRole};
/// use rust_decimal::Decimal;
///
/// let waiter = |id: &str| Staff {
///     id: id.to_string(),
///     name: id.to_uppercase(),
///     role: StaffRole::new("waiter", "Waiter", "#2196F3"),
///     lunch_shift: Decimal::from(6),
///     dinner_shift: Decimal::from(6),
///     is_active: true,
/// };
///
/// let result = calculate_tips(
///     Decimal::from(100),
///     &[waiter("a"), waiter("b")],
///     MealPeriod::Dinner,
///     &PoolPolicy::default(),
/// );
/// assert_eq!(result.calculation_staff[0].tip_amount, Decimal::from(48));
/// assert_eq!(result.calculation_staff[1].tip_amount, Decimal::from(48));
/// assert_eq!(result.undistributed_amount, Decimal::from(4));
/// ```
pub fn calculate_tips(
    total_amount: Decimal,
    staff: &[Staff],
    meal_period: MealPeriod,
    policy: &PoolPolicy,
) -> DistributionResult {
    if staff.is_empty() {
        return DistributionResult::empty();
    }

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;
    let full_shift_unit = policy.full_shift_unit();

    // Step 1: role partition
    let mut pool1_members: Vec<&Staff> = Vec::new();
    let mut pool2_members: Vec<&Staff> = Vec::new();
    let mut excluded: Vec<&Staff> = Vec::new();

    for member in staff {
        match policy.pool_for(&member.role.id) {
            Some(PoolId::Pool1) => pool1_members.push(member),
            Some(PoolId::Pool2) => pool2_members.push(member),
            None => {
                warnings.push(AuditWarning {
                    code: "UNMAPPED_ROLE".to_string(),
                    message: format!(
                        "Staff '{}' has role '{}' which is not assigned to a tip pool and was excluded",
                        member.name, member.role.id
                    ),
                    severity: "medium".to_string(),
                });
                excluded.push(member);
            }
        }

        let raw_shift = member.shift_for(meal_period);
        if raw_shift > full_shift_unit || raw_shift < Decimal::ZERO {
            warnings.push(AuditWarning {
                code: "SHIFT_CLAMPED".to_string(),
                message: format!(
                    "Staff '{}' {} shift of {}h was clamped to the 0-{}h range",
                    member.name,
                    meal_period.as_str(),
                    raw_shift.normalize(),
                    full_shift_unit.normalize()
                ),
                severity: "low".to_string(),
            });
        }
    }

    steps.push(AuditStep {
        step_number,
        rule_id: "role_partition".to_string(),
        rule_name: "Role Partition".to_string(),
        input: serde_json::json!({
            "staff_count": staff.len(),
            "meal_period": meal_period.as_str()
        }),
        output: serde_json::json!({
            "pool1": pool1_members.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            "pool2": pool2_members.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            "excluded": excluded.iter().map(|s| s.id.as_str()).collect::<Vec<_>>()
        }),
        reasoning: format!(
            "{} staff in pool1, {} in pool2, {} excluded for unmapped roles",
            pool1_members.len(),
            pool2_members.len(),
            excluded.len()
        ),
    });
    step_number += 1;

    let pool1_base_amount = total_amount * policy.share(PoolId::Pool1);
    let pool2_base_amount = total_amount * policy.share(PoolId::Pool2);

    let mut calculation_staff: Vec<CalculationStaff> = Vec::new();

    for (pool, members, pool_amount) in [
        (PoolId::Pool1, &pool1_members, pool1_base_amount),
        (PoolId::Pool2, &pool2_members, pool2_base_amount),
    ] {
        if members.is_empty() {
            continue;
        }

        // Step 2: clamping and shortfall redistribution
        let raw_shifts: Vec<Decimal> = members.iter().map(|m| m.shift_for(meal_period)).collect();
        let redistribution =
            redistribute_shift_shortfall(&raw_shifts, full_shift_unit, pool, step_number);
        step_number += 1;

        if redistribution.is_unabsorbed() {
            warnings.push(AuditWarning {
                code: "SHORTFALL_NOT_REDISTRIBUTED".to_string(),
                message: format!(
                    "Nobody in {} worked a full shift; {}h of shortfall stays unassigned",
                    pool.as_str(),
                    redistribution.shortfall.normalize()
                ),
                severity: "low".to_string(),
            });
        }

        // Steps 3 and 4: proportional share and rounding
        let payout = distribute_pool(
            pool,
            pool_amount,
            members,
            &redistribution,
            policy,
            step_number,
        );
        step_number += 1;

        steps.push(redistribution.audit_step);
        steps.push(payout.audit_step);
        calculation_staff.extend(payout.line_items);
    }

    // Step 5: surplus and overage accounting
    let total_distributed = saturating_sum(calculation_staff.iter().map(|c| c.tip_amount));
    let undistributed_amount = total_amount
        .saturating_sub(total_distributed)
        .max(Decimal::ZERO);

    let pool2_paid = saturating_sum(
        calculation_staff
            .iter()
            .filter(|c| c.pool == PoolId::Pool2)
            .map(|c| c.tip_amount),
    );
    let pool2_extra_amount = if pool2_paid > Decimal::ZERO {
        pool2_paid
            .saturating_sub(pool2_base_amount)
            .max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    steps.push(AuditStep {
        step_number,
        rule_id: "surplus_accounting".to_string(),
        rule_name: "Surplus Accounting".to_string(),
        input: serde_json::json!({
            "total_amount": total_amount.normalize().to_string(),
            "total_distributed": total_distributed.normalize().to_string(),
            "pool2_base_amount": pool2_base_amount.normalize().to_string(),
            "pool2_paid": pool2_paid.normalize().to_string()
        }),
        output: serde_json::json!({
            "undistributed_amount": undistributed_amount.normalize().to_string(),
            "pool2_extra_amount": pool2_extra_amount.normalize().to_string()
        }),
        reasoning: format!(
            "${} - ${} distributed = ${} undistributed; pool2 paid ${} against ${} nominal",
            total_amount.normalize(),
            total_distributed.normalize(),
            undistributed_amount.normalize(),
            pool2_paid.normalize(),
            pool2_base_amount.normalize()
        ),
    });

    debug!(
        staff_count = staff.len(),
        paid_count = calculation_staff.len(),
        total_amount = %total_amount,
        total_distributed = %total_distributed,
        undistributed = %undistributed_amount,
        "Tip distribution calculated"
    );

    DistributionResult {
        calculation_staff,
        undistributed_amount,
        total_distributed,
        pool1_base_amount,
        pool2_base_amount,
        pool2_extra_amount,
        audit_trace: AuditTrace { steps, warnings },
    }
}

/// Shares a pool's amount by effective shift and rounds each payout.
fn distribute_pool(
    pool: PoolId,
    pool_amount: Decimal,
    members: &[&Staff],
    redistribution: &ShortfallRedistribution,
    policy: &PoolPolicy,
    step_number: u32,
) -> PoolPayout {
    let total_effective = redistribution.total_effective_shift();

    let mut raw_amounts: Vec<Decimal> = Vec::with_capacity(members.len());
    let mut line_items: Vec<CalculationStaff> = Vec::with_capacity(members.len());

    for ((member, clamped), effective) in members
        .iter()
        .zip(&redistribution.clamped_shifts)
        .zip(&redistribution.effective_shifts)
    {
        // The ratio is at most 1, so the product never exceeds pool_amount
        let raw_amount = if total_effective > Decimal::ZERO {
            pool_amount * (*effective / total_effective)
        } else {
            Decimal::ZERO
        };
        let tip_amount = round_pool_amount(raw_amount, pool, policy);

        raw_amounts.push(raw_amount);
        line_items.push(CalculationStaff {
            staff_id: member.id.clone(),
            staff_name: member.name.clone(),
            role: member.role.clone(),
            shift: *clamped,
            tip_amount,
            pool,
        });
    }

    let pool_paid = saturating_sum(line_items.iter().map(|l| l.tip_amount));

    let audit_step = AuditStep {
        step_number,
        rule_id: "pool_share".to_string(),
        rule_name: "Pool Share and Rounding".to_string(),
        input: serde_json::json!({
            "pool": pool.as_str(),
            "pool_amount": pool_amount.normalize().to_string(),
            "total_effective_shift": total_effective.normalize().to_string(),
            "rounding": policy.rounding(pool)
        }),
        output: serde_json::json!({
            "raw_amounts": raw_amounts
                .iter()
                .map(|a| a.round_dp(4).normalize().to_string())
                .collect::<Vec<_>>(),
            "tip_amounts": line_items
                .iter()
                .map(|l| l.tip_amount.normalize().to_string())
                .collect::<Vec<_>>(),
            "pool_paid": pool_paid.normalize().to_string()
        }),
        reasoning: if total_effective > Decimal::ZERO {
            format!(
                "${} shared across {}h of effective shift in {}; ${} paid after rounding",
                pool_amount.normalize(),
                total_effective.round_dp(4).normalize(),
                pool.as_str(),
                pool_paid.normalize()
            )
        } else {
            format!(
                "No effective shift in {}; every member receives $0",
                pool.as_str()
            )
        },
    };

    PoolPayout {
        line_items,
        audit_step,
    }
}

/// Sums payouts without panicking when rounding pushes a total past
/// [`Decimal::MAX`].
fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}
