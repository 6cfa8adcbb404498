//! Distribution result models for the Tip Pool Engine.
//!
//! This module contains the [`DistributionResult`] type and its associated
//! structures that capture all outputs of a tip distribution, including the
//! per-staff line items, surplus accounting and an audit trace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PoolId, StaffRole};

/// A single staff member's payout within a distribution.
///
/// # Example
///
/// ```
/// use tip_pool_engine::models::{CalculationStaff, PoolId, StaffRole};
/// use rust_decimal::Decimal;
///
/// let line = CalculationStaff {
///     staff_id: "s1".to_string(),
///     staff_name: "Ana".to_string(),
///     role: StaffRole::new("waiter", "Waiter", "#2196F3"),
///     shift: Decimal::from(6),
///     tip_amount: Decimal::from(48),
///     pool: PoolId::Pool1,
/// };
/// assert_eq!(line.pool, PoolId::Pool1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationStaff {
    /// The id of the staff member paid.
    pub staff_id: String,
    /// The staff member's name at the time of the calculation.
    pub staff_name: String,
    /// The staff member's role at the time of the calculation.
    pub role: StaffRole,
    /// The clamped shift magnitude actually used for the share.
    pub shift: Decimal,
    /// The rounded payout.
    pub tip_amount: Decimal,
    /// The pool the payout came from.
    pub pool: PoolId,
}

/// A single step in the audit trace recording a distribution decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during distribution.
///
/// Warnings flag inputs that were accepted but adjusted or ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning (e.g. "UNMAPPED_ROLE").
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a distribution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of distribution steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during distribution.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a tip distribution.
///
/// Produced by [`calculate_tips`](crate::calculation::calculate_tips). Line items
/// list Pool 1 members first, then Pool 2 members, each group in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionResult {
    /// Per-staff payouts.
    pub calculation_staff: Vec<CalculationStaff>,
    /// Money left over after rounding, never negative.
    pub undistributed_amount: Decimal,
    /// Sum of all rounded payouts.
    pub total_distributed: Decimal,
    /// The nominal Pool 1 amount before rounding.
    pub pool1_base_amount: Decimal,
    /// The nominal Pool 2 amount before rounding.
    pub pool2_base_amount: Decimal,
    /// Money paid from Pool 2 beyond its nominal amount due to rounding up.
    pub pool2_extra_amount: Decimal,
    /// Record of every decision made during the distribution.
    pub audit_trace: AuditTrace,
}

impl DistributionResult {
    /// Returns the empty result used when nothing can be distributed.
    pub fn empty() -> Self {
        Self {
            calculation_staff: Vec::new(),
            undistributed_amount: Decimal::ZERO,
            total_distributed: Decimal::ZERO,
            pool1_base_amount: Decimal::ZERO,
            pool2_base_amount: Decimal::ZERO,
            pool2_extra_amount: Decimal::ZERO,
            audit_trace: AuditTrace::default(),
        }
    }

    /// Returns the line items paid from the given pool.
    pub fn pool_members(&self, pool: PoolId) -> impl Iterator<Item = &CalculationStaff> {
        self.calculation_staff.iter().filter(move |c| c.pool == pool)
    }

    /// Returns the total paid out from the given pool.
    pub fn pool_total(&self, pool: PoolId) -> Decimal {
        self.pool_members(pool)
            .fold(Decimal::ZERO, |acc, c| acc.saturating_add(c.tip_amount))
    }

    /// Returns true if there is nothing to show or save.
    pub fn is_empty(&self) -> bool {
        self.calculation_staff.is_empty()
    }
}
