//! Tip calculation history record.
//!
//! This module contains the [`TipCalculation`] type, the record the roster
//! store keeps for every saved distribution.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CalculationStaff, DistributionResult, MealPeriod};

/// A saved tip distribution.
///
/// Created by the caller from a [`DistributionResult`] once the user decides to
/// keep it. The record is replaced wholesale on update and removed by id.
///
/// # Example
///
/// ```
/// use tip_pool_engine::models::{DistributionResult, MealPeriod, TipCalculation};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
///
/// let result = DistributionResult::empty();
/// let record = TipCalculation::from_distribution(
///     "1760000000000".to_string(),
///     Utc::now(),
///     MealPeriod::Dinner,
///     Decimal::from(100),
///     &result,
/// );
/// assert_eq!(record.total_tip_amount, Decimal::from(100));
/// assert!(record.staff_members.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipCalculation {
    /// Stable identifier, see [`generate_calculation_id`](crate::calculation::generate_calculation_id).
    pub id: String,
    /// When the tips were collected.
    pub date: DateTime<Utc>,
    /// The meal period the tips belong to.
    pub meal_period: MealPeriod,
    /// The cash total that was distributed.
    pub total_tip_amount: Decimal,
    /// Per-staff payouts.
    pub staff_members: Vec<CalculationStaff>,
    /// Money that was left over after rounding.
    #[serde(default)]
    pub undistributed_amount: Decimal,
}

impl TipCalculation {
    /// Builds a history record from a distribution result.
    pub fn from_distribution(
        id: String,
        date: DateTime<Utc>,
        meal_period: MealPeriod,
        total_tip_amount: Decimal,
        result: &DistributionResult,
    ) -> Self {
        Self {
            id,
            date,
            meal_period,
            total_tip_amount,
            staff_members: result.calculation_staff.clone(),
            undistributed_amount: result.undistributed_amount,
        }
    }

    /// Returns the sum of all payouts in this record.
    pub fn total_paid(&self) -> Decimal {
        self.staff_members
            .iter()
            .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.tip_amount))
    }
}
