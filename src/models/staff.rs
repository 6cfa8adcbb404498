//! Staff model.
//!
//! This module defines the [`Staff`] struct for representing the people
//! who share in a shift's tips.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MealPeriod, StaffRole};

/// Represents a member of staff on the roster.
///
/// `lunch_shift` and `dinner_shift` are the hours worked in each meal period,
/// where [`FULL_SHIFT_UNIT`](crate::calculation::FULL_SHIFT_UNIT) hours is a full
/// shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    /// Unique identifier for the staff member.
    pub id: String,
    /// Display name, unique within the roster (case-insensitive).
    pub name: String,
    /// The staff member's role.
    pub role: StaffRole,
    /// Hours worked during lunch.
    pub lunch_shift: Decimal,
    /// Hours worked during dinner.
    pub dinner_shift: Decimal,
    /// Whether the staff member is currently employed.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Staff {
    /// Returns the raw shift magnitude recorded for the given meal period.
    ///
    /// # Examples
    ///
    /// ```
    /// use tip_pool_engine::models::{MealPeriod, Staff, StaffRole};
    /// use rust_decimal::Decimal;
    ///
    /// let staff = Staff {
    ///     id: "s1".to_string(),
    ///     name: "Ana".to_string(),
    ///     role: StaffRole::new("waiter", "Waiter", "#2196F3"),
    ///     lunch_shift: Decimal::new(45, 1),
    ///     dinner_shift: Decimal::from(6),
    ///     is_active: true,
    /// };
    /// assert_eq!(staff.shift_for(MealPeriod::Lunch), Decimal::new(45, 1));
    /// assert_eq!(staff.shift_for(MealPeriod::Dinner), Decimal::from(6));
    /// ```
    pub fn shift_for(&self, meal_period: MealPeriod) -> Decimal {
        match meal_period {
            MealPeriod::Lunch => self.lunch_shift,
            MealPeriod::Dinner => self.dinner_shift,
        }
    }

    /// Returns true when `name` matches this staff member's name, ignoring
    /// case and surrounding whitespace.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}
