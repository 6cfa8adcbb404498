//! Role, pool and meal period models.
//!
//! This module contains the [`StaffRole`] catalog entry, the [`PoolId`] that a
//! role maps to, and the [`MealPeriod`] a calculation is run for.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A role tag from the restaurant's role catalog.
///
/// The `id` decides which tip pool the staff member belongs to; `name` and
/// `color` are display data carried along so history records stay readable
/// after the catalog changes.
///
/// # Example
///
/// ```
/// use tip_pool_engine::models::StaffRole;
///
/// let role = StaffRole::new("waiter", "Waiter", "#2196F3");
/// assert_eq!(role.id, "waiter");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffRole {
    /// Stable identifier used for pool membership (e.g. "waiter").
    pub id: String,
    /// Human-readable role name.
    pub name: String,
    /// Display color as a hex string.
    pub color: String,
}

impl StaffRole {
    /// Creates a role from its three fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// One of the two disjoint tip pools.
///
/// # Example
///
/// ```
/// use tip_pool_engine::models::PoolId;
///
/// assert_eq!(serde_json::to_string(&PoolId::Pool2).unwrap(), "\"pool2\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolId {
    /// The large pool (waiters, gauchos, bar, head floor).
    Pool1,
    /// The small pool (bussers, gourmet table).
    Pool2,
}

impl PoolId {
    /// Returns the identifier used in audit output and serialized data.
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolId::Pool1 => "pool1",
            PoolId::Pool2 => "pool2",
        }
    }
}

/// The meal period a tip calculation covers.
///
/// Each staff member records a separate shift magnitude for lunch and dinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealPeriod {
    /// Lunch service.
    Lunch,
    /// Dinner service.
    Dinner,
}

impl MealPeriod {
    /// Returns the serialized name of the meal period.
    pub fn as_str(&self) -> &'static str {
        match self {
            MealPeriod::Lunch => "lunch",
            MealPeriod::Dinner => "dinner",
        }
    }

    /// Checks whether this meal period is served on the given date.
    ///
    /// Lunch is only served Friday through Sunday; dinner is served every day.
    ///
    /// # Example
    ///
    /// ```
    /// use tip_pool_engine::models::MealPeriod;
    /// use chrono::NaiveDate;
    ///
    /// let tuesday = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
    /// let saturday = NaiveDate::from_ymd_opt(2026, 10, 24).unwrap();
    /// assert!(!MealPeriod::Lunch.is_available_on(tuesday));
    /// assert!(MealPeriod::Lunch.is_available_on(saturday));
    /// assert!(MealPeriod::Dinner.is_available_on(tuesday));
    /// ```
    pub fn is_available_on(&self, date: NaiveDate) -> bool {
        match self {
            MealPeriod::Dinner => true,
            MealPeriod::Lunch => matches!(
                date.weekday(),
                Weekday::Fri | Weekday::Sat | Weekday::Sun
            ),
        }
    }

    /// Returns `requested` if it is served on `date`, otherwise dinner.
    pub fn default_for(date: NaiveDate, requested: MealPeriod) -> MealPeriod {
        if requested.is_available_on(date) {
            requested
        } else {
            MealPeriod::Dinner
        }
    }
}

impl std::fmt::Display for MealPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MealPeriod::Lunch => write!(f, "Lunch"),
            MealPeriod::Dinner => write!(f, "Dinner"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_lunch_available_friday_to_sunday_only() {
        // 2026-10-19 is a Monday
        let week: Vec<bool> = (19..=25)
            .map(|d| MealPeriod::Lunch.is_available_on(date(2026, 10, d)))
            .collect();
        assert_eq!(week, vec![false, false, false, false, true, true, true]);
    }

    #[test]
    fn test_dinner_available_every_day() {
        for d in 19..=25 {
            assert!(MealPeriod::Dinner.is_available_on(date(2026, 10, d)));
        }
    }

    #[test]
    fn test_default_for_falls_back_to_dinner_on_weekdays() {
        let wednesday = date(2026, 10, 21);
        let sunday = date(2026, 10, 25);
        assert_eq!(
            MealPeriod::default_for(wednesday, MealPeriod::Lunch),
            MealPeriod::Dinner
        );
        assert_eq!(
            MealPeriod::default_for(sunday, MealPeriod::Lunch),
            MealPeriod::Lunch
        );
    }

    #[test]
    fn test_meal_period_serialization() {
        assert_eq!(
            serde_json::to_string(&MealPeriod::Lunch).unwrap(),
            "\"lunch\""
        );
        let parsed: MealPeriod = serde_json::from_str("\"dinner\"").unwrap();
        assert_eq!(parsed, MealPeriod::Dinner);
        assert_eq!(MealPeriod::Dinner.to_string(), "Dinner");
    }

    #[test]
    fn test_pool_id_serialization() {
        assert_eq!(serde_json::to_string(&PoolId::Pool1).unwrap(), "\"pool1\"");
        let parsed: PoolId = serde_json::from_str("\"pool2\"").unwrap();
        assert_eq!(parsed, PoolId::Pool2);
        assert_eq!(PoolId::Pool2.as_str(), "pool2");
    }
}
