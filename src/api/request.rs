//! Request types for the Tip Pool Engine API.
//!
//! This module defines the JSON request structures for the calculation and
//! roster endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{MealPeriod, Staff, StaffRole};

/// Request body for `POST /calculate` and `POST /calculations`.
///
/// Staff are taken from `staff_ids` (resolved against the roster) when
/// present, otherwise from the inline `staff` list, otherwise the active
/// roster is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRequest {
    /// The cash total to distribute.
    pub total_amount: Decimal,
    /// Which shift magnitude to use.
    pub meal_period: MealPeriod,
    /// Roster ids of the staff sharing the tips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_ids: Option<Vec<String>>,
    /// Staff supplied inline instead of from the roster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff: Option<Vec<Staff>>,
    /// When the tips were collected. Defaults to now when saving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// Request body for `POST /staff` and `PUT /staff/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffRequest {
    /// Optional id for new staff. Ignored on update.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Role id from the catalog, e.g. `waiter`.
    pub role: String,
    /// Hours worked during lunch.
    #[serde(default)]
    pub lunch_shift: Decimal,
    /// Hours worked during dinner.
    #[serde(default)]
    pub dinner_shift: Decimal,
    /// Whether the staff member is currently employed.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl StaffRequest {
    /// Converts the request into a staff record.
    ///
    /// The role carries only its id; the store fills in the name and color.
    pub fn into_staff(self, id: Option<String>) -> Staff {
        Staff {
            id: id.or(self.id).unwrap_or_default(),
            name: self.name,
            role: StaffRole::new(self.role, "", ""),
            lunch_shift: self.lunch_shift,
            dinner_shift: self.dinner_shift,
            is_active: self.is_active,
        }
    }
}

/// Query parameters for `GET /staff`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffQuery {
    /// Case-insensitive name fragment.
    #[serde(default)]
    pub q: Option<String>,
    /// Role id filter.
    #[serde(default)]
    pub role: Option<String>,
    /// Only list active staff.
    #[serde(default)]
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_calculate_request_with_ids() {
        let json = r#"{
            "total_amount": "100.00",
            "meal_period": "dinner",
            "staff_ids": ["s1", "s2"]
        }"#;

        let request: CalculateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.total_amount, Decimal::from_str("100.00").unwrap());
        assert_eq!(request.meal_period, MealPeriod::Dinner);
        assert_eq!(request.staff_ids.unwrap(), vec!["s1", "s2"]);
        assert!(request.staff.is_none());
        assert!(request.date.is_none());
    }

    #[test]
    fn test_deserialize_calculate_request_accepts_numeric_amount() {
        let json = r#"{"total_amount": 87.5, "meal_period": "lunch"}"#;
        let request: CalculateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.total_amount, Decimal::from_str("87.5").unwrap());
        assert_eq!(request.meal_period, MealPeriod::Lunch);
    }

    #[test]
    fn test_staff_request_defaults() {
        let json = r#"{"name": "Ana", "role": "waiter"}"#;
        let request: StaffRequest = serde_json::from_str(json).unwrap();

        let staff = request.into_staff(None);
        assert!(staff.id.is_empty());
        assert_eq!(staff.role.id, "waiter");
        assert_eq!(staff.lunch_shift, Decimal::ZERO);
        assert!(staff.is_active);
    }

    #[test]
    fn test_staff_request_path_id_wins() {
        let json = r#"{"id": "body", "name": "Ana", "role": "bar", "dinner_shift": "4.5"}"#;
        let request: StaffRequest = serde_json::from_str(json).unwrap();

        let staff = request.into_staff(Some("path".to_string()));
        assert_eq!(staff.id, "path");
        assert_eq!(staff.dinner_shift, Decimal::from_str("4.5").unwrap());
    }
}
