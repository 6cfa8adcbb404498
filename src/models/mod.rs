//! Core data models for the Tip Pool Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod distribution_result;
mod role;
mod staff;
mod tip_calculation;

pub use distribution_result::{
    AuditStep, AuditTrace, AuditWarning, CalculationStaff, DistributionResult,
};
pub use role::{MealPeriod, PoolId, StaffRole};
pub use staff::Staff;
pub use tip_calculation::TipCalculation;
