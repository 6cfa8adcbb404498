//! Configuration types for tip pooling.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the [`PoolPolicy`]
//! the distribution engine runs against.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{PoolId, StaffRole};

/// A role in the catalog together with the pool it is paid from.
///
/// Every catalog role must name a pool, so a role cannot be added to the
/// catalog without deciding how it is paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Stable role identifier (e.g. "gourmet-table").
    pub id: String,
    /// Human-readable role name.
    pub name: String,
    /// Display color as a hex string.
    pub color: String,
    /// The pool this role is paid from.
    pub pool: PoolId,
}

impl RoleDefinition {
    /// Returns the role tag carried on staff records.
    pub fn to_staff_role(&self) -> StaffRole {
        StaffRole::new(&self.id, &self.name, &self.color)
    }
}

/// Role catalog file structure (`roles.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct RolesConfig {
    /// The roles, in display order.
    pub roles: Vec<RoleDefinition>,
}

/// How a pool's raw payouts are rounded to whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RoundingRule {
    /// Round up only when the fractional part reaches `threshold`, otherwise
    /// truncate.
    Threshold {
        /// The fractional part at which the amount is rounded up.
        threshold: Decimal,
    },
    /// Always round up.
    Ceiling,
}

/// Settings for a single pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSettings {
    /// Fraction of the total tip amount assigned to this pool.
    pub share: Decimal,
    /// How payouts from this pool are rounded.
    pub rounding: RoundingRule,
}

/// Pool settings file structure (`pools.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct PoolsConfig {
    /// Settings for the large pool.
    pub pool1: PoolSettings,
    /// Settings for the small pool.
    pub pool2: PoolSettings,
    /// Shift magnitude of a full shift, in hours.
    pub full_shift_unit: Decimal,
    /// Symbol prefixed to formatted amounts.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

/// The complete pool policy the distribution engine runs against.
///
/// Built from YAML by [`ConfigLoader`](super::ConfigLoader) or taken from
/// [`PoolPolicy::default`], which reproduces the restaurant's standard
/// 97% / 3% split over a 6 hour shift.
///
/// # Example
///
/// ```
/// use tip_pool_engine::config::PoolPolicy;
/// use tip_pool_engine::models::PoolId;
///
/// let policy = PoolPolicy::default();
/// assert_eq!(policy.pool_for("waiter"), Some(PoolId::Pool1));
/// assert_eq!(policy.pool_for("busser"), Some(PoolId::Pool2));
/// assert_eq!(policy.pool_for("dishwasher"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PoolPolicy {
    /// The role catalog in display order.
    roles: Vec<RoleDefinition>,
    /// Role id to pool lookup.
    membership: HashMap<String, PoolId>,
    /// Large pool settings.
    pool1: PoolSettings,
    /// Small pool settings.
    pool2: PoolSettings,
    /// Hours in a full shift.
    full_shift_unit: Decimal,
    /// Symbol prefixed to formatted amounts.
    currency_symbol: String,
}

impl PoolPolicy {
    /// Creates a new PoolPolicy from its component parts.
    pub fn new(roles: Vec<RoleDefinition>, pools: PoolsConfig) -> Self {
        let membership = roles.iter().map(|r| (r.id.clone(), r.pool)).collect();
        Self {
            roles,
            membership,
            pool1: pools.pool1,
            pool2: pools.pool2,
            full_shift_unit: pools.full_shift_unit,
            currency_symbol: pools.currency_symbol,
        }
    }

    /// Returns the pool a role id is paid from, or `None` for unmapped roles.
    pub fn pool_for(&self, role_id: &str) -> Option<PoolId> {
        self.membership.get(role_id).copied()
    }

    /// Returns the role catalog.
    pub fn roles(&self) -> &[RoleDefinition] {
        &self.roles
    }

    /// Looks up a catalog role by id.
    pub fn role(&self, role_id: &str) -> Option<&RoleDefinition> {
        self.roles.iter().find(|r| r.id == role_id)
    }

    /// Returns the settings for a pool.
    pub fn pool(&self, pool: PoolId) -> &PoolSettings {
        match pool {
            PoolId::Pool1 => &self.pool1,
            PoolId::Pool2 => &self.pool2,
        }
    }

    /// Returns the fraction of the total assigned to a pool.
    pub fn share(&self, pool: PoolId) -> Decimal {
        self.pool(pool).share
    }

    /// Returns the rounding rule for a pool.
    pub fn rounding(&self, pool: PoolId) -> RoundingRule {
        self.pool(pool).rounding
    }

    /// Returns the number of hours in a full shift.
    pub fn full_shift_unit(&self) -> Decimal {
        self.full_shift_unit
    }

    /// Returns the currency symbol used for formatting.
    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }
}

impl Default for PoolPolicy {
    fn default() -> Self {
        let role = |id: &str, name: &str, color: &str, pool: PoolId| RoleDefinition {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            pool,
        };
        let roles = vec![
            role("waiter", "Waiter", "#2196F3", PoolId::Pool1),
            role("busser", "Busser", "#4CAF50", PoolId::Pool2),
            role("gourmet-table", "Gourmet Table", "#FF9800", PoolId::Pool2),
            role("gaucho", "Gaucho", "#9C27B0", PoolId::Pool1),
            role("bar", "Bar", "#795548", PoolId::Pool1),
            role("head-floor", "Head Floor", "#607D8B", PoolId::Pool1),
        ];
        let pools = PoolsConfig {
            pool1: PoolSettings {
                share: Decimal::new(97, 2),
                rounding: RoundingRule::Threshold {
                    threshold: Decimal::new(85, 2),
                },
            },
            pool2: PoolSettings {
                share: Decimal::new(3, 2),
                rounding: RoundingRule::Ceiling,
            },
            full_shift_unit: crate::calculation::FULL_SHIFT_UNIT,
            currency_symbol: default_currency_symbol(),
        };
        Self::new(roles, pools)
    }
}
