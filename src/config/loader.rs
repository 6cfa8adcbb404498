//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the role
//! catalog and pool settings from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::StaffRole;

use super::types::{PoolPolicy, PoolsConfig, RoleDefinition, RolesConfig, RoundingRule};

/// Loads and provides access to the pool policy.
///
/// The `ConfigLoader` reads YAML configuration files from a directory,
/// validates them, and exposes the resulting [`PoolPolicy`].
///
/// # Directory Structure
///
/// ```text
/// config/standard/
/// ├── roles.yaml   # Role catalog with pool assignments
/// └── pools.yaml   # Pool shares, rounding rules and full shift unit
/// ```
///
/// # Example
///
/// ```no_run
/// use tip_pool_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/standard").unwrap();
/// let role = loader.get_role("waiter").unwrap();
/// println!("{} is paid from {:?}", role.name, role.pool);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policy: PoolPolicy,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/standard")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The pool settings or role catalog violate a policy rule
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let roles = Self::load_yaml::<RolesConfig>(&path.join("roles.yaml"))?;
        let pools = Self::load_yaml::<PoolsConfig>(&path.join("pools.yaml"))?;

        Self::validate_roles(&roles.roles)?;
        Self::validate_pools(&pools)?;

        debug!(
            path = %path.display(),
            roles = roles.roles.len(),
            "Loaded pool configuration"
        );

        Ok(Self {
            policy: PoolPolicy::new(roles.roles, pools),
        })
    }

    /// Returns a loader holding the built-in standard policy.
    pub fn builtin() -> Self {
        Self {
            policy: PoolPolicy::default(),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Checks the role catalog for empty or duplicate ids.
    fn validate_roles(roles: &[RoleDefinition]) -> EngineResult<()> {
        if roles.is_empty() {
            return Err(EngineError::InvalidConfig {
                message: "role catalog is empty".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for role in roles {
            if role.id.trim().is_empty() {
                return Err(EngineError::InvalidConfig {
                    message: format!("role '{}' has an empty id", role.name),
                });
            }
            if !seen.insert(role.id.as_str()) {
                return Err(EngineError::InvalidConfig {
                    message: format!("duplicate role id '{}'", role.id),
                });
            }
        }
        Ok(())
    }

    /// Checks pool shares, rounding thresholds and the full shift unit.
    fn validate_pools(pools: &PoolsConfig) -> EngineResult<()> {
        for (name, settings) in [("pool1", &pools.pool1), ("pool2", &pools.pool2)] {
            if settings.share < Decimal::ZERO || settings.share > Decimal::ONE {
                return Err(EngineError::InvalidConfig {
                    message: format!("{} share {} must be between 0 and 1", name, settings.share),
                });
            }
            if let RoundingRule::Threshold { threshold } = settings.rounding {
                if threshold <= Decimal::ZERO || threshold > Decimal::ONE {
                    return Err(EngineError::InvalidConfig {
                        message: format!(
                            "{} rounding threshold {} must be above 0 and at most 1",
                            name, threshold
                        ),
                    });
                }
            }
        }

        let total_share = pools.pool1.share + pools.pool2.share;
        if total_share != Decimal::ONE {
            return Err(EngineError::InvalidConfig {
                message: format!("pool shares must add up to 1, got {}", total_share),
            });
        }

        if pools.full_shift_unit <= Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "full_shift_unit must be positive, got {}",
                    pools.full_shift_unit
                ),
            });
        }
        Ok(())
    }

    /// Returns the loaded pool policy.
    pub fn policy(&self) -> &PoolPolicy {
        &self.policy
    }

    /// Returns the role catalog as staff role tags.
    pub fn roles(&self) -> Vec<StaffRole> {
        self.policy
            .roles()
            .iter()
            .map(RoleDefinition::to_staff_role)
            .collect()
    }

    /// Gets a catalog role by its id.
    ///
    /// # Returns
    ///
    /// Returns the role if found, or `InvalidStaff` naming the `role` field.
    pub fn get_role(&self, role_id: &str) -> EngineResult<&RoleDefinition> {
        self.policy
            .role(role_id)
            .ok_or_else(|| EngineError::InvalidStaff {
                field: "role".to_string(),
                message: format!("unknown role '{}'", role_id),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PoolId;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn standard_config_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/standard")
    }

    fn write_config(roles: &str, pools: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tip-pool-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("roles.yaml"), roles).unwrap();
        fs::write(dir.join("pools.yaml"), pools).unwrap();
        dir
    }

    const ROLES: &str = r##"
roles:
  - id: waiter
    name: Waiter
    color: "#2196F3"
    pool: pool1
  - id: busser
    name: Busser
    color: "#4CAF50"
    pool: pool2
"##;

    const POOLS: &str = r#"
pool1:
  share: "0.97"
  rounding:
    mode: threshold
    threshold: "0.85"
pool2:
  share: "0.03"
  rounding:
    mode: ceiling
full_shift_unit: "6"
"#;

    #[test]
    fn test_load_standard_config_matches_builtin() {
        let loader = ConfigLoader::load(standard_config_path()).unwrap();
        assert_eq!(loader.policy(), ConfigLoader::builtin().policy());
    }

    #[test]
    fn test_load_custom_config() {
        let dir = write_config(ROLES, POOLS);
        let loader = ConfigLoader::load(&dir).unwrap();

        assert_eq!(loader.roles().len(), 2);
        assert_eq!(loader.policy().pool_for("busser"), Some(PoolId::Pool2));
        assert_eq!(loader.policy().full_shift_unit(), dec("6"));
        assert_eq!(loader.policy().currency_symbol(), "$");
    }

    #[test]
    fn test_missing_directory_returns_config_not_found() {
        let result = ConfigLoader::load("/nonexistent/tip-pool-config");
        assert!(matches!(result, Err(EngineError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = write_config("roles: [", POOLS);
        let result = ConfigLoader::load(&dir);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_role_without_pool_is_rejected() {
        let roles = "roles:\n  - id: host\n    name: Host\n    color: \"#000000\"\n";
        let dir = write_config(roles, POOLS);
        let result = ConfigLoader::load(&dir);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_duplicate_role_ids_are_rejected() {
        let roles = format!(
            "{}  - id: waiter\n    name: Waiter 2\n    color: \"#111111\"\n    pool: pool2\n",
            ROLES
        );
        let dir = write_config(&roles, POOLS);
        match ConfigLoader::load(&dir) {
            Err(EngineError::InvalidConfig { message }) => {
                assert!(message.contains("duplicate role id 'waiter'"))
            }
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_shares_must_add_up_to_one() {
        let pools = POOLS.replace("\"0.03\"", "\"0.05\"");
        let dir = write_config(ROLES, &pools);
        match ConfigLoader::load(&dir) {
            Err(EngineError::InvalidConfig { message }) => {
                assert!(message.contains("add up to 1"))
            }
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_full_shift_unit_must_be_positive() {
        let pools = POOLS.replace("full_shift_unit: \"6\"", "full_shift_unit: \"0\"");
        let dir = write_config(ROLES, &pools);
        assert!(matches!(
            ConfigLoader::load(&dir),
            Err(EngineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_get_role_unknown_returns_invalid_staff() {
        let loader = ConfigLoader::builtin();
        assert!(loader.get_role("bar").is_ok());
        assert!(matches!(
            loader.get_role("dishwasher"),
            Err(EngineError::InvalidStaff { .. })
        ));
    }
}
