//! Configuration loading and management for the Tip Pool Engine.
//!
//! This module provides functionality to load the role catalog and pool
//! settings from YAML files, and the server settings read from the
//! environment.
//!
//! # Example
//!
//! ```no_run
//! use tip_pool_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/standard").unwrap();
//! println!("Full shift: {} hours", config.policy().full_shift_unit());
//! ```

mod loader;
mod settings;
mod types;

pub use loader::ConfigLoader;
pub use settings::ServerSettings;
pub use types::{PoolPolicy, PoolSettings, PoolsConfig, RoleDefinition, RolesConfig, RoundingRule};
