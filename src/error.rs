//! Error types for the Tip Pool Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine's collaborators can report. The distribution
//! engine itself is total and never returns an error.

use thiserror::Error;

/// The main error type for the Tip Pool Engine.
///
/// Configuration loading, input validation, the roster store and the
/// persistence layer all return this error type.
///
/// # Example
///
/// ```
/// use tip_pool_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/roles.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/roles.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but violates a pool policy rule.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the violated rule.
        message: String,
    },

    /// A tip amount was missing, non-numeric, zero or negative.
    #[error("Invalid tip amount '{input}': {message}")]
    InvalidAmount {
        /// The raw input that was rejected.
        input: String,
        /// A description suitable for showing next to the input field.
        message: String,
    },

    /// A staff record was invalid or contained inconsistent data.
    #[error("Invalid staff field '{field}': {message}")]
    InvalidStaff {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Another staff member already uses this name.
    #[error("A staff member named '{name}' already exists")]
    DuplicateStaffName {
        /// The conflicting name.
        name: String,
    },

    /// No staff member with the given id exists in the roster.
    #[error("Staff not found: {id}")]
    StaffNotFound {
        /// The id that was not found.
        id: String,
    },

    /// A calculation was saved without any paid staff members.
    #[error("Select at least one staff member before saving a calculation")]
    NoStaffSelected,

    /// A saved calculation already uses this id.
    #[error("A tip calculation with id '{id}' already exists")]
    DuplicateCalculationId {
        /// The conflicting id.
        id: String,
    },

    /// No tip calculation with the given id exists in the history.
    #[error("Tip calculation not found: {id}")]
    CalculationNotFound {
        /// The id that was not found.
        id: String,
    },

    /// Reading or writing the data file failed.
    #[error("Storage error for '{path}': {message}")]
    StorageError {
        /// The storage location involved.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// The stored document was written by a newer schema than this build knows.
    #[error("Unsupported schema version {version} (latest supported is {latest})")]
    UnsupportedSchemaVersion {
        /// The version found in the document.
        version: u32,
        /// The newest version this build can read.
        latest: u32,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/roles.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/roles.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/pools.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/pools.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_amount_displays_input_and_message() {
        let error = EngineError::InvalidAmount {
            input: "abc".to_string(),
            message: "Please enter a valid amount".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid tip amount 'abc': Please enter a valid amount"
        );
    }

    #[test]
    fn test_duplicate_staff_name_displays_name() {
        let error = EngineError::DuplicateStaffName {
            name: "Maria".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "A staff member named 'Maria' already exists"
        );
    }

    #[test]
    fn test_not_found_errors_display_id() {
        let staff = EngineError::StaffNotFound {
            id: "s1".to_string(),
        };
        let calc = EngineError::CalculationNotFound {
            id: "1700000000000".to_string(),
        };
        assert_eq!(staff.to_string(), "Staff not found: s1");
        assert_eq!(
            calc.to_string(),
            "Tip calculation not found: 1700000000000"
        );
    }

    #[test]
    fn test_calculation_save_errors_display() {
        assert_eq!(
            EngineError::NoStaffSelected.to_string(),
            "Select at least one staff member before saving a calculation"
        );
        let duplicate = EngineError::DuplicateCalculationId {
            id: "1700000000000".to_string(),
        };
        assert_eq!(
            duplicate.to_string(),
            "A tip calculation with id '1700000000000' already exists"
        );
    }

    #[test]
    fn test_unsupported_schema_version_displays_both_versions() {
        let error = EngineError::UnsupportedSchemaVersion {
            version: 9,
            latest: 2,
        };
        assert_eq!(
            error.to_string(),
            "Unsupported schema version 9 (latest supported is 2)"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_staff_not_found() -> EngineResult<()> {
            Err(EngineError::StaffNotFound {
                id: "missing".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_staff_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
