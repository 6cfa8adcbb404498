//! Durable storage for the roster and calculation history.
//!
//! The stored document carries a `schema_version`. Version 1 documents hold
//! shift magnitudes as percentages of a full shift (0 to 100); version 2 holds
//! hours. Older documents are upgraded step by step when loaded.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::calculation::FULL_SHIFT_UNIT;
use crate::error::{EngineError, EngineResult};
use crate::models::{Staff, TipCalculation};

/// The schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// The persisted form of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    /// Schema version of this document.
    pub schema_version: u32,
    /// The staff roster.
    #[serde(default)]
    pub staff: Vec<Staff>,
    /// Saved tip calculations.
    #[serde(default)]
    pub tip_calculations: Vec<TipCalculation>,
}

impl StoredState {
    /// Creates a current-version document.
    pub fn new(staff: Vec<Staff>, tip_calculations: Vec<TipCalculation>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            staff,
            tip_calculations,
        }
    }
}

/// A place the store's state can be loaded from and saved to.
pub trait StorageBackend: Send + Sync {
    /// Loads the stored state, upgrading older schemas.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> EngineResult<Option<StoredState>>;

    /// Replaces the stored state.
    fn save(&self, state: &StoredState) -> EngineResult<()>;

    /// Describes the storage location for log output.
    fn location(&self) -> String;
}

/// Stores the state as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Creates a storage backend for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, message: impl ToString) -> EngineError {
        EngineError::StorageError {
            path: self.path.display().to_string(),
            message: message.to_string(),
        }
    }
}

impl StorageBackend for JsonFileStorage {
    fn load(&self) -> EngineResult<Option<StoredState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.storage_error(e))?;
        let document: Value = serde_json::from_str(&content).map_err(|e| self.storage_error(e))?;
        migrate_document(document).map(Some)
    }

    fn save(&self, state: &StoredState) -> EngineResult<()> {
        let content = serde_json::to_string_pretty(state).map_err(|e| self.storage_error(e))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.storage_error(e))?;
        }
        // Replace atomically.
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(|e| self.storage_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.storage_error(e))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps the serialized document in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend preloaded with a raw JSON document.
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(document.into())),
        }
    }

    /// Returns the raw JSON document last saved, if any.
    pub fn document(&self) -> Option<String> {
        self.document.lock().ok().and_then(|d| d.clone())
    }

    fn poisoned() -> EngineError {
        EngineError::StorageError {
            path: "memory".to_string(),
            message: "storage lock poisoned".to_string(),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self) -> EngineResult<Option<StoredState>> {
        let guard = self.document.lock().map_err(|_| Self::poisoned())?;
        match guard.as_deref() {
            None => Ok(None),
            Some(content) => {
                let document: Value =
                    serde_json::from_str(content).map_err(|e| EngineError::StorageError {
                        path: "memory".to_string(),
                        message: e.to_string(),
                    })?;
                migrate_document(document).map(Some)
            }
        }
    }

    fn save(&self, state: &StoredState) -> EngineResult<()> {
        let content = serde_json::to_string(state).map_err(|e| EngineError::StorageError {
            path: "memory".to_string(),
            message: e.to_string(),
        })?;
        let mut guard = self.document.lock().map_err(|_| Self::poisoned())?;
        *guard = Some(content);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// Upgrades a raw stored document to the current schema and parses it.
///
/// Documents without a `schema_version` are version 1.
///
/// # Errors
///
/// Returns `UnsupportedSchemaVersion` for versions this build cannot read and
/// `StorageError` when the document does not match the schema.
pub fn migrate_document(mut document: Value) -> EngineResult<StoredState> {
    let mut version = match document.get("schema_version") {
        None => 1,
        Some(v) => v
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| malformed("schema_version is not a version number"))?,
    };

    if version == 0 || version > CURRENT_SCHEMA_VERSION {
        return Err(EngineError::UnsupportedSchemaVersion {
            version,
            latest: CURRENT_SCHEMA_VERSION,
        });
    }

    while version < CURRENT_SCHEMA_VERSION {
        match version {
            1 => upgrade_percent_shifts_to_hours(&mut document)?,
            other => {
                return Err(EngineError::UnsupportedSchemaVersion {
                    version: other,
                    latest: CURRENT_SCHEMA_VERSION,
                });
            }
        }
        version += 1;
        info!(schema_version = version, "Upgraded stored document");
    }

    if let Some(object) = document.as_object_mut() {
        object.insert("schema_version".to_string(), Value::from(version));
    }

    serde_json::from_value(document).map_err(malformed)
}

/// Version 1 to 2: converts percent-of-shift values into hours.
///
/// `100` percent becomes [`FULL_SHIFT_UNIT`] hours, rounded to one decimal.
fn upgrade_percent_shifts_to_hours(document: &mut Value) -> EngineResult<()> {
    if let Some(staff) = document.get_mut("staff").and_then(Value::as_array_mut) {
        for member in staff {
            convert_field(member, "lunch_shift")?;
            convert_field(member, "dinner_shift")?;
        }
    }

    if let Some(calculations) = document
        .get_mut("tip_calculations")
        .and_then(Value::as_array_mut)
    {
        for calculation in calculations {
            if let Some(lines) = calculation
                .get_mut("staff_members")
                .and_then(Value::as_array_mut)
            {
                for line in lines {
                    convert_field(line, "shift")?;
                }
            }
        }
    }
    Ok(())
}

fn convert_field(record: &mut Value, field: &str) -> EngineResult<()> {
    let Some(value) = record.get_mut(field) else {
        return Ok(());
    };
    let percent = decimal_from_value(value)
        .ok_or_else(|| malformed(format!("{} is not a number", field)))?;
    *value = Value::String(percent_to_hours(percent).to_string());
    Ok(())
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        _ => None,
    }
}

/// Converts a percent-of-full-shift value into hours.
///
/// # Examples
///
/// ```
/// use tip_pool_engine::store::percent_to_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(percent_to_hours(Decimal::from(100)), Decimal::from(6));
/// assert_eq!(percent_to_hours(Decimal::from(75)), Decimal::new(45, 1));
/// ```
pub fn percent_to_hours(percent: Decimal) -> Decimal {
    (percent / Decimal::ONE_HUNDRED * FULL_SHIFT_UNIT)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

fn malformed(message: impl ToString) -> EngineError {
    EngineError::StorageError {
        path: "document".to_string(),
        message: message.to_string(),
    }
}
