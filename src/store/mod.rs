//! Staff roster and calculation history storage.
//!
//! [`AppStore`] holds the in-memory state and [`StorageBackend`]
//! implementations keep it across restarts.

mod app_store;
mod persistence;

pub use app_store::{AppSnapshot, AppStore, HistorySummary};
pub use persistence::{
    CURRENT_SCHEMA_VERSION, JsonFileStorage, MemoryStorage, StorageBackend, StoredState,
    migrate_document, percent_to_hours,
};
