//! Application state for the Tip Pool Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::ConfigLoader;
use crate::store::AppStore;

/// Shared application state.
///
/// Holds the loaded pool configuration and the roster store. Store commands
/// are serialized through the write lock.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<RwLock<AppStore>>,
}

impl AppState {
    /// Creates a new application state from a configuration and a store.
    pub fn new(config: ConfigLoader, store: AppStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Creates a state with an empty, unpersisted store.
    pub fn in_memory(config: ConfigLoader) -> Self {
        let store = AppStore::new(config.policy().clone());
        Self::new(config, store)
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the shared roster store.
    pub fn store(&self) -> &RwLock<AppStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_in_memory_state_shares_store_between_clones() {
        let state = AppState::in_memory(ConfigLoader::builtin());
        let clone = state.clone();

        assert!(state.store().read().await.staff().is_empty());
        assert_eq!(clone.store().read().await.roles().len(), 6);
        assert!(Arc::ptr_eq(&state.store, &clone.store));
    }
}
