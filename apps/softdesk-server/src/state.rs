//! Application state.

use std::sync::Arc;

use auth::JwtManager;
use tracker_store::TrackerStore;

use crate::config::Config;

/// Shared application state.
pub struct AppState<S: TrackerStore> {
    /// Server configuration.
    pub config: Config,
    /// Tracker store.
    pub store: S,
    /// Issues and validates tokens.
    pub jwt_manager: JwtManager,
}

impl<S: TrackerStore> AppState<S> {
    /// Creates new application state.
    pub fn new(config: Config, store: S, jwt_manager: JwtManager) -> Self {
        Self {
            config,
            store,
            jwt_manager,
        }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from config and store.
pub fn create_shared_state<S: TrackerStore>(
    config: Config,
    store: S,
    jwt_manager: JwtManager,
) -> SharedState<S> {
    Arc::new(AppState::new(config, store, jwt_manager))
}
