//! SoftDesk Server
//!
//! REST API for tracking issues across projects: accounts, projects and
//! their contributors, issues and comments, with token authentication and
//! per-project access control.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod policy;
pub mod scope;
pub mod state;
pub mod validation;

use std::sync::Arc;

use auth::JwtManager;
use axum::{Router, http::HeaderValue};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracker_store::TrackerStore;

use crate::config::{Config, LogFormat};
use crate::state::{AppState, create_shared_state};

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the application router with all routes configured.
pub fn create_app<S: TrackerStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let cors = cors_layer(&state.config);

    api::create_router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::authenticate::<S>,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Creates the application state with the given configuration and store.
pub fn create_state<S: TrackerStore>(config: Config, store: S) -> Arc<AppState<S>> {
    let jwt_manager = JwtManager::new(config.jwt_config());
    create_shared_state(config, store, jwt_manager)
}

/// Initializes tracing with the given log level and output format.
pub fn init_tracing(log_level: &str, format: LogFormat) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}
