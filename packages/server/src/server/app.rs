//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::matching::data::{InMemoryLocationStore, LocationStore, PgLocationStore};
use crate::domains::matching::{MatchEngine, MatchingService, RequestLedger};
use crate::server::routes::{
    buddy_location_handler, buddy_response_handler, complete_request_handler, health_handler,
    request_help_handler, request_status_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MatchingService>,
    pub store: Arc<dyn LocationStore>,
    pub db_pool: Option<PgPool>,
    pub default_radius_km: f64,
}

/// Build the Axum application router
///
/// The location store is Postgres-backed when a pool is supplied and
/// in-memory otherwise; engine and ledger share one store instance so
/// reservations and releases see the same availability flags.
pub fn build_app(config: &Config, db_pool: Option<PgPool>) -> Router {
    let store: Arc<dyn LocationStore> = match &db_pool {
        Some(pool) => Arc::new(PgLocationStore::new(pool.clone())),
        None => Arc::new(InMemoryLocationStore::new()),
    };

    let freshness_window = chrono::Duration::seconds(config.freshness_window_secs as i64);
    let service = Arc::new(MatchingService::new(
        MatchEngine::new(store.clone(), freshness_window),
        RequestLedger::new(store.clone()),
    ));

    let state = AppState {
        service,
        store,
        db_pool,
        default_radius_km: config.default_radius_km,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/buddy-location", post(buddy_location_handler))
        .route("/request-help", post(request_help_handler))
        .route("/buddy-response", post(buddy_response_handler))
        .route("/complete-request", post(complete_request_handler))
        .route("/request-status/:request_id", get(request_status_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors)
}
