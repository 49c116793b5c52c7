use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

pub mod config;
pub mod dates;
pub mod error;
pub mod forecast;
pub mod handlers;
pub mod models;
pub mod scoring;
pub mod store;

use config::Config;
use forecast::Reconciler;
use store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub reconciler: Reconciler,
    pub config: Arc<Config>,
}

/// Build the full route table over a prepared state. Layers (CORS, trace)
/// are the binary's concern.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route(
            "/api/users/:user_id/daily-logs",
            post(handlers::daily_logs::upsert_daily_log).get(handlers::daily_logs::list_daily_logs),
        )
        .route(
            "/api/users/:user_id/daily-logs/:date",
            get(handlers::daily_logs::get_daily_log),
        )
        .route(
            "/api/users/:user_id/forecast",
            get(handlers::forecast::get_seven_day_forecast),
        )
        .route(
            "/api/users/:user_id/forecast/generate",
            post(handlers::forecast::generate_forecast),
        )
        .with_state(state)
}
