//! SpecEduTracker: a daily log of mood, emotion, sensory issue and notes,
//! persisted as one JSON collection in local key/value storage.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use config::Config;
use db::{FileStorage, LogStore};
use services::LogService;

#[derive(Clone)]
pub struct AppState {
    pub logs: Arc<LogService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = match &config.storage_path {
            Some(path) => {
                tracing::info!(path = %path.display(), key = %config.storage_key, "Using file storage");
                LogStore::new(Arc::new(FileStorage::new(path)), config.storage_key.clone())
            }
            None => {
                tracing::warn!("No storage path configured, saving is disabled");
                LogStore::unavailable(config.storage_key.clone())
            }
        };

        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: LogStore) -> Self {
        Self {
            logs: Arc::new(LogService::new(store)),
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/api/options", get(handlers::daily_logs::log_options))
        .route(
            "/api/daily-logs",
            get(handlers::daily_logs::list_daily_logs).post(handlers::daily_logs::create_daily_log),
        )
        .route(
            "/api/daily-logs/latest",
            get(handlers::daily_logs::latest_daily_log),
        )
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = vec![config.frontend_url.parse::<HeaderValue>()?];
    for extra in &config.cors_extra_origins {
        match extra.parse::<HeaderValue>() {
            Ok(origin) => origins.push(origin),
            Err(e) => tracing::warn!(origin = %extra, error = %e, "Ignoring invalid CORS origin"),
        }
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]))
}
