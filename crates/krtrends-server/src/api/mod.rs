mod trends;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use krtrends_core::AppConfig;
use krtrends_source::{SourceError, TrendsSource};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub rss: Arc<TrendsSource>,
    pub scrape: Arc<TrendsSource>,
    /// `None` disables truncation.
    pub max_entries: Option<usize>,
}

impl AppState {
    /// Builds both upstream clients from config.
    ///
    /// # Errors
    ///
    /// Propagates client construction errors.
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        Ok(Self {
            rss: Arc::new(TrendsSource::rss_from_config(config)?),
            scrape: Arc::new(TrendsSource::scrape_from_config(config)?),
            max_entries: config.max_entries,
        })
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

/// Any origin may read the trend endpoints.
fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/trends/rss", get(trends::rss_trends))
        .route("/api/trends/scrape", get(trends::scrape_trends))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> Json<HealthData> {
    Json(HealthData { status: "ok" })
}
