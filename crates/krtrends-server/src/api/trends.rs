use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};

use krtrends_source::{collect_envelope, TrendsSource};

use crate::middleware::RequestId;

use super::AppState;

/// `GET /api/trends/rss`
pub(super) async fn rss_trends(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Response {
    respond(&state.rss, state.max_entries, &req_id).await
}

/// `GET /api/trends/scrape`
pub(super) async fn scrape_trends(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Response {
    respond(&state.scrape, state.max_entries, &req_id).await
}

async fn respond(source: &TrendsSource, max_entries: Option<usize>, req_id: &RequestId) -> Response {
    match collect_envelope(source, max_entries).await {
        Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        Err(error) => {
            tracing::warn!(
                request_id = %req_id.0,
                client = source.name(),
                "responding with error envelope"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
        }
    }
}
