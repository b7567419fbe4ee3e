//! Health summary endpoints
//!
//! - `GET /api/summary` - cached summary for the current collection, or null
//! - `POST /api/summary` - generate a new one (always 200; service failures
//!   come back as the fixed error text and are not cached)

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::debug;

use crate::session::CachedSummary;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
    /// Collection revision the summary was computed from
    pub revision: u64,
    /// False when the collection changed mid-generation, was empty, or the
    /// service gave no usable summary
    pub cached: bool,
}

/// GET /api/summary
pub async fn get_summary(State(state): State<AppState>) -> Json<Option<CachedSummary>> {
    let session = state.session.read().await;
    Json(session.summary().cloned())
}

/// POST /api/summary
///
/// The session lock is released while the service is called; members may be
/// added or removed meanwhile, in which case the result is returned but not
/// cached.
pub async fn generate_summary(State(state): State<AppState>) -> ApiResult<Json<SummaryResponse>> {
    let _in_flight = state.summary_in_flight.try_acquire().ok_or_else(|| {
        ApiError::Conflict("Summary generation already in progress".to_string())
    })?;

    let (members, revision) = {
        let session = state.session.read().await;
        (
            session.members().snapshot().to_vec(),
            session.members().revision(),
        )
    };

    let outcome = state.summarizer.request(&members).await;
    let summary = outcome.text().to_string();

    // Fallback messages are returned but never stored as the current summary
    let cached = outcome.is_cacheable()
        && state
            .session
            .write()
            .await
            .record_summary(summary.clone(), revision);
    debug!(revision, cached, "Summary request finished");

    Ok(Json(SummaryResponse {
        summary,
        revision,
        cached,
    }))
}

pub fn summary_routes() -> Router<AppState> {
    Router::new().route("/api/summary", get(get_summary).post(generate_summary))
}
