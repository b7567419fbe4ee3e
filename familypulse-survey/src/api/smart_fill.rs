//! Smart Fill endpoint
//!
//! `POST /api/smart-fill` with `{"text": "...", "draft": {...}?}` returns the
//! parsed partial record and, when a draft was sent, the draft with the
//! partial merged over it. On failure the draft is not touched and the
//! response is an error, never an empty partial.

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use familypulse_common::models::{merge_partial, MemberRecord, PartialMemberRecord};
use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct SmartFillRequest {
    pub text: String,
    #[serde(default)]
    pub draft: Option<MemberRecord>,
}

#[derive(Debug, Serialize)]
pub struct SmartFillResponse {
    pub partial: PartialMemberRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged: Option<MemberRecord>,
}

/// POST /api/smart-fill
///
/// **Errors:**
/// - 400: blank text
/// - 409: another Smart Fill request is outstanding
/// - 4xx `INVALID_BODY`: body is not a Smart Fill request
/// - 422: the service reply did not match the member schema
/// - 502: transport or service error
/// - 503: no API key configured
pub async fn smart_fill(
    State(state): State<AppState>,
    payload: Result<Json<SmartFillRequest>, JsonRejection>,
) -> ApiResult<Json<SmartFillResponse>> {
    let Json(payload) = payload?;
    let _in_flight = state
        .smart_fill_in_flight
        .try_acquire()
        .ok_or_else(|| ApiError::Conflict("Smart fill already in progress".to_string()))?;

    let partial = state.smart_fill.request(&payload.text).await?;
    let merged = payload.draft.map(|draft| merge_partial(draft, &partial));

    Ok(Json(SmartFillResponse { partial, merged }))
}

pub fn smart_fill_routes() -> Router<AppState> {
    Router::new().route("/api/smart-fill", post(smart_fill))
}
