//! Whole-survey endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post, put},
    Json, Router,
};
use familypulse_common::models::{MemberRecord, SurveyMetadata};
use serde::Serialize;

use crate::session::{CachedSummary, SurveySession};
use crate::{ApiResult, AppState};

/// Everything a view needs to render the page
#[derive(Debug, Serialize)]
pub struct SurveyView {
    pub metadata: SurveyMetadata,
    pub members: Vec<MemberRecord>,
    pub revision: u64,
    pub next_serial_no: u32,
    pub summary: Option<CachedSummary>,
    pub smart_fill_available: bool,
}

impl SurveyView {
    fn from_session(session: &SurveySession, smart_fill_available: bool) -> Self {
        Self {
            metadata: session.metadata().clone(),
            members: session.members().snapshot().to_vec(),
            revision: session.members().revision(),
            next_serial_no: session.members().next_serial_no(),
            summary: session.summary().cloned(),
            smart_fill_available,
        }
    }
}

/// GET /api/survey
pub async fn get_survey(State(state): State<AppState>) -> Json<SurveyView> {
    let session = state.session.read().await;
    Json(SurveyView::from_session(&session, state.text_service_configured))
}

/// PUT /api/survey/metadata
///
/// Metadata is opaque to the service and stored exactly as sent.
pub async fn update_metadata(
    State(state): State<AppState>,
    payload: Result<Json<SurveyMetadata>, JsonRejection>,
) -> ApiResult<Json<SurveyMetadata>> {
    let Json(metadata) = payload?;
    let mut session = state.session.write().await;
    session.set_metadata(metadata);
    Ok(Json(session.metadata().clone()))
}

/// POST /api/survey/reset
pub async fn reset_survey(State(state): State<AppState>) -> Json<SurveyView> {
    let mut session = state.session.write().await;
    session.reset();
    Json(SurveyView::from_session(&session, state.text_service_configured))
}

pub fn survey_routes() -> Router<AppState> {
    Router::new()
        .route("/api/survey", get(get_survey))
        .route("/api/survey/metadata", put(update_metadata))
        .route("/api/survey/reset", post(reset_survey))
}
