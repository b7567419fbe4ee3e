//! Member collection endpoints
//!
//! - `GET /api/members` - snapshot in display order
//! - `POST /api/members` - validate and append
//! - `DELETE /api/members/:id` - remove and renumber
//! - `GET /api/members/draft` - defaults for the next entry

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use familypulse_common::models::{
    Gender, MaritalStatus, MemberId, MemberRecord, NO_HEALTH_ISSUES,
};
use familypulse_common::validation::{validate_age, validate_member};
use serde::Deserialize;
use tracing::debug;

use crate::store::CollectionState;
use crate::{ApiError, ApiResult, AppState};

fn default_health_problems() -> String {
    NO_HEALTH_ISSUES.to_string()
}

/// Request body for adding a member
///
/// Omitted fields take the form defaults. `id` is normally the id of a draft
/// from `/api/members/draft`; a fresh one is minted when absent. The serial
/// number is always assigned by the store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    #[serde(default)]
    pub id: Option<MemberId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent_spouse_name: String,
    #[serde(default)]
    pub relation_with_head: String,
    #[serde(default)]
    pub sex: Gender,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub marital_status: MaritalStatus,
    #[serde(default = "default_health_problems")]
    pub health_problems: String,
}

impl NewMember {
    /// Validated record ready for the store
    pub fn into_record(self) -> ApiResult<MemberRecord> {
        validate_age(self.age)?;
        let age = u8::try_from(self.age)
            .map_err(|_| ApiError::BadRequest(format!("Age {} is out of range", self.age)))?;

        let record = MemberRecord {
            id: self.id.unwrap_or_else(MemberId::generate),
            serial_no: 0,
            name: self.name.trim().to_string(),
            parent_spouse_name: self.parent_spouse_name.trim().to_string(),
            relation_with_head: self.relation_with_head.trim().to_string(),
            sex: self.sex,
            age,
            marital_status: self.marital_status,
            health_problems: self.health_problems.trim().to_string(),
        };
        validate_member(&record)?;
        Ok(record)
    }
}

/// GET /api/members
pub async fn list_members(State(state): State<AppState>) -> Json<Vec<MemberRecord>> {
    let session = state.session.read().await;
    Json(session.members().snapshot().to_vec())
}

/// POST /api/members
///
/// **Errors:**
/// - 400: empty name or age outside 0..=120
/// - 409: the id belongs to a current or previously deleted member
/// - 4xx `INVALID_BODY`: body is not a `NewMember` (e.g. negative age)
pub async fn add_member(
    State(state): State<AppState>,
    payload: Result<Json<NewMember>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CollectionState>)> {
    let Json(payload) = payload?;
    let record = payload.into_record()?;

    let mut session = state.session.write().await;
    if session.members().has_issued(record.id) {
        return Err(ApiError::Conflict(format!(
            "Member id {} has already been used",
            record.id
        )));
    }

    let collection = session.add_member(record);
    Ok((StatusCode::CREATED, Json(collection)))
}

/// DELETE /api/members/:id
///
/// Unknown ids are not an error: the response carries `changed: false`.
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CollectionState>> {
    let member_id: MemberId = id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid member id: {}", id)))?;

    let collection = state.session.write().await.remove_member(member_id);
    if !collection.changed {
        debug!(%member_id, "Delete requested for unknown member");
    }
    Ok(Json(collection))
}

/// GET /api/members/draft
pub async fn draft_member(State(state): State<AppState>) -> Json<MemberRecord> {
    let session = state.session.read().await;
    Json(session.create_draft())
}

pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/api/members", get(list_members).post(add_member))
        .route("/api/members/draft", get(draft_member))
        .route("/api/members/:id", delete(delete_member))
}
