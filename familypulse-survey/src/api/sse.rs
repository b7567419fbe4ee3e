//! Server-Sent Events for survey changes

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;

use crate::AppState;

/// GET /events - SSE stream of survey events
///
/// Views re-fetch `/api/survey` when they see MemberAdded, MemberRemoved,
/// SummaryInvalidated or SummaryGenerated.
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    familypulse_common::sse::create_event_sse_stream("familypulse-survey", &state.event_bus)
}
