//! familypulse-survey library - household survey service
//!
//! Holds one survey session in memory and serves it over HTTP, with optional
//! Smart Fill and health summaries from a generative-text service.

pub mod api;
pub mod error;
pub mod services;
pub mod session;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use familypulse_common::events::EventBus;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::services::{HealthSummarizer, SmartFill, TextGenerator};
use crate::session::{InFlightFlag, SurveySession};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The survey being filled in; never locked across an external call
    pub session: Arc<RwLock<SurveySession>>,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    pub smart_fill: SmartFill,
    pub summarizer: HealthSummarizer,
    pub smart_fill_in_flight: InFlightFlag,
    pub summary_in_flight: InFlightFlag,
    /// Whether an API key was found at startup
    pub text_service_configured: bool,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        text_service_configured: bool,
        event_bus: EventBus,
    ) -> Self {
        Self {
            session: Arc::new(RwLock::new(SurveySession::new(event_bus.clone()))),
            event_bus,
            smart_fill: SmartFill::new(Arc::clone(&generator)),
            summarizer: HealthSummarizer::new(generator),
            smart_fill_in_flight: InFlightFlag::new(),
            summary_in_flight: InFlightFlag::new(),
            text_service_configured,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .merge(api::ui_routes())
        .merge(api::survey_routes())
        .merge(api::member_routes())
        .merge(api::smart_fill_routes())
        .merge(api::summary_routes())
        .merge(api::health_routes())
        .route("/events", get(api::event_stream))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
