//! HTTP API handlers for familypulse-survey

pub mod health;
pub mod members;
pub mod smart_fill;
pub mod sse;
pub mod summary;
pub mod survey;
pub mod ui;

pub use health::health_routes;
pub use members::member_routes;
pub use smart_fill::smart_fill_routes;
pub use sse::event_stream;
pub use summary::summary_routes;
pub use survey::survey_routes;
pub use ui::ui_routes;
