//! External-service adapters
//!
//! - `text_generator`: trait boundary for the generative-text service
//! - `gemini_client`: HTTP implementation of that boundary
//! - `smart_fill`: free text → partial member record (fails loudly)
//! - `health_summary`: member list → prose summary (never fails)

pub mod gemini_client;
pub mod health_summary;
pub mod smart_fill;
pub mod text_generator;

pub use gemini_client::GeminiClient;
pub use health_summary::{HealthSummarizer, SummaryOutcome};
pub use smart_fill::{ParseFailure, SmartFill};
pub use text_generator::{GenerationError, GenerationRequest, TextGenerator};
