//! # FamilyPulse Common Library
//!
//! Shared code for FamilyPulse services including:
//! - Survey record model (members, partial records, survey metadata)
//! - Caller-side validation of member records
//! - Configuration loading (TOML + environment)
//! - Event types (SurveyEvent enum) and EventBus
//! - SSE helpers
//! - Utility functions

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod sse;
pub mod uuid_utils;
pub mod validation;

pub use error::{Error, Result};
pub use models::{
    create_draft_record, is_no_health_issue, merge_partial, Gender, MaritalStatus, MemberId,
    MemberRecord, PartialMemberRecord, SurveyMetadata,
};
