//! Smart Fill: free text to partial member record
//!
//! Sends a person's informal description to the generative-text service with
//! a response schema fixing field names and enum values, then maps the JSON
//! reply onto a [`PartialMemberRecord`]. Any failure is a [`ParseFailure`];
//! an empty partial only ever means "the service found nothing".

use familypulse_common::models::{Gender, MaritalStatus, PartialMemberRecord};
use familypulse_common::validation::validate_age;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::text_generator::{GenerationError, GenerationRequest, TextGenerator};

/// Why a Smart Fill request produced no usable partial record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("No text to parse")]
    EmptyInput,

    #[error("Text service is not configured")]
    NotConfigured,

    #[error("Text service unreachable: {0}")]
    Transport(String),

    #[error("Text service error {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Text service returned no content")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Response does not match member schema: {0}")]
    SchemaViolation(String),
}

impl From<GenerationError> for ParseFailure {
    fn from(error: GenerationError) -> Self {
        match error {
            GenerationError::NotConfigured => ParseFailure::NotConfigured,
            GenerationError::Network(msg) => ParseFailure::Transport(msg),
            GenerationError::InvalidApiKey(status) => ParseFailure::Service {
                status,
                message: "API key rejected".to_string(),
            },
            GenerationError::Api(status, message) => ParseFailure::Service { status, message },
            GenerationError::Parse(msg) => ParseFailure::Malformed(msg),
        }
    }
}

/// Reply shape before range checks and blank-string normalization
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceMember {
    name: Option<String>,
    parent_spouse_name: Option<String>,
    relation_with_head: Option<String>,
    sex: Option<Gender>,
    age: Option<f64>,
    marital_status: Option<MaritalStatus>,
    health_problems: Option<String>,
}

/// Schema attached to every Smart Fill request
pub fn response_schema() -> Value {
    let sexes: Vec<&str> = Gender::ALL.iter().map(Gender::as_str).collect();
    let statuses: Vec<&str> = MaritalStatus::ALL.iter().map(MaritalStatus::as_str).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "parentSpouseName": {
                "type": "STRING",
                "description": "Husband or father name."
            },
            "relationWithHead": { "type": "STRING" },
            "sex": { "type": "STRING", "enum": sexes },
            "age": { "type": "NUMBER" },
            "maritalStatus": { "type": "STRING", "enum": statuses },
            "healthProblems": {
                "type": "STRING",
                "description": "Description of health issues, or 'None' if the text says the person is healthy."
            }
        }
    })
}

/// Instruction sent with the user's text
pub fn build_prompt(text: &str) -> String {
    format!(
        "Extract family member details from this text: \"{}\".\n\
         Only include fields the text mentions. Omit unmentioned fields instead of guessing \
         a default, except where context makes the value obvious \
         (e.g. 'wife' means sex is Female).\n\
         'parentSpouseName' maps to 'Husband/Father Name'.",
        text.trim()
    )
}

/// Map a raw service reply onto a partial record
///
/// Accepts an optional Markdown code fence around the JSON. Blank strings
/// and nulls count as absent.
pub fn parse_response(raw: &str) -> Result<PartialMemberRecord, ParseFailure> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(ParseFailure::EmptyResponse);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| ParseFailure::Malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(ParseFailure::Malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    let member: ServiceMember =
        serde_json::from_value(value).map_err(|e| ParseFailure::SchemaViolation(e.to_string()))?;

    let age = member.age.map(whole_age).transpose()?;

    Ok(PartialMemberRecord {
        name: non_blank(member.name),
        parent_spouse_name: non_blank(member.parent_spouse_name),
        relation_with_head: non_blank(member.relation_with_head),
        sex: member.sex,
        age,
        marital_status: member.marital_status,
        health_problems: non_blank(member.health_problems),
    })
}

fn whole_age(age: f64) -> Result<u8, ParseFailure> {
    if !age.is_finite() || age.fract() != 0.0 || age < 0.0 {
        return Err(ParseFailure::SchemaViolation(format!(
            "age {age} is not a whole number of years"
        )));
    }
    // Values above u32::MAX saturate and still fail the range check
    let years = age as u32;
    validate_age(years).map_err(|e| ParseFailure::SchemaViolation(e.to_string()))?;
    u8::try_from(years).map_err(|e| ParseFailure::SchemaViolation(e.to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Text-to-record parser backed by a [`TextGenerator`]
#[derive(Clone)]
pub struct SmartFill {
    generator: Arc<dyn TextGenerator>,
}

impl SmartFill {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Parse one free-text description
    ///
    /// Blank input fails with [`ParseFailure::EmptyInput`] without contacting
    /// the service.
    pub async fn request(&self, text: &str) -> Result<PartialMemberRecord, ParseFailure> {
        if text.trim().is_empty() {
            return Err(ParseFailure::EmptyInput);
        }

        debug!(
            generator = self.generator.name(),
            text_len = text.len(),
            "Smart fill requested"
        );

        let request = GenerationRequest::structured(build_prompt(text), response_schema());
        let result = match self.generator.generate(&request).await {
            Ok(raw) => parse_response(&raw),
            Err(e) => Err(ParseFailure::from(e)),
        };

        match &result {
            Ok(partial) => info!(fields = partial.field_count(), "Smart fill parsed"),
            Err(e) => warn!("Smart fill failed: {}", e),
        }
        result
    }
}
