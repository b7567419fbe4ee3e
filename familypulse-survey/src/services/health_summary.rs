//! Household health summary
//!
//! Stateless: callers own staleness. Never fails the caller; every failure
//! is folded into a fixed user-visible message.

use familypulse_common::models::MemberRecord;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::text_generator::{GenerationRequest, TextGenerator};

/// Returned for an empty collection, without contacting the service
pub const NO_MEMBERS_MESSAGE: &str = "No members to analyze.";
/// Returned when the service replies with no text
pub const EMPTY_SUMMARY_MESSAGE: &str = "Could not generate summary.";
/// Returned when the service call fails
pub const SUMMARY_ERROR_MESSAGE: &str = "Error generating health summary.";

/// Word limit requested from the service
pub const SUMMARY_WORD_LIMIT: usize = 100;

/// `name (age, sex): healthProblems`
pub fn member_line(member: &MemberRecord) -> String {
    format!(
        "{} ({}, {}): {}",
        member.name, member.age, member.sex, member.health_problems
    )
}

pub fn build_prompt(members: &[MemberRecord]) -> String {
    let data = members
        .iter()
        .map(member_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the following family health data and provide a concise summary \
         (max {SUMMARY_WORD_LIMIT} words).\n\
         Highlight any at-risk individuals or general observations.\n\n\
         Data:\n{data}"
    )
}

/// Result of one summary request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// Empty collection; the service was not contacted
    NoMembers,
    /// Trimmed reply text
    Generated(String),
    /// The service answered with blank text
    EmptyReply,
    /// Transport, service or configuration error
    Failed,
}

impl SummaryOutcome {
    /// User-visible text for this outcome
    pub fn text(&self) -> &str {
        match self {
            SummaryOutcome::NoMembers => NO_MEMBERS_MESSAGE,
            SummaryOutcome::Generated(text) => text,
            SummaryOutcome::EmptyReply => EMPTY_SUMMARY_MESSAGE,
            SummaryOutcome::Failed => SUMMARY_ERROR_MESSAGE,
        }
    }

    /// Only real summaries are worth keeping for the current collection
    pub fn is_cacheable(&self) -> bool {
        matches!(self, SummaryOutcome::Generated(_))
    }

    pub fn into_text(self) -> String {
        match self {
            SummaryOutcome::Generated(text) => text,
            other => other.text().to_string(),
        }
    }
}

/// Summary generator backed by a [`TextGenerator`]
#[derive(Clone)]
pub struct HealthSummarizer {
    generator: Arc<dyn TextGenerator>,
}

impl HealthSummarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Summarize `members` in collection order
    pub async fn summarize(&self, members: &[MemberRecord]) -> String {
        self.request(members).await.into_text()
    }

    /// Like [`HealthSummarizer::summarize`], keeping the kind of result
    pub async fn request(&self, members: &[MemberRecord]) -> SummaryOutcome {
        if members.is_empty() {
            debug!("Summary requested for empty collection");
            return SummaryOutcome::NoMembers;
        }

        let at_risk = members.iter().filter(|m| m.has_health_problems()).count();
        debug!(
            generator = self.generator.name(),
            members = members.len(),
            at_risk,
            "Requesting health summary"
        );

        let request = GenerationRequest::text(build_prompt(members));
        match self.generator.generate(&request).await {
            Ok(text) if text.trim().is_empty() => {
                warn!("Health summary reply was empty");
                SummaryOutcome::EmptyReply
            }
            Ok(text) => {
                info!(members = members.len(), "Health summary generated");
                SummaryOutcome::Generated(text.trim().to_string())
            }
            Err(e) => {
                warn!("Health summary failed: {}", e);
                SummaryOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::text_generator::stub::StubGenerator;
    use crate::services::text_generator::GenerationError;
    use familypulse_common::models::{create_draft_record, Gender};

    fn member(name: &str, age: u8, sex: Gender, health: &str) -> MemberRecord {
        MemberRecord {
            name: name.to_string(),
            age,
            sex,
            health_problems: health.to_string(),
            ..create_draft_record(1)
        }
    }

    #[test]
    fn test_member_line_format() {
        let line = member_line(&member("John", 45, Gender::Male, "Diabetes"));
        assert_eq!(line, "John (45, Male): Diabetes");
    }

    #[test]
    fn test_prompt_keeps_collection_order() {
        let prompt = build_prompt(&[
            member("Zed", 70, Gender::Male, "Arthritis"),
            member("Amy", 9, Gender::Female, "None"),
        ]);
        assert!(prompt.contains("max 100 words"));
        assert!(prompt.ends_with("Zed (70, Male): Arthritis\nAmy (9, Female): None"));
    }

    #[tokio::test]
    async fn test_empty_collection_skips_service() {
        let stub = Arc::new(StubGenerator::replying("should not be used"));
        let summarizer = HealthSummarizer::new(stub.clone());

        assert_eq!(summarizer.summarize(&[]).await, NO_MEMBERS_MESSAGE);
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn test_summary_text_is_returned() {
        let stub = Arc::new(StubGenerator::replying("  John needs diabetes follow-up.\n"));
        let summarizer = HealthSummarizer::new(stub.clone());

        let summary = summarizer
            .summarize(&[member("John", 45, Gender::Male, "Diabetes")])
            .await;

        assert_eq!(summary, "John needs diabetes follow-up.");
        let sent = stub.last_request().unwrap();
        assert!(sent.response_schema.is_none());
        assert!(sent.prompt.contains("John (45, Male): Diabetes"));
    }

    #[tokio::test]
    async fn test_failure_becomes_error_message() {
        let stub = Arc::new(StubGenerator::failing(GenerationError::Api(
            503,
            "overloaded".to_string(),
        )));
        let summarizer = HealthSummarizer::new(stub);

        let summary = summarizer
            .summarize(&[member("Jane", 42, Gender::Female, "None")])
            .await;
        assert_eq!(summary, SUMMARY_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_empty_reply_message() {
        let summarizer = HealthSummarizer::new(Arc::new(StubGenerator::replying("   ")));
        let summary = summarizer
            .summarize(&[member("Jane", 42, Gender::Female, "None")])
            .await;
        assert_eq!(summary, EMPTY_SUMMARY_MESSAGE);
    }

    #[tokio::test]
    async fn test_only_generated_outcome_is_cacheable() {
        let jane = [member("Jane", 42, Gender::Female, "None")];

        let failed = HealthSummarizer::new(Arc::new(StubGenerator::failing(
            GenerationError::Network("down".to_string()),
        )))
        .request(&jane)
        .await;
        assert_eq!(failed, SummaryOutcome::Failed);
        assert!(!failed.is_cacheable());

        let empty = HealthSummarizer::new(Arc::new(StubGenerator::replying("")))
            .request(&jane)
            .await;
        assert!(!empty.is_cacheable());

        assert!(!SummaryOutcome::NoMembers.is_cacheable());

        let generated = HealthSummarizer::new(Arc::new(StubGenerator::replying("Fine.")))
            .request(&jane)
            .await;
        assert!(generated.is_cacheable());
        assert_eq!(generated.text(), "Fine.");
    }
}
