//! Survey session state
//!
//! One session = survey metadata + member collection + cached health summary.
//! Every effective collection mutation discards the cached summary and emits
//! events. The session is shared behind a single `RwLock` in `AppState`;
//! handlers never hold that lock across a call to the external service.

use chrono::{DateTime, Utc};
use familypulse_common::events::{EventBus, SurveyEvent};
use familypulse_common::models::{create_draft_record, MemberId, MemberRecord, SurveyMetadata};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::store::{CollectionState, MemberCollection};

/// Health summary valid for one collection revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedSummary {
    pub text: String,
    pub revision: u64,
    pub generated_at: DateTime<Utc>,
}

pub struct SurveySession {
    metadata: SurveyMetadata,
    members: MemberCollection,
    summary: Option<CachedSummary>,
    event_bus: EventBus,
}

impl SurveySession {
    /// Empty survey dated today
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            metadata: SurveyMetadata::starting_today(),
            members: MemberCollection::new(),
            summary: None,
            event_bus,
        }
    }

    pub fn metadata(&self) -> &SurveyMetadata {
        &self.metadata
    }

    /// Replace the survey header (stored as-is)
    pub fn set_metadata(&mut self, metadata: SurveyMetadata) {
        self.metadata = metadata;
        self.event_bus.emit_lossy(SurveyEvent::MetadataUpdated {
            timestamp: Utc::now(),
        });
    }

    pub fn members(&self) -> &MemberCollection {
        &self.members
    }

    /// Draft for the next entry with form defaults
    pub fn create_draft(&self) -> MemberRecord {
        create_draft_record(self.members.next_serial_no())
    }

    /// Append a validated member; discards any cached summary
    pub fn add_member(&mut self, record: MemberRecord) -> CollectionState {
        let member_id = record.id;
        let state = self.members.add(record);
        let serial_no = state.members.last().map_or(0, |m| m.serial_no);

        info!(%member_id, serial_no, member_count = state.members.len(), "Member added");
        self.event_bus.emit_lossy(SurveyEvent::MemberAdded {
            member_id,
            serial_no,
            member_count: state.members.len(),
            revision: state.revision,
            timestamp: Utc::now(),
        });
        self.invalidate_summary(state.revision);
        state
    }

    /// Remove a member if present; unknown ids leave everything untouched
    pub fn remove_member(&mut self, member_id: MemberId) -> CollectionState {
        let state = self.members.remove(member_id);
        if !state.changed {
            return state;
        }

        info!(%member_id, member_count = state.members.len(), "Member removed");
        self.event_bus.emit_lossy(SurveyEvent::MemberRemoved {
            member_id,
            member_count: state.members.len(),
            revision: state.revision,
            timestamp: Utc::now(),
        });
        self.invalidate_summary(state.revision);
        state
    }

    pub fn summary(&self) -> Option<&CachedSummary> {
        self.summary.as_ref()
    }

    /// Cache a summary computed from the snapshot at `revision`
    ///
    /// Returns false (and caches nothing) when the collection changed while
    /// the summary was being generated.
    pub fn record_summary(&mut self, text: String, revision: u64) -> bool {
        if revision != self.members.revision() {
            debug!(
                summary_revision = revision,
                current_revision = self.members.revision(),
                "Discarding summary for outdated collection"
            );
            return false;
        }

        self.summary = Some(CachedSummary {
            text,
            revision,
            generated_at: Utc::now(),
        });
        self.event_bus.emit_lossy(SurveyEvent::SummaryGenerated {
            revision,
            timestamp: Utc::now(),
        });
        true
    }

    /// Start a new survey: members, summary and metadata are cleared
    pub fn reset(&mut self) {
        let state = self.members.clear();
        self.summary = None;
        self.metadata = SurveyMetadata::starting_today();
        info!(revision = state.revision, "Survey reset");
        self.event_bus.emit_lossy(SurveyEvent::SurveyReset {
            timestamp: Utc::now(),
        });
    }

    fn invalidate_summary(&mut self, revision: u64) {
        if self.summary.take().is_some() {
            debug!(revision, "Cached summary invalidated");
            self.event_bus.emit_lossy(SurveyEvent::SummaryInvalidated {
                revision,
                timestamp: Utc::now(),
            });
        }
    }
}

/// Per-adapter "request outstanding" flag
///
/// A second request while one is outstanding is refused rather than queued.
#[derive(Debug, Clone, Default)]
pub struct InFlightFlag(Arc<AtomicBool>);

impl InFlightFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag; `None` if it was already set
    pub fn try_acquire(&self) -> Option<InFlightGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(Arc::clone(&self.0)))
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Clears its [`InFlightFlag`] on drop
#[derive(Debug)]
pub struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
