//! Event types for the FamilyPulse event system
//!
//! Every mutation of a survey session emits a [`SurveyEvent`] so that views
//! can re-render from the new authoritative state instead of polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

use crate::models::MemberId;

/// Survey session events
///
/// Serialized with a `type` tag for SSE transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SurveyEvent {
    /// Member appended to the collection
    MemberAdded {
        member_id: MemberId,
        serial_no: u32,
        member_count: usize,
        revision: u64,
        timestamp: DateTime<Utc>,
    },

    /// Member removed; remaining serial numbers were rewritten
    MemberRemoved {
        member_id: MemberId,
        member_count: usize,
        revision: u64,
        timestamp: DateTime<Utc>,
    },

    /// Cached health summary discarded because the collection changed
    SummaryInvalidated {
        revision: u64,
        timestamp: DateTime<Utc>,
    },

    /// Health summary generated and cached for `revision`
    SummaryGenerated {
        revision: u64,
        timestamp: DateTime<Utc>,
    },

    /// Survey header replaced
    MetadataUpdated { timestamp: DateTime<Utc> },

    /// Session cleared for a new survey
    SurveyReset { timestamp: DateTime<Utc> },
}

impl SurveyEvent {
    /// Event name used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            SurveyEvent::MemberAdded { .. } => "MemberAdded",
            SurveyEvent::MemberRemoved { .. } => "MemberRemoved",
            SurveyEvent::SummaryInvalidated { .. } => "SummaryInvalidated",
            SurveyEvent::SummaryGenerated { .. } => "SummaryGenerated",
            SurveyEvent::MetadataUpdated { .. } => "MetadataUpdated",
            SurveyEvent::SurveyReset { .. } => "SurveyReset",
        }
    }
}

/// Broadcast bus for [`SurveyEvent`]s
///
/// Cloning shares the underlying channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SurveyEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<SurveyEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: SurveyEvent,
    ) -> Result<usize, broadcast::error::SendError<SurveyEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: SurveyEvent) {
        let event_type = event.event_type();
        if self.tx.send(event).is_err() {
            trace!("No subscribers for {} event", event_type);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
