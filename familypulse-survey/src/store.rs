//! Member Collection Store
//!
//! Owns the ordered member list of one survey. Insertion order is display
//! order; serial numbers are always exactly `1..=len` after any mutation.
//! The store trusts its input: validation happens before [`MemberCollection::add`].
//! Member ids are never reused: once added, an id stays known to the store
//! even after its member is removed or the collection is cleared.

use familypulse_common::models::{MemberId, MemberRecord};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Authoritative view returned by every mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionState {
    pub members: Vec<MemberRecord>,
    /// Bumped on every effective mutation
    pub revision: u64,
    /// False when the mutation was a no-op (e.g. removing an unknown id)
    pub changed: bool,
}

/// Ordered member collection for one survey
#[derive(Debug, Clone, Default)]
pub struct MemberCollection {
    members: Vec<MemberRecord>,
    revision: u64,
    /// Every id ever added, including removed members
    issued_ids: HashSet<MemberId>,
}

impl MemberCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member
    ///
    /// The store assigns the serial number (`len + 1`); whatever the record
    /// carried is replaced.
    pub fn add(&mut self, record: MemberRecord) -> CollectionState {
        let serial_no = self.next_serial_no();
        debug!(member_id = %record.id, serial_no, "Adding member");

        self.issued_ids.insert(record.id);
        self.members.push(record.with_serial_no(serial_no));
        self.revision += 1;
        self.state(true)
    }

    /// Remove the member with `id`, then renumber the rest
    ///
    /// Unknown ids are a no-op: nothing changes and the revision stays put.
    pub fn remove(&mut self, id: MemberId) -> CollectionState {
        let Some(position) = self.members.iter().position(|m| m.id == id) else {
            debug!(member_id = %id, "Remove ignored, member not in collection");
            return self.state(false);
        };

        self.members.remove(position);
        self.members = std::mem::take(&mut self.members)
            .into_iter()
            .zip(1u32..)
            .map(|(member, serial_no)| member.with_serial_no(serial_no))
            .collect();
        self.revision += 1;

        debug!(member_id = %id, remaining = self.members.len(), "Removed member");
        self.state(true)
    }

    /// Read-only view in display order
    pub fn snapshot(&self) -> &[MemberRecord] {
        &self.members
    }

    pub fn get(&self, id: MemberId) -> Option<&MemberRecord> {
        self.members.iter().find(|m| m.id == id)
    }

    /// True if `id` belongs to a current or former member
    pub fn has_issued(&self, id: MemberId) -> bool {
        self.issued_ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Serial number the next added member will receive
    pub fn next_serial_no(&self) -> u32 {
        u32::try_from(self.members.len()).map_or(u32::MAX, |len| len.saturating_add(1))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drop every member; counts as a mutation when anything was removed
    ///
    /// Removed ids stay issued.
    pub fn clear(&mut self) -> CollectionState {
        if self.members.is_empty() {
            return self.state(false);
        }
        self.members.clear();
        self.revision += 1;
        self.state(true)
    }

    fn state(&self, changed: bool) -> CollectionState {
        CollectionState {
            members: self.members.clone(),
            revision: self.revision,
            changed,
        }
    }
}
