//! In-memory meeting snapshot with id-addressed transitions.
//!
//! A snapshot is what callers fetched from the record store at one point in
//! time. Applying a command updates the snapshot only; writing the outcome
//! back to the store is the caller's job.

use crate::lifecycle::categorize::{categorize, MeetingBuckets};
use crate::lifecycle::transition::{apply, Command, TransitionError, TransitionOutcome};
use crate::model::meeting::{Meeting, MeetingId, UserId};

/// Ordered collection of meetings keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingSnapshot {
    meetings: Vec<Meeting>,
}

impl MeetingSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot, keeping the first record for duplicated ids.
    pub fn from_meetings(meetings: impl IntoIterator<Item = Meeting>) -> Self {
        let mut snapshot = Self::new();
        for meeting in meetings {
            snapshot.insert(meeting);
        }
        snapshot
    }

    /// Appends a meeting unless its id is already present.
    ///
    /// Returns `false` for duplicates.
    pub fn insert(&mut self, meeting: Meeting) -> bool {
        if self.get(meeting.id).is_some() {
            return false;
        }
        self.meetings.push(meeting);
        true
    }

    pub fn get(&self, id: MeetingId) -> Option<&Meeting> {
        self.meetings.iter().find(|meeting| meeting.id == id)
    }

    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    pub fn len(&self) -> usize {
        self.meetings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }

    /// Buckets for `viewer`, in snapshot order.
    pub fn categorize(&self, viewer: UserId) -> MeetingBuckets {
        categorize(&self.meetings, viewer)
    }

    /// Applies `command` to the meeting with `id`.
    ///
    /// # Errors
    /// - `NotFound` when `id` is not in the snapshot (including after delete).
    /// - Any transition error; the snapshot is unchanged in that case.
    pub fn apply(
        &mut self,
        id: MeetingId,
        command: &Command,
        actor: UserId,
    ) -> Result<TransitionOutcome, TransitionError> {
        let index = self
            .meetings
            .iter()
            .position(|meeting| meeting.id == id)
            .ok_or(TransitionError::NotFound(id))?;

        let outcome = apply(&self.meetings[index], command, actor)?;
        match &outcome {
            TransitionOutcome::Updated(meeting) => self.meetings[index] = meeting.clone(),
            TransitionOutcome::Deleted(_) => {
                self.meetings.remove(index);
            }
        }
        Ok(outcome)
    }
}
