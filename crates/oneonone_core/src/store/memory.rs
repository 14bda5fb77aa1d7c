//! In-memory collaborator adapters.
//!
//! Records keep insertion order. Nothing is persisted.

use super::{
    AvailabilityNotifier, MeetingStore, NotifyError, ProfileDirectory, ProfileLookupError,
    StoreError, StoreResult,
};
use crate::lifecycle::snapshot::MeetingSnapshot;
use crate::model::meeting::{Meeting, MeetingId, UserId};
use crate::model::profile::UserProfile;
use std::collections::HashMap;

/// Insertion-ordered meeting store backed by a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMeetingStore {
    records: Vec<Meeting>,
}

impl InMemoryMeetingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with pre-validated records.
    pub fn with_meetings(meetings: impl IntoIterator<Item = Meeting>) -> StoreResult<Self> {
        let mut store = Self::new();
        for meeting in meetings {
            store.insert_meeting(&meeting)?;
        }
        Ok(store)
    }

    /// Full copy of the current records.
    pub fn snapshot(&self) -> MeetingSnapshot {
        MeetingSnapshot::from_meetings(self.records.iter().cloned())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: MeetingId) -> Option<usize> {
        self.records.iter().position(|meeting| meeting.id == id)
    }
}

impl MeetingStore for InMemoryMeetingStore {
    fn fetch_meetings_by_host(&self, host: UserId) -> StoreResult<Vec<Meeting>> {
        Ok(self
            .records
            .iter()
            .filter(|meeting| meeting.host == host)
            .cloned()
            .collect())
    }

    fn fetch_meetings_by_invitee(&self, invitee: UserId) -> StoreResult<Vec<Meeting>> {
        Ok(self
            .records
            .iter()
            .filter(|meeting| meeting.invitee == invitee)
            .cloned()
            .collect())
    }

    fn get_meeting(&self, id: MeetingId) -> StoreResult<Option<Meeting>> {
        Ok(self.position(id).map(|index| self.records[index].clone()))
    }

    fn insert_meeting(&mut self, meeting: &Meeting) -> StoreResult<()> {
        meeting.validate()?;
        if self.position(meeting.id).is_some() {
            return Err(StoreError::Duplicate(meeting.id));
        }
        self.records.push(meeting.clone());
        Ok(())
    }

    fn persist_meeting(&mut self, meeting: &Meeting) -> StoreResult<()> {
        meeting.validate()?;
        let index = self
            .position(meeting.id)
            .ok_or(StoreError::NotFound(meeting.id))?;
        self.records[index] = meeting.clone();
        Ok(())
    }

    fn delete_meeting(&mut self, id: MeetingId) -> StoreResult<()> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        self.records.remove(index);
        Ok(())
    }
}

/// Profile directory backed by a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileDirectory {
    profiles: HashMap<UserId, UserProfile>,
}

impl InMemoryProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        let mut directory = Self::new();
        for profile in profiles {
            directory.insert(profile);
        }
        directory
    }

    pub fn insert(&mut self, profile: UserProfile) {
        self.profiles.insert(profile.id, profile);
    }
}

impl ProfileDirectory for InMemoryProfileDirectory {
    fn fetch_user_profile(&self, id: UserId) -> Result<UserProfile, ProfileLookupError> {
        self.profiles
            .get(&id)
            .cloned()
            .ok_or(ProfileLookupError::UnknownUser(id))
    }
}

/// One recorded availability request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxEntry {
    pub meeting_id: MeetingId,
    pub contact: String,
}

/// Notifier that records requests instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct OutboxNotifier {
    sent: Vec<OutboxEntry>,
}

impl OutboxNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[OutboxEntry] {
        &self.sent
    }
}

impl AvailabilityNotifier for OutboxNotifier {
    fn request_availability(
        &mut self,
        meeting_id: MeetingId,
        invitee_contact: &str,
    ) -> Result<(), NotifyError> {
        self.sent.push(OutboxEntry {
            meeting_id,
            contact: invitee_contact.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryMeetingStore;
    use crate::model::meeting::Meeting;
    use crate::store::{MeetingStore, StoreError};

    #[test]
    fn insert_rejects_duplicate_ids() {
        let meeting = Meeting::new("sync", 1, 2).unwrap();
        let mut store = InMemoryMeetingStore::new();
        store.insert_meeting(&meeting).unwrap();

        let err = store.insert_meeting(&meeting).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(id) if id == meeting.id));
    }

    #[test]
    fn persist_and_delete_unknown_ids_return_not_found() {
        let meeting = Meeting::new("sync", 1, 2).unwrap();
        let mut store = InMemoryMeetingStore::new();

        assert!(matches!(
            store.persist_meeting(&meeting).unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            store.delete_meeting(meeting.id).unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[test]
    fn fetch_keeps_insertion_order() {
        let first = Meeting::new("first", 1, 2).unwrap();
        let second = Meeting::new("second", 1, 3).unwrap();
        let store = InMemoryMeetingStore::with_meetings([first.clone(), second.clone()]).unwrap();

        let hosted = store.fetch_meetings_by_host(1).unwrap();
        assert_eq!(hosted, vec![first, second]);
        assert!(store.fetch_meetings_by_invitee(1).unwrap().is_empty());
    }
}
