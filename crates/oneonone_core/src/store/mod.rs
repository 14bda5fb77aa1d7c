//! Data-access contracts consumed by the service layer.
//!
//! # Responsibility
//! - Define the record-store, profile and notification collaborators.
//! - Provide in-memory reference adapters for tests and smoke binaries.
//!
//! # Invariants
//! - Fetch methods return records in store order; callers must not expect
//!   any particular sort.
//! - Store APIs return semantic errors (`NotFound`) in addition to backend
//!   failures.

use crate::model::meeting::{Meeting, MeetingId, MeetingValidationError, UserId};
use crate::model::profile::UserProfile;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;

pub use memory::{InMemoryMeetingStore, InMemoryProfileDirectory, OutboxNotifier};

pub type StoreResult<T> = Result<T, StoreError>;

/// Record-store failure.
#[derive(Debug)]
pub enum StoreError {
    NotFound(MeetingId),
    Duplicate(MeetingId),
    Validation(MeetingValidationError),
    /// Transport or backend failure reported by the collaborator.
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "meeting not found: {id}"),
            Self::Duplicate(id) => write!(f, "meeting already exists: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "record store failure: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MeetingValidationError> for StoreError {
    fn from(value: MeetingValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Meeting record store.
pub trait MeetingStore {
    fn fetch_meetings_by_host(&self, host: UserId) -> StoreResult<Vec<Meeting>>;
    fn fetch_meetings_by_invitee(&self, invitee: UserId) -> StoreResult<Vec<Meeting>>;
    fn get_meeting(&self, id: MeetingId) -> StoreResult<Option<Meeting>>;
    /// Inserts a new record. Rejects duplicated ids.
    fn insert_meeting(&mut self, meeting: &Meeting) -> StoreResult<()>;
    /// Replaces an existing record. Returns `NotFound` for unknown ids.
    fn persist_meeting(&mut self, meeting: &Meeting) -> StoreResult<()>;
    /// Removes a record. Returns `NotFound` for unknown ids.
    fn delete_meeting(&mut self, id: MeetingId) -> StoreResult<()>;
}

/// Profile lookup failure. Callers degrade to a placeholder label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileLookupError {
    UnknownUser(UserId),
    Unavailable(String),
}

impl Display for ProfileLookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownUser(id) => write!(f, "user profile not found: {id}"),
            Self::Unavailable(message) => write!(f, "profile lookup unavailable: {message}"),
        }
    }
}

impl Error for ProfileLookupError {}

/// Read-only account profile lookup.
pub trait ProfileDirectory {
    fn fetch_user_profile(&self, id: UserId) -> Result<UserProfile, ProfileLookupError>;
}

/// Notification delivery failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyError(pub String);

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "availability request delivery failed: {}", self.0)
    }
}

impl Error for NotifyError {}

/// Prompts an invitee to submit availability.
pub trait AvailabilityNotifier {
    fn request_availability(
        &mut self,
        meeting_id: MeetingId,
        invitee_contact: &str,
    ) -> Result<(), NotifyError>;
}
