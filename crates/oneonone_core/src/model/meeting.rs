//! Meeting domain model.
//!
//! # Responsibility
//! - Define the canonical meeting record shared by host and invitee views.
//! - Provide stage ordering and role derivation helpers.
//!
//! # Invariants
//! - `id` is stable and never reused for another meeting.
//! - `host` and `invitee` differ and never change after creation.
//! - `stage` only moves forward: `A -> C -> F`.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Maximum title length accepted by storage collaborators.
pub const MEETING_TITLE_MAX_CHARS: usize = 255;

/// Stable identifier for every meeting record.
pub type MeetingId = Uuid;

/// Identifier of a user account as issued by the account service.
pub type UserId = i64;

/// Lifecycle stage of one meeting.
///
/// Serialized as the single-letter status codes used by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Waiting for the invitee to submit availability.
    #[serde(rename = "A")]
    AwaitingAvailability,
    /// Invitee availability is in; host may finalize.
    #[serde(rename = "C")]
    ReadyToFinalize,
    /// Meeting time is fixed.
    #[serde(rename = "F")]
    Finalized,
}

impl Stage {
    /// All stages in lifecycle order.
    pub const ALL: [Stage; 3] = [
        Stage::AwaitingAvailability,
        Stage::ReadyToFinalize,
        Stage::Finalized,
    ];

    /// Position in the lifecycle, starting at 0.
    pub fn ordinal(self) -> u8 {
        match self {
            Self::AwaitingAvailability => 0,
            Self::ReadyToFinalize => 1,
            Self::Finalized => 2,
        }
    }

    /// Record-store status letter.
    pub fn code(self) -> char {
        match self {
            Self::AwaitingAvailability => 'A',
            Self::ReadyToFinalize => 'C',
            Self::Finalized => 'F',
        }
    }

    /// Parses a record-store status letter.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(Self::AwaitingAvailability),
            'C' => Some(Self::ReadyToFinalize),
            'F' => Some(Self::Finalized),
            _ => None,
        }
    }

    /// Stable snake_case label used in logs and FFI payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingAvailability => "awaiting_availability",
            Self::ReadyToFinalize => "ready_to_finalize",
            Self::Finalized => "finalized",
        }
    }

    /// Next stage, or `None` once finalized.
    pub fn successor(self) -> Option<Self> {
        match self {
            Self::AwaitingAvailability => Some(Self::ReadyToFinalize),
            Self::ReadyToFinalize => Some(Self::Finalized),
            Self::Finalized => None,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship between a viewer and one meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Host,
    Invitee,
    Unrelated,
}

impl Role {
    /// Derives the viewer role by comparing against host and invitee ids.
    pub fn of(meeting: &Meeting, viewer: UserId) -> Self {
        if meeting.host == viewer {
            Self::Host
        } else if meeting.invitee == viewer {
            Self::Invitee
        } else {
            Self::Unrelated
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Invitee => "invitee",
            Self::Unrelated => "unrelated",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allowed meeting lengths in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum MeetingDuration {
    Minutes15,
    Minutes30,
    Minutes45,
    Minutes60,
    Minutes90,
    Minutes120,
}

impl MeetingDuration {
    pub fn minutes(self) -> u16 {
        match self {
            Self::Minutes15 => 15,
            Self::Minutes30 => 30,
            Self::Minutes45 => 45,
            Self::Minutes60 => 60,
            Self::Minutes90 => 90,
            Self::Minutes120 => 120,
        }
    }

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        match minutes {
            15 => Some(Self::Minutes15),
            30 => Some(Self::Minutes30),
            45 => Some(Self::Minutes45),
            60 => Some(Self::Minutes60),
            90 => Some(Self::Minutes90),
            120 => Some(Self::Minutes120),
            _ => None,
        }
    }
}

impl TryFrom<u16> for MeetingDuration {
    type Error = MeetingValidationError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_minutes(value).ok_or(MeetingValidationError::UnsupportedDuration(value))
    }
}

impl From<MeetingDuration> for u16 {
    fn from(value: MeetingDuration) -> Self {
        value.minutes()
    }
}

/// How the meeting takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingKind {
    InPerson,
    Phone,
    Video,
}

impl MeetingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InPerson => "in_person",
            Self::Phone => "phone",
            Self::Video => "video",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "in_person" => Some(Self::InPerson),
            "phone" => Some(Self::Phone),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// Validation failures for meeting records and edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingValidationError {
    NilId,
    BlankTitle,
    TitleTooLong { chars: usize },
    HostIsInvitee(UserId),
    UnsupportedDuration(u16),
}

impl Display for MeetingValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "meeting id must not be nil"),
            Self::BlankTitle => write!(f, "meeting title must not be blank"),
            Self::TitleTooLong { chars } => write!(
                f,
                "meeting title has {chars} chars; max is {MEETING_TITLE_MAX_CHARS}"
            ),
            Self::HostIsInvitee(user) => {
                write!(f, "host and invitee must differ (both are {user})")
            }
            Self::UnsupportedDuration(minutes) => {
                write!(f, "unsupported meeting duration: {minutes} minutes")
            }
        }
    }
}

impl Error for MeetingValidationError {}

/// Canonical meeting record.
///
/// One host and one invitee per record. Stage changes go through
/// `lifecycle::transition::apply`; nothing else should assign `stage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub title: String,
    pub description: String,
    pub duration: MeetingDuration,
    pub kind: MeetingKind,
    /// Owning user. Immutable once created.
    pub host: UserId,
    /// Single invited user. Immutable once created.
    pub invitee: UserId,
    #[serde(rename = "status")]
    pub stage: Stage,
}

impl Meeting {
    /// Creates a meeting in `AwaitingAvailability` with a generated id.
    ///
    /// # Errors
    /// - Returns validation error for blank titles or `host == invitee`.
    pub fn new(
        title: impl Into<String>,
        host: UserId,
        invitee: UserId,
    ) -> Result<Self, MeetingValidationError> {
        Self::with_id(Uuid::new_v4(), title, host, invitee)
    }

    /// Creates a meeting with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: MeetingId,
        title: impl Into<String>,
        host: UserId,
        invitee: UserId,
    ) -> Result<Self, MeetingValidationError> {
        let meeting = Self {
            id,
            title: title.into(),
            description: String::new(),
            duration: MeetingDuration::Minutes30,
            kind: MeetingKind::Video,
            host,
            invitee,
            stage: Stage::AwaitingAvailability,
        };
        meeting.validate()?;
        Ok(meeting)
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), MeetingValidationError> {
        if self.id.is_nil() {
            return Err(MeetingValidationError::NilId);
        }
        validate_title(&self.title)?;
        if self.host == self.invitee {
            return Err(MeetingValidationError::HostIsInvitee(self.host));
        }
        Ok(())
    }

    /// Viewer role for this meeting.
    pub fn role(&self, viewer: UserId) -> Role {
        Role::of(self, viewer)
    }

    /// The other participant from the viewer's point of view.
    ///
    /// Returns `None` for unrelated viewers.
    pub fn counterpart(&self, viewer: UserId) -> Option<UserId> {
        match self.role(viewer) {
            Role::Host => Some(self.invitee),
            Role::Invitee => Some(self.host),
            Role::Unrelated => None,
        }
    }
}

pub(crate) fn validate_title(title: &str) -> Result<(), MeetingValidationError> {
    if title.trim().is_empty() {
        return Err(MeetingValidationError::BlankTitle);
    }
    let chars = title.chars().count();
    if chars > MEETING_TITLE_MAX_CHARS {
        return Err(MeetingValidationError::TitleTooLong { chars });
    }
    Ok(())
}

#[derive(Deserialize)]
struct MeetingWire {
    id: MeetingId,
    title: String,
    #[serde(default)]
    description: String,
    duration: MeetingDuration,
    kind: MeetingKind,
    host: UserId,
    invitee: UserId,
    status: Stage,
}

impl<'de> Deserialize<'de> for Meeting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = MeetingWire::deserialize(deserializer)?;
        let meeting = Meeting {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            duration: wire.duration,
            kind: wire.kind,
            host: wire.host,
            invitee: wire.invitee,
            stage: wire.status,
        };
        meeting.validate().map_err(serde::de::Error::custom)?;
        Ok(meeting)
    }
}

/// Partial update applied by `EditDetails`.
///
/// `None` fields are left untouched. Stage, host and invitee are not
/// editable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<MeetingDuration>,
    pub kind: Option<MeetingKind>,
}

impl MeetingEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.duration.is_none()
            && self.kind.is_none()
    }

    /// Returns a copy of `meeting` with this edit applied and re-validated.
    pub fn applied_to(&self, meeting: &Meeting) -> Result<Meeting, MeetingValidationError> {
        let mut next = meeting.clone();
        if let Some(title) = self.title.as_ref() {
            next.title = title.trim().to_string();
        }
        if let Some(description) = self.description.as_ref() {
            next.description = description.clone();
        }
        if let Some(duration) = self.duration {
            next.duration = duration;
        }
        if let Some(kind) = self.kind {
            next.kind = kind;
        }
        next.validate()?;
        Ok(next)
    }
}

/// Input of the request-availability creation workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingDraft {
    pub title: String,
    pub description: String,
    pub duration: MeetingDuration,
    pub kind: MeetingKind,
    pub invitee: UserId,
}

impl MeetingDraft {
    /// Builds the initial `AwaitingAvailability` record hosted by `host`.
    pub fn into_meeting(self, host: UserId) -> Result<Meeting, MeetingValidationError> {
        let meeting = Meeting {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            description: self.description,
            duration: self.duration,
            kind: self.kind,
            host,
            invitee: self.invitee,
            stage: Stage::AwaitingAvailability,
        };
        meeting.validate()?;
        Ok(meeting)
    }
}
