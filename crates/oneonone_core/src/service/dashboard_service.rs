//! Meeting dashboard use-case service.
//!
//! # Responsibility
//! - Fetch host/invitee snapshots and assemble bucketed dashboard cards.
//! - Run viewer actions through the transition engine and write results back.
//! - Resolve invitee contacts for availability requests.
//!
//! # Invariants
//! - Legality is decided by `lifecycle` before any collaborator side effect.
//! - Profile lookup failures never fail dashboard assembly.
//! - Logs carry ids, stages and actions only; never titles or contacts.

use crate::lifecycle::authorize::{legal_actions, Action, ActionSet};
use crate::lifecycle::categorize::MeetingBuckets;
use crate::lifecycle::snapshot::MeetingSnapshot;
use crate::lifecycle::transition::{apply, Command, TransitionError, TransitionOutcome};
use crate::model::meeting::{Meeting, MeetingDraft, MeetingId, MeetingValidationError, UserId};
use crate::model::profile::UNKNOWN_USER_LABEL;
use crate::store::{
    AvailabilityNotifier, MeetingStore, NotifyError, ProfileDirectory, ProfileLookupError,
    StoreError,
};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

static CONTACT_EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Service error for dashboard use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Target meeting does not exist in the store.
    MeetingNotFound(MeetingId),
    /// Transition engine rejected the command.
    Transition(TransitionError),
    /// New meeting input breaks a record invariant.
    Validation(MeetingValidationError),
    /// Record-store failure.
    Store(StoreError),
    /// Invitee contact could not be resolved for an availability request.
    ProfileLookupFailed(ProfileLookupError),
    /// Resolved contact is not a usable email address.
    InvalidContact(UserId),
    /// Notification collaborator failed.
    NotifyFailed(NotifyError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl ServiceError {
    /// Stable error code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MeetingNotFound(_) => "meeting_not_found",
            Self::Transition(TransitionError::Unauthorized { .. }) => "unauthorized",
            Self::Transition(TransitionError::InvalidStage { .. }) => "invalid_stage",
            Self::Transition(TransitionError::NotFound(_)) => "meeting_not_found",
            Self::Transition(TransitionError::InvalidEdit(_)) => "invalid_edit",
            Self::Validation(_) => "invalid_meeting",
            Self::Store(_) => "store_failed",
            Self::ProfileLookupFailed(_) => "profile_lookup_failed",
            Self::InvalidContact(_) => "invalid_contact",
            Self::NotifyFailed(_) => "notify_failed",
            Self::InconsistentState(_) => "inconsistent_state",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MeetingNotFound(id) => write!(f, "meeting not found: {id}"),
            Self::Transition(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::ProfileLookupFailed(err) => write!(f, "{err}"),
            Self::InvalidContact(user) => {
                write!(f, "user {user} has no valid contact email")
            }
            Self::NotifyFailed(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent meeting state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transition(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::ProfileLookupFailed(err) => Some(err),
            Self::NotifyFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransitionError> for ServiceError {
    fn from(value: TransitionError) -> Self {
        match value {
            TransitionError::NotFound(id) => Self::MeetingNotFound(id),
            other => Self::Transition(other),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::MeetingNotFound(id),
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

impl From<MeetingValidationError> for ServiceError {
    fn from(value: MeetingValidationError) -> Self {
        Self::Validation(value)
    }
}

/// One dashboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingCard {
    pub meeting: Meeting,
    /// The other participant: invitee on hosted cards, host on invited cards.
    pub counterpart: UserId,
    /// Counterpart username, or `"Unknown user"` when lookup failed.
    pub counterpart_label: String,
    pub actions: ActionSet,
}

/// Bucketed dashboard for one viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub viewer: UserId,
    pub buckets: MeetingBuckets<MeetingCard>,
}

/// Result of one successful `perform` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub meeting_id: MeetingId,
    pub action: Action,
    pub outcome: TransitionOutcome,
    /// Contact the availability request was sent to, if any.
    pub notified_contact: Option<String>,
}

/// Dashboard service facade over the external collaborators.
pub struct DashboardService<S, P, N>
where
    S: MeetingStore,
    P: ProfileDirectory,
    N: AvailabilityNotifier,
{
    store: S,
    profiles: P,
    notifier: N,
}

impl<S, P, N> DashboardService<S, P, N>
where
    S: MeetingStore,
    P: ProfileDirectory,
    N: AvailabilityNotifier,
{
    pub fn new(store: S, profiles: P, notifier: N) -> Self {
        Self {
            store,
            profiles,
            notifier,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Fetches a fresh snapshot of every meeting the viewer takes part in.
    ///
    /// Hosted records come first, then invited ones, each in store order.
    pub fn fetch_snapshot(&self, viewer: UserId) -> Result<MeetingSnapshot, ServiceError> {
        let hosted = self.store.fetch_meetings_by_host(viewer)?;
        let invited = self.store.fetch_meetings_by_invitee(viewer)?;
        Ok(MeetingSnapshot::from_meetings(
            hosted.into_iter().chain(invited),
        ))
    }

    /// Builds the bucketed dashboard for `viewer`.
    pub fn load_dashboard(&self, viewer: UserId) -> Result<Dashboard, ServiceError> {
        let started_at = Instant::now();
        let snapshot = match self.fetch_snapshot(viewer) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(
                    "event=dashboard_load module=service status=error viewer={} duration_ms={} error_code={}",
                    viewer,
                    started_at.elapsed().as_millis(),
                    err.code()
                );
                return Err(err);
            }
        };

        let mut labels: HashMap<UserId, String> = HashMap::new();
        let buckets = snapshot.categorize(viewer).map(|_, meeting| {
            let counterpart = meeting.counterpart(viewer).unwrap_or(viewer);
            let counterpart_label = labels
                .entry(counterpart)
                .or_insert_with(|| self.display_label(counterpart))
                .clone();
            MeetingCard {
                actions: legal_actions(&meeting, viewer),
                counterpart,
                counterpart_label,
                meeting,
            }
        });

        info!(
            "event=dashboard_load module=service status=ok viewer={} hosted={} invited={} duration_ms={}",
            viewer,
            buckets.hosted.len(),
            buckets.invited.len(),
            started_at.elapsed().as_millis()
        );

        Ok(Dashboard { viewer, buckets })
    }

    /// Creates a meeting in `AwaitingAvailability` hosted by `host`.
    pub fn schedule_meeting(
        &mut self,
        host: UserId,
        draft: MeetingDraft,
    ) -> Result<Meeting, ServiceError> {
        let meeting = draft.into_meeting(host)?;
        self.store.insert_meeting(&meeting)?;
        info!(
            "event=meeting_create module=service status=ok meeting_id={} host={} invitee={}",
            meeting.id, meeting.host, meeting.invitee
        );

        self.store
            .get_meeting(meeting.id)?
            .ok_or(ServiceError::InconsistentState(
                "created meeting not found in read-back",
            ))
    }

    /// Runs `command` for `viewer` on the stored meeting and writes back.
    ///
    /// # Errors
    /// - `MeetingNotFound` when the id is not in the store.
    /// - `Transition` when the engine rejects the command; nothing is written.
    /// - Collaborator failures from the store, profile lookup or notifier.
    pub fn perform(
        &mut self,
        viewer: UserId,
        meeting_id: MeetingId,
        command: Command,
    ) -> Result<ActionReport, ServiceError> {
        let started_at = Instant::now();
        let action = command.action();
        let result = self.perform_inner(viewer, meeting_id, &command);

        match &result {
            Ok(report) => info!(
                "event=meeting_action module=service status=ok meeting_id={} viewer={} action={} outcome={} duration_ms={}",
                meeting_id,
                viewer,
                action,
                outcome_label(&report.outcome),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=meeting_action module=service status=error meeting_id={} viewer={} action={} duration_ms={} error_code={}",
                meeting_id,
                viewer,
                action,
                started_at.elapsed().as_millis(),
                err.code()
            ),
        }

        result
    }

    fn perform_inner(
        &mut self,
        viewer: UserId,
        meeting_id: MeetingId,
        command: &Command,
    ) -> Result<ActionReport, ServiceError> {
        let meeting = self
            .store
            .get_meeting(meeting_id)?
            .ok_or(ServiceError::MeetingNotFound(meeting_id))?;

        let outcome = apply(&meeting, command, viewer)?;

        let mut notified_contact = None;
        if let Command::RequestAvailability = command {
            let contact = self.invitee_contact(&meeting)?;
            self.notifier
                .request_availability(meeting.id, contact.as_str())
                .map_err(ServiceError::NotifyFailed)?;
            notified_contact = Some(contact);
        }

        match &outcome {
            TransitionOutcome::Updated(next) if *next != meeting => {
                self.store.persist_meeting(next)?;
            }
            TransitionOutcome::Updated(_) => {}
            TransitionOutcome::Deleted(deleted) => {
                self.store.delete_meeting(deleted.meeting_id)?;
            }
        }

        Ok(ActionReport {
            meeting_id,
            action: command.action(),
            outcome,
            notified_contact,
        })
    }

    /// Username for `user`, or the placeholder label when lookup fails.
    pub fn display_label(&self, user: UserId) -> String {
        match self.profiles.fetch_user_profile(user) {
            Ok(profile) => profile.display_label().to_string(),
            Err(err) => {
                warn!(
                    "event=profile_lookup module=service status=error user={} error={}",
                    user, err
                );
                UNKNOWN_USER_LABEL.to_string()
            }
        }
    }

    fn invitee_contact(&self, meeting: &Meeting) -> Result<String, ServiceError> {
        let profile = self
            .profiles
            .fetch_user_profile(meeting.invitee)
            .map_err(ServiceError::ProfileLookupFailed)?;
        let email = profile.email.trim();
        if !is_valid_contact_email(email) {
            return Err(ServiceError::InvalidContact(meeting.invitee));
        }
        Ok(email.to_string())
    }
}

/// Loose shape check for contact emails: `local@domain.tld`, no spaces.
pub fn is_valid_contact_email(value: &str) -> bool {
    CONTACT_EMAIL_RE.is_match(value)
}

fn outcome_label(outcome: &TransitionOutcome) -> String {
    match outcome {
        TransitionOutcome::Updated(meeting) => format!("updated stage={}", meeting.stage),
        TransitionOutcome::Deleted(deleted) => format!("deleted last_stage={}", deleted.last_stage),
    }
}
