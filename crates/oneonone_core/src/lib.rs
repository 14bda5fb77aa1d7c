//! Core domain logic for OneOnOne meeting coordination.
//! This crate is the single source of truth for meeting lifecycle invariants.

pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use lifecycle::authorize::{actions_for, legal_actions, Action, ActionSet};
pub use lifecycle::categorize::{categorize, MeetingBuckets, StageBuckets};
pub use lifecycle::snapshot::MeetingSnapshot;
pub use lifecycle::transition::{
    apply, Command, DeletionOutcome, TransitionError, TransitionOutcome,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::meeting::{
    Meeting, MeetingDraft, MeetingDuration, MeetingEdit, MeetingId, MeetingKind,
    MeetingValidationError, Role, Stage, UserId,
};
pub use model::profile::{UserProfile, UNKNOWN_USER_LABEL};
pub use service::dashboard_service::{
    ActionReport, Dashboard, DashboardService, MeetingCard, ServiceError,
};
pub use store::{
    AvailabilityNotifier, InMemoryMeetingStore, InMemoryProfileDirectory, MeetingStore,
    OutboxNotifier, ProfileDirectory, ProfileLookupError, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
