//! Role x stage action authorization.
//!
//! # Responsibility
//! - Hold the role/stage -> actions table as data.
//! - Answer which actions a viewer may take on one meeting.
//!
//! # Invariants
//! - Unrelated viewers never get any action.
//! - `Finalize` is offered only to the host while `ReadyToFinalize`.
//! - Lookups are pure and never fail.

use crate::model::meeting::{Meeting, Role, Stage, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// User-triggered meeting action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    RequestAvailability,
    EditDetails,
    AcceptInvitation,
    Finalize,
    Delete,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::RequestAvailability,
        Action::EditDetails,
        Action::AcceptInvitation,
        Action::Finalize,
        Action::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequestAvailability => "request_availability",
            Self::EditDetails => "edit_details",
            Self::AcceptInvitation => "accept_invitation",
            Self::Finalize => "finalize",
            Self::Delete => "delete",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == value.trim())
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of legal actions.
pub type ActionSet = BTreeSet<Action>;

const HOST_ACTIONS: &[Action] = &[
    Action::EditDetails,
    Action::RequestAvailability,
    Action::Delete,
];
const INVITEE_RESPONDING_ACTIONS: &[Action] = &[Action::AcceptInvitation, Action::Delete];

const ACTION_TABLE: &[(Role, Stage, &[Action])] = &[
    (Role::Host, Stage::AwaitingAvailability, HOST_ACTIONS),
    (Role::Host, Stage::ReadyToFinalize, HOST_ACTIONS),
    (Role::Host, Stage::Finalized, HOST_ACTIONS),
    (
        Role::Invitee,
        Stage::AwaitingAvailability,
        INVITEE_RESPONDING_ACTIONS,
    ),
    (Role::Invitee, Stage::ReadyToFinalize, HOST_ACTIONS),
    (Role::Invitee, Stage::Finalized, INVITEE_RESPONDING_ACTIONS),
];

/// Actions allowed for `role` while a meeting sits in `stage`.
pub fn actions_for(role: Role, stage: Stage) -> ActionSet {
    let mut actions: ActionSet = ACTION_TABLE
        .iter()
        .filter(|(row_role, row_stage, _)| *row_role == role && *row_stage == stage)
        .flat_map(|(_, _, actions)| actions.iter().copied())
        .collect();

    if role == Role::Host && stage == Stage::ReadyToFinalize {
        actions.insert(Action::Finalize);
    }

    actions
}

/// Legal actions for `viewer` on `meeting`.
pub fn legal_actions(meeting: &Meeting, viewer: UserId) -> ActionSet {
    actions_for(meeting.role(viewer), meeting.stage)
}

/// Whether `role` may perform `action` in at least one stage.
///
/// Used to tell an unauthorized actor apart from a wrong-stage request.
pub fn role_can_ever(role: Role, action: Action) -> bool {
    Stage::ALL
        .into_iter()
        .any(|stage| actions_for(role, stage).contains(&action))
}
