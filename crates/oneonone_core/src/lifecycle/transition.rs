//! Meeting stage transition engine.
//!
//! # Responsibility
//! - Execute one command against a meeting value.
//! - Reject commands the actor may not issue, or may not issue yet.
//!
//! # Invariants
//! - Stage never moves backwards; `Delete` is the only exit.
//! - Failed commands leave no partial change (input is never mutated).
//! - The engine does not perform I/O; callers persist the outcome.
//!
//! State graph:
//! `AwaitingAvailability -> ReadyToFinalize -> Finalized`, plus
//! `* -> Deleted` (terminal, no outgoing edges).

use crate::lifecycle::authorize::{legal_actions, role_can_ever, Action};
use crate::model::meeting::{
    Meeting, MeetingEdit, MeetingId, MeetingValidationError, Role, Stage, UserId,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Action plus the payload it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    RequestAvailability,
    EditDetails(MeetingEdit),
    AcceptInvitation,
    Finalize,
    Delete,
}

impl Command {
    pub fn action(&self) -> Action {
        match self {
            Self::RequestAvailability => Action::RequestAvailability,
            Self::EditDetails(_) => Action::EditDetails,
            Self::AcceptInvitation => Action::AcceptInvitation,
            Self::Finalize => Action::Finalize,
            Self::Delete => Action::Delete,
        }
    }
}

impl From<Action> for Command {
    /// Payload-free conversion. `EditDetails` maps to an empty edit.
    fn from(value: Action) -> Self {
        match value {
            Action::RequestAvailability => Self::RequestAvailability,
            Action::EditDetails => Self::EditDetails(MeetingEdit::default()),
            Action::AcceptInvitation => Self::AcceptInvitation,
            Action::Finalize => Self::Finalize,
            Action::Delete => Self::Delete,
        }
    }
}

/// Result of a removed meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub meeting_id: MeetingId,
    pub deleted_by: Role,
    /// Stage the meeting was in when it was removed.
    pub last_stage: Stage,
}

/// Successful transition result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Updated(Meeting),
    Deleted(DeletionOutcome),
}

impl TransitionOutcome {
    /// Updated meeting, or `None` when deleted.
    pub fn meeting(&self) -> Option<&Meeting> {
        match self {
            Self::Updated(meeting) => Some(meeting),
            Self::Deleted(_) => None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted(_))
    }
}

/// Transition failures. All are recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Actor role may never perform this action.
    Unauthorized {
        action: Action,
        role: Role,
        stage: Stage,
    },
    /// Actor role may perform this action, but not in the current stage.
    InvalidStage { action: Action, stage: Stage },
    /// Meeting id is absent from the snapshot.
    NotFound(MeetingId),
    /// Edit payload would break a record invariant.
    InvalidEdit(MeetingValidationError),
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized {
                action,
                role,
                stage,
            } => write!(f, "{role} may not {action} (stage {stage})"),
            Self::InvalidStage { action, stage } => {
                write!(f, "{action} is not allowed while meeting is {stage}")
            }
            Self::NotFound(id) => write!(f, "meeting not found: {id}"),
            Self::InvalidEdit(err) => write!(f, "invalid meeting edit: {err}"),
        }
    }
}

impl Error for TransitionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEdit(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MeetingValidationError> for TransitionError {
    fn from(value: MeetingValidationError) -> Self {
        Self::InvalidEdit(value)
    }
}

/// Checks that `actor` may issue `action` on `meeting` right now.
///
/// # Errors
/// - `Unauthorized` when the actor's role can never issue the action.
/// - `InvalidStage` when the role can issue it, but not in this stage.
pub fn authorize(
    meeting: &Meeting,
    action: Action,
    actor: UserId,
) -> Result<Role, TransitionError> {
    if legal_actions(meeting, actor).contains(&action) {
        return Ok(meeting.role(actor));
    }

    let role = meeting.role(actor);
    if role_can_ever(role, action) {
        Err(TransitionError::InvalidStage {
            action,
            stage: meeting.stage,
        })
    } else {
        Err(TransitionError::Unauthorized {
            action,
            role,
            stage: meeting.stage,
        })
    }
}

/// Applies `command` issued by `actor` and returns the next meeting state.
///
/// The input meeting is never modified; on error nothing changes.
pub fn apply(
    meeting: &Meeting,
    command: &Command,
    actor: UserId,
) -> Result<TransitionOutcome, TransitionError> {
    let action = command.action();
    let role = authorize(meeting, action, actor)?;

    let next = match command {
        Command::RequestAvailability => meeting.clone(),
        Command::EditDetails(edit) => edit.applied_to(meeting)?,
        Command::AcceptInvitation => match meeting.stage {
            Stage::AwaitingAvailability => advanced(meeting, Stage::ReadyToFinalize),
            // Re-accepting a finalized meeting has no further effect.
            Stage::Finalized => meeting.clone(),
            Stage::ReadyToFinalize => {
                return Err(TransitionError::InvalidStage {
                    action,
                    stage: meeting.stage,
                })
            }
        },
        Command::Finalize => match meeting.stage {
            Stage::ReadyToFinalize => advanced(meeting, Stage::Finalized),
            stage => return Err(TransitionError::InvalidStage { action, stage }),
        },
        Command::Delete => {
            return Ok(TransitionOutcome::Deleted(DeletionOutcome {
                meeting_id: meeting.id,
                deleted_by: role,
                last_stage: meeting.stage,
            }))
        }
    };

    debug_assert!(next.stage.ordinal() >= meeting.stage.ordinal());
    Ok(TransitionOutcome::Updated(next))
}

fn advanced(meeting: &Meeting, stage: Stage) -> Meeting {
    let mut next = meeting.clone();
    next.stage = stage;
    next
}

#[cfg(test)]
mod tests {
    use super::{apply, Command, TransitionError, TransitionOutcome};
    use crate::lifecycle::authorize::Action;
    use crate::model::meeting::{Meeting, MeetingEdit, Role, Stage};

    const HOST: i64 = 10;
    const INVITEE: i64 = 20;
    const STRANGER: i64 = 30;

    fn meeting_in(stage: Stage) -> Meeting {
        let mut meeting = Meeting::new("1:1", HOST, INVITEE).unwrap();
        meeting.stage = stage;
        meeting
    }

    fn updated(outcome: TransitionOutcome) -> Meeting {
        match outcome {
            TransitionOutcome::Updated(meeting) => meeting,
            TransitionOutcome::Deleted(outcome) => panic!("unexpected delete: {outcome:?}"),
        }
    }

    #[test]
    fn accept_moves_awaiting_to_ready() {
        let meeting = meeting_in(Stage::AwaitingAvailability);
        let next = updated(apply(&meeting, &Command::AcceptInvitation, INVITEE).unwrap());
        assert_eq!(next.stage, Stage::ReadyToFinalize);
        assert_eq!(meeting.stage, Stage::AwaitingAvailability);
    }

    #[test]
    fn accept_on_finalized_is_a_no_op() {
        let meeting = meeting_in(Stage::Finalized);
        let next = updated(apply(&meeting, &Command::AcceptInvitation, INVITEE).unwrap());
        assert_eq!(next, meeting);
    }

    #[test]
    fn invitee_accept_while_ready_is_invalid_stage() {
        let meeting = meeting_in(Stage::ReadyToFinalize);
        let err = apply(&meeting, &Command::AcceptInvitation, INVITEE).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidStage {
                action: Action::AcceptInvitation,
                stage: Stage::ReadyToFinalize,
            }
        );
    }

    #[test]
    fn host_cannot_accept_own_invitation() {
        let meeting = meeting_in(Stage::AwaitingAvailability);
        let err = apply(&meeting, &Command::AcceptInvitation, HOST).unwrap_err();
        assert!(matches!(
            err,
            TransitionError::Unauthorized {
                role: Role::Host,
                ..
            }
        ));
    }

    #[test]
    fn edit_changes_details_but_not_stage() {
        let meeting = meeting_in(Stage::ReadyToFinalize);
        let edit = MeetingEdit {
            title: Some("  Weekly 1:1 ".to_string()),
            description: Some("agenda".to_string()),
            ..MeetingEdit::default()
        };
        let next = updated(apply(&meeting, &Command::EditDetails(edit), HOST).unwrap());
        assert_eq!(next.title, "Weekly 1:1");
        assert_eq!(next.description, "agenda");
        assert_eq!(next.stage, Stage::ReadyToFinalize);
        assert_eq!(next.host, HOST);
        assert_eq!(next.invitee, INVITEE);
    }

    #[test]
    fn invalid_edit_is_rejected_without_change() {
        let meeting = meeting_in(Stage::AwaitingAvailability);
        let edit = MeetingEdit {
            title: Some(String::new()),
            ..MeetingEdit::default()
        };
        let err = apply(&meeting, &Command::EditDetails(edit), HOST).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidEdit(_)));
    }

    #[test]
    fn stranger_is_unauthorized_for_everything() {
        for stage in Stage::ALL {
            let meeting = meeting_in(stage);
            for action in Action::ALL {
                let err = apply(&meeting, &Command::from(action), STRANGER).unwrap_err();
                assert!(matches!(err, TransitionError::Unauthorized { .. }));
            }
        }
    }

    #[test]
    fn delete_reports_actor_role_and_last_stage() {
        let meeting = meeting_in(Stage::Finalized);
        match apply(&meeting, &Command::Delete, HOST).unwrap() {
            TransitionOutcome::Deleted(outcome) => {
                assert_eq!(outcome.meeting_id, meeting.id);
                assert_eq!(outcome.deleted_by, Role::Host);
                assert_eq!(outcome.last_stage, Stage::Finalized);
            }
            other => panic!("expected deletion, got {other:?}"),
        }
    }
}
