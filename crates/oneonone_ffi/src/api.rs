//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose lifecycle rules to Dart via FRB as snapshot-in, result-out calls.
//! - Keep error semantics simple: envelopes with `ok` + message, no throws.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - No meeting state is kept between calls; the UI owns the snapshot.

use log::warn;
use oneonone_core::{
    apply, categorize, core_version as core_version_inner, init_logging as init_logging_inner,
    legal_actions, ping as ping_inner, Action, ActionSet, Command, Meeting, MeetingDuration,
    MeetingEdit, MeetingKind, Stage, StageBuckets, TransitionError, TransitionOutcome,
};
use uuid::Uuid;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Meeting record as exchanged with the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingPayload {
    /// Stable meeting ID in UUID string form.
    pub id: String,
    pub title: String,
    pub description: String,
    /// One of 15, 30, 45, 60, 90, 120.
    pub duration_minutes: u16,
    /// `in_person|phone|video`.
    pub kind: String,
    pub host: i64,
    pub invitee: i64,
    /// Status letter: `A`, `C` or `F`.
    pub status: String,
}

/// Optional field edits for `edit_details`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingEditPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<u16>,
    pub kind: Option<String>,
}

/// One dashboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardItem {
    pub meeting: MeetingPayload,
    /// Legal action ids, e.g. `accept_invitation`.
    pub actions: Vec<String>,
}

/// Rows of one role split by stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageListsPayload {
    pub awaiting_availability: Vec<DashboardItem>,
    pub ready_to_finalize: Vec<DashboardItem>,
    pub finalized: Vec<DashboardItem>,
}

/// Categorized dashboard envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardResponse {
    pub hosted: StageListsPayload,
    pub invited: StageListsPayload,
    /// Number of input records dropped as malformed.
    pub skipped: u32,
    pub message: String,
}

/// Legal action list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionListResponse {
    pub ok: bool,
    pub actions: Vec<String>,
    pub message: String,
}

/// Transition result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResponse {
    pub ok: bool,
    /// Stable error code (`unauthorized|invalid_stage|not_found|invalid_input`).
    pub error_code: Option<String>,
    /// Next meeting state; `None` on failure or deletion.
    pub meeting: Option<MeetingPayload>,
    pub deleted: bool,
    pub message: String,
}

impl TransitionResponse {
    fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_code: Some(code.to_string()),
            meeting: None,
            deleted: false,
            message: message.into(),
        }
    }
}

/// Splits a UI-held snapshot into the viewer's role/stage buckets.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Malformed records are skipped and counted; never fails the call.
/// - Row order within a bucket follows input order.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_categorize(viewer_id: i64, meetings: Vec<MeetingPayload>) -> DashboardResponse {
    let mut parsed = Vec::with_capacity(meetings.len());
    let mut skipped = 0_u32;
    for payload in &meetings {
        match to_meeting(payload) {
            Ok(meeting) => parsed.push(meeting),
            Err(err) => {
                skipped += 1;
                warn!(
                    "event=ffi_categorize module=ffi status=skip meeting_id={} error={}",
                    payload.id, err
                );
            }
        }
    }

    let buckets = categorize(&parsed, viewer_id);
    let total = buckets.len();
    let to_items = |lists: StageBuckets<Meeting>| -> StageListsPayload {
        let lists = lists.map(|meeting| to_dashboard_item(&meeting, viewer_id));
        StageListsPayload {
            awaiting_availability: lists.awaiting_availability,
            ready_to_finalize: lists.ready_to_finalize,
            finalized: lists.finalized,
        }
    };

    DashboardResponse {
        hosted: to_items(buckets.hosted),
        invited: to_items(buckets.invited),
        skipped,
        message: format!("Categorized {total} meeting(s)."),
    }
}

/// Lists legal actions for one meeting and viewer.
#[flutter_rust_bridge::frb(sync)]
pub fn meeting_legal_actions(viewer_id: i64, meeting: MeetingPayload) -> ActionListResponse {
    match to_meeting(&meeting) {
        Ok(meeting) => ActionListResponse {
            ok: true,
            actions: action_ids(&legal_actions(&meeting, viewer_id)),
            message: String::new(),
        },
        Err(err) => ActionListResponse {
            ok: false,
            actions: Vec::new(),
            message: format!("meeting_legal_actions failed: {err}"),
        },
    }
}

/// Applies one action and returns the next meeting state.
///
/// # FFI contract
/// - Sync call, pure computation; the caller persists the result.
/// - `edit` is read only for `edit_details`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn meeting_apply_action(
    viewer_id: i64,
    meeting: MeetingPayload,
    action: String,
    edit: Option<MeetingEditPayload>,
) -> TransitionResponse {
    let meeting = match to_meeting(&meeting) {
        Ok(meeting) => meeting,
        Err(err) => return TransitionResponse::failure("invalid_input", err),
    };
    let command = match to_command(action.as_str(), edit) {
        Ok(command) => command,
        Err(err) => return TransitionResponse::failure("invalid_input", err),
    };

    match apply(&meeting, &command, viewer_id) {
        Ok(TransitionOutcome::Updated(next)) => TransitionResponse {
            ok: true,
            error_code: None,
            meeting: Some(to_payload(&next)),
            deleted: false,
            message: format!("Meeting is {}.", next.stage),
        },
        Ok(TransitionOutcome::Deleted(_)) => TransitionResponse {
            ok: true,
            error_code: None,
            meeting: None,
            deleted: true,
            message: "Meeting deleted.".to_string(),
        },
        Err(err) => TransitionResponse::failure(transition_error_code(&err), err.to_string()),
    }
}

fn to_meeting(payload: &MeetingPayload) -> Result<Meeting, String> {
    let id = Uuid::parse_str(payload.id.trim())
        .map_err(|_| format!("invalid meeting id `{}`", payload.id))?;
    let stage = parse_status(&payload.status)?;
    let duration = parse_duration(payload.duration_minutes)?;
    let kind = parse_kind(&payload.kind)?;

    let meeting = Meeting {
        id,
        title: payload.title.clone(),
        description: payload.description.clone(),
        duration,
        kind,
        host: payload.host,
        invitee: payload.invitee,
        stage,
    };
    meeting.validate().map_err(|err| err.to_string())?;
    Ok(meeting)
}

fn to_payload(meeting: &Meeting) -> MeetingPayload {
    MeetingPayload {
        id: meeting.id.to_string(),
        title: meeting.title.clone(),
        description: meeting.description.clone(),
        duration_minutes: meeting.duration.minutes(),
        kind: meeting.kind.as_str().to_string(),
        host: meeting.host,
        invitee: meeting.invitee,
        status: meeting.stage.code().to_string(),
    }
}

fn to_dashboard_item(meeting: &Meeting, viewer_id: i64) -> DashboardItem {
    DashboardItem {
        meeting: to_payload(meeting),
        actions: action_ids(&legal_actions(meeting, viewer_id)),
    }
}

fn to_command(action: &str, edit: Option<MeetingEditPayload>) -> Result<Command, String> {
    let action = Action::parse(action).ok_or_else(|| format!("unknown action `{action}`"))?;
    if action != Action::EditDetails {
        return Ok(Command::from(action));
    }

    let edit = edit.unwrap_or_default();
    Ok(Command::EditDetails(MeetingEdit {
        title: edit.title,
        description: edit.description,
        duration: edit.duration_minutes.map(parse_duration).transpose()?,
        kind: edit.kind.as_deref().map(parse_kind).transpose()?,
    }))
}

fn parse_status(value: &str) -> Result<Stage, String> {
    let mut chars = value.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(code), None) => {
            Stage::from_code(code).ok_or_else(|| format!("unknown status `{value}`"))
        }
        _ => Err(format!("unknown status `{value}`")),
    }
}

fn parse_duration(minutes: u16) -> Result<MeetingDuration, String> {
    MeetingDuration::from_minutes(minutes)
        .ok_or_else(|| format!("unsupported duration {minutes} minutes"))
}

fn parse_kind(value: &str) -> Result<MeetingKind, String> {
    MeetingKind::parse(value).ok_or_else(|| format!("unknown meeting kind `{value}`"))
}

fn action_ids(actions: &ActionSet) -> Vec<String> {
    actions.iter().map(|action| action.as_str().to_string()).collect()
}

fn transition_error_code(err: &TransitionError) -> &'static str {
    match err {
        TransitionError::Unauthorized { .. } => "unauthorized",
        TransitionError::InvalidStage { .. } => "invalid_stage",
        TransitionError::NotFound(_) => "not_found",
        TransitionError::InvalidEdit(_) => "invalid_input",
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, dashboard_categorize, init_logging, meeting_apply_action,
        meeting_legal_actions, ping, MeetingEditPayload, MeetingPayload,
    };

    fn payload(host: i64, invitee: i64, status: &str) -> MeetingPayload {
        MeetingPayload {
            id: uuid::Uuid::new_v4().to_string(),
            title: "1:1".to_string(),
            description: String::new(),
            duration_minutes: 30,
            kind: "video".to_string(),
            host,
            invitee,
            status: status.to_string(),
        }
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn categorize_skips_malformed_records() {
        let mut broken = payload(1, 2, "A");
        broken.status = "Q".to_string();
        let response = dashboard_categorize(
            1,
            vec![payload(1, 2, "A"), payload(2, 1, "F"), broken, payload(3, 4, "C")],
        );

        assert_eq!(response.skipped, 1);
        assert_eq!(response.hosted.awaiting_availability.len(), 1);
        assert_eq!(response.invited.finalized.len(), 1);
        assert_eq!(
            response.invited.finalized[0].actions,
            vec!["accept_invitation".to_string(), "delete".to_string()]
        );
    }

    #[test]
    fn legal_actions_for_ready_host_include_finalize() {
        let response = meeting_legal_actions(1, payload(1, 2, "C"));
        assert!(response.ok, "{}", response.message);
        assert!(response.actions.iter().any(|action| action == "finalize"));
    }

    #[test]
    fn apply_action_moves_stage_and_reports_errors() {
        let accepted = meeting_apply_action(
            2,
            payload(1, 2, "A"),
            "accept_invitation".to_string(),
            None,
        );
        assert!(accepted.ok, "{}", accepted.message);
        assert_eq!(accepted.meeting.expect("meeting").status, "C");

        let rejected = meeting_apply_action(2, payload(1, 2, "C"), "finalize".to_string(), None);
        assert!(!rejected.ok);
        assert_eq!(rejected.error_code.as_deref(), Some("unauthorized"));

        let unknown = meeting_apply_action(1, payload(1, 2, "C"), "approve".to_string(), None);
        assert_eq!(unknown.error_code.as_deref(), Some("invalid_input"));
    }

    #[test]
    fn apply_edit_details_uses_edit_payload() {
        let edit = MeetingEditPayload {
            title: Some("Renamed".to_string()),
            duration_minutes: Some(60),
            ..MeetingEditPayload::default()
        };
        let response = meeting_apply_action(
            1,
            payload(1, 2, "F"),
            "edit_details".to_string(),
            Some(edit),
        );
        let meeting = response.meeting.expect("edited meeting");
        assert_eq!(meeting.title, "Renamed");
        assert_eq!(meeting.duration_minutes, 60);
        assert_eq!(meeting.status, "F");
    }

    #[test]
    fn apply_delete_reports_deletion() {
        let response = meeting_apply_action(2, payload(1, 2, "F"), "delete".to_string(), None);
        assert!(response.ok);
        assert!(response.deleted);
        assert!(response.meeting.is_none());
    }
}
