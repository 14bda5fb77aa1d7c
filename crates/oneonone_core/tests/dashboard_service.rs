use oneonone_core::{
    Action, Command, DashboardService, InMemoryMeetingStore, InMemoryProfileDirectory, Meeting,
    MeetingDraft, MeetingDuration, MeetingEdit, MeetingKind, MeetingStore, OutboxNotifier,
    ServiceError, Stage, TransitionError, UserProfile, UNKNOWN_USER_LABEL,
};

const HOST: i64 = 100;
const INVITEE: i64 = 200;
const STRANGER: i64 = 300;

type Service = DashboardService<InMemoryMeetingStore, InMemoryProfileDirectory, OutboxNotifier>;

fn profiles() -> InMemoryProfileDirectory {
    InMemoryProfileDirectory::with_profiles([
        UserProfile::new(HOST, "hana", "hana@example.com"),
        UserProfile::new(INVITEE, "ivan", "ivan@example.com"),
    ])
}

fn service_with(meetings: Vec<Meeting>) -> Service {
    let store = InMemoryMeetingStore::with_meetings(meetings).unwrap();
    DashboardService::new(store, profiles(), OutboxNotifier::new())
}

fn meeting_in(title: &str, host: i64, invitee: i64, stage: Stage) -> Meeting {
    let mut meeting = Meeting::new(title, host, invitee).unwrap();
    meeting.stage = stage;
    meeting
}

#[test]
fn dashboard_splits_hosted_and_invited_meetings() {
    let service = service_with(vec![
        meeting_in("pending", HOST, INVITEE, Stage::AwaitingAvailability),
        meeting_in("ready", HOST, INVITEE, Stage::ReadyToFinalize),
        meeting_in("invited", INVITEE, HOST, Stage::Finalized),
        meeting_in("foreign", INVITEE, STRANGER, Stage::Finalized),
    ]);

    let dashboard = service.load_dashboard(HOST).unwrap();
    assert_eq!(dashboard.viewer, HOST);
    assert_eq!(dashboard.buckets.len(), 3);

    let pending = &dashboard.buckets.hosted.awaiting_availability[0];
    assert_eq!(pending.meeting.title, "pending");
    assert_eq!(pending.counterpart, INVITEE);
    assert_eq!(pending.counterpart_label, "ivan");
    assert!(!pending.actions.contains(&Action::Finalize));

    let ready = &dashboard.buckets.hosted.ready_to_finalize[0];
    assert!(ready.actions.contains(&Action::Finalize));

    let invited = &dashboard.buckets.invited.finalized[0];
    assert_eq!(invited.meeting.title, "invited");
    assert_eq!(invited.counterpart, INVITEE);
    assert!(invited.actions.contains(&Action::AcceptInvitation));
}

#[test]
fn invited_cards_label_the_host_in_every_stage() {
    let service = service_with(
        Stage::ALL
            .into_iter()
            .map(|stage| meeting_in("from hana", HOST, INVITEE, stage))
            .collect(),
    );

    let dashboard = service.load_dashboard(INVITEE).unwrap();
    for stage in Stage::ALL {
        let cards = dashboard.buckets.invited.get(stage);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].counterpart, HOST);
        assert_eq!(cards[0].counterpart_label, "hana");
    }
}

#[test]
fn missing_profile_degrades_to_placeholder_label() {
    let service = service_with(vec![meeting_in(
        "unknown guest",
        HOST,
        STRANGER,
        Stage::AwaitingAvailability,
    )]);

    let dashboard = service.load_dashboard(HOST).unwrap();
    let card = &dashboard.buckets.hosted.awaiting_availability[0];
    assert_eq!(card.counterpart_label, UNKNOWN_USER_LABEL);
}

#[test]
fn accept_then_finalize_writes_back_each_stage() {
    let meeting = meeting_in("1:1", HOST, INVITEE, Stage::AwaitingAvailability);
    let mut service = service_with(vec![meeting.clone()]);

    service
        .perform(INVITEE, meeting.id, Command::AcceptInvitation)
        .unwrap();
    let stored = service.store().get_meeting(meeting.id).unwrap().unwrap();
    assert_eq!(stored.stage, Stage::ReadyToFinalize);

    let err = service
        .perform(INVITEE, meeting.id, Command::Finalize)
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Transition(TransitionError::Unauthorized { .. })
    ));

    service.perform(HOST, meeting.id, Command::Finalize).unwrap();
    let stored = service.store().get_meeting(meeting.id).unwrap().unwrap();
    assert_eq!(stored.stage, Stage::Finalized);

    let dashboard = service.load_dashboard(HOST).unwrap();
    assert_eq!(dashboard.buckets.hosted.finalized.len(), 1);
}

#[test]
fn rejected_action_does_not_touch_the_store() {
    let meeting = meeting_in("1:1", HOST, INVITEE, Stage::Finalized);
    let mut service = service_with(vec![meeting.clone()]);

    let err = service
        .perform(HOST, meeting.id, Command::Finalize)
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Transition(TransitionError::InvalidStage { .. })
    ));
    assert_eq!(
        service.store().get_meeting(meeting.id).unwrap().unwrap(),
        meeting
    );
}

#[test]
fn request_availability_notifies_invitee_contact() {
    let meeting = meeting_in("1:1", HOST, INVITEE, Stage::AwaitingAvailability);
    let mut service = service_with(vec![meeting.clone()]);

    let report = service
        .perform(HOST, meeting.id, Command::RequestAvailability)
        .unwrap();
    assert_eq!(report.notified_contact.as_deref(), Some("ivan@example.com"));
    assert_eq!(report.outcome.meeting().unwrap().stage, Stage::AwaitingAvailability);

    let sent = service.notifier().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].meeting_id, meeting.id);
}

#[test]
fn request_availability_needs_a_resolvable_contact() {
    let unknown = meeting_in("1:1", HOST, STRANGER, Stage::AwaitingAvailability);
    let mut service = service_with(vec![unknown.clone()]);
    let err = service
        .perform(HOST, unknown.id, Command::RequestAvailability)
        .unwrap_err();
    assert!(matches!(err, ServiceError::ProfileLookupFailed(_)));

    let bad_contact = meeting_in("1:1", HOST, 400, Stage::AwaitingAvailability);
    let store = InMemoryMeetingStore::with_meetings([bad_contact.clone()]).unwrap();
    let mut directory = profiles();
    directory.insert(UserProfile::new(400, "nomail", "not-an-email"));
    let mut service = DashboardService::new(store, directory, OutboxNotifier::new());
    let err = service
        .perform(HOST, bad_contact.id, Command::RequestAvailability)
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidContact(400)));
    assert!(service.notifier().sent().is_empty());
}

#[test]
fn stranger_cannot_request_availability() {
    let meeting = meeting_in("1:1", HOST, INVITEE, Stage::AwaitingAvailability);
    let mut service = service_with(vec![meeting.clone()]);

    let err = service
        .perform(STRANGER, meeting.id, Command::RequestAvailability)
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Transition(TransitionError::Unauthorized { .. })
    ));
    assert!(service.notifier().sent().is_empty());
}

#[test]
fn edit_details_persists_new_title() {
    let meeting = meeting_in("draft", HOST, INVITEE, Stage::ReadyToFinalize);
    let mut service = service_with(vec![meeting.clone()]);

    let edit = MeetingEdit {
        title: Some("Quarterly review".to_string()),
        duration: Some(MeetingDuration::Minutes90),
        ..MeetingEdit::default()
    };
    service
        .perform(INVITEE, meeting.id, Command::EditDetails(edit))
        .unwrap();

    let stored = service.store().get_meeting(meeting.id).unwrap().unwrap();
    assert_eq!(stored.title, "Quarterly review");
    assert_eq!(stored.duration, MeetingDuration::Minutes90);
    assert_eq!(stored.stage, Stage::ReadyToFinalize);
}

#[test]
fn delete_removes_meeting_and_later_actions_are_not_found() {
    let meeting = meeting_in("1:1", HOST, INVITEE, Stage::ReadyToFinalize);
    let mut service = service_with(vec![meeting.clone()]);

    let report = service.perform(INVITEE, meeting.id, Command::Delete).unwrap();
    assert!(report.outcome.is_deleted());
    assert!(service.store().is_empty());

    let err = service
        .perform(HOST, meeting.id, Command::Finalize)
        .unwrap_err();
    assert!(matches!(err, ServiceError::MeetingNotFound(id) if id == meeting.id));
}

#[test]
fn schedule_meeting_creates_awaiting_record() {
    let mut service = service_with(Vec::new());
    let draft = MeetingDraft {
        title: "Intro chat".to_string(),
        description: String::new(),
        duration: MeetingDuration::Minutes15,
        kind: MeetingKind::Video,
        invitee: INVITEE,
    };

    let created = service.schedule_meeting(HOST, draft).unwrap();
    assert_eq!(created.stage, Stage::AwaitingAvailability);

    let dashboard = service.load_dashboard(INVITEE).unwrap();
    assert_eq!(dashboard.buckets.invited.awaiting_availability.len(), 1);
}

#[test]
fn schedule_meeting_rejects_self_invitation() {
    let mut service = service_with(Vec::new());
    let draft = MeetingDraft {
        title: "Me".to_string(),
        description: String::new(),
        duration: MeetingDuration::Minutes30,
        kind: MeetingKind::Phone,
        invitee: HOST,
    };

    let err = service.schedule_meeting(HOST, draft).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(service.store().is_empty());
}
