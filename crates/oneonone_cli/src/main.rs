//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `oneonone_core` linkage.
//! - Walk one meeting through its lifecycle against in-memory collaborators
//!   and print each dashboard, with deterministic output shape.

use oneonone_core::{
    Command, Dashboard, DashboardService, InMemoryMeetingStore, InMemoryProfileDirectory,
    MeetingDraft, MeetingDuration, MeetingKind, OutboxNotifier, Role, ServiceError, Stage,
    UserProfile,
};
use std::process::ExitCode;

const HOST: i64 = 1;
const INVITEE: i64 = 2;

fn main() -> ExitCode {
    println!("oneonone_core ping={}", oneonone_core::ping());
    println!("oneonone_core version={}", oneonone_core::core_version());

    match run_demo() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_demo() -> Result<(), ServiceError> {
    let profiles = InMemoryProfileDirectory::with_profiles([
        UserProfile::new(HOST, "host", "host@example.com"),
        UserProfile::new(INVITEE, "guest", "guest@example.com"),
    ]);
    let mut service = DashboardService::new(
        InMemoryMeetingStore::new(),
        profiles,
        OutboxNotifier::new(),
    );

    let meeting = service.schedule_meeting(
        HOST,
        MeetingDraft {
            title: "Weekly 1:1".to_string(),
            description: String::new(),
            duration: MeetingDuration::Minutes30,
            kind: MeetingKind::Video,
            invitee: INVITEE,
        },
    )?;
    print_dashboard("created", &service.load_dashboard(HOST)?);

    let steps = [
        (HOST, Command::RequestAvailability),
        (INVITEE, Command::AcceptInvitation),
        (HOST, Command::Finalize),
    ];
    for (actor, command) in steps {
        let report = service.perform(actor, meeting.id, command)?;
        print_dashboard(report.action.as_str(), &service.load_dashboard(actor)?);
    }

    println!("outbox={}", service.notifier().sent().len());
    Ok(())
}

fn print_dashboard(step: &str, dashboard: &Dashboard) {
    println!("step={step} viewer={}", dashboard.viewer);
    for role in [Role::Host, Role::Invitee] {
        for stage in Stage::ALL {
            for card in dashboard.buckets.get(role, stage) {
                let actions: Vec<&str> =
                    card.actions.iter().map(|action| action.as_str()).collect();
                println!(
                    "  {role}/{stage}: {} - {} [{}]",
                    card.meeting.title,
                    card.counterpart_label,
                    actions.join(",")
                );
            }
        }
    }
}
