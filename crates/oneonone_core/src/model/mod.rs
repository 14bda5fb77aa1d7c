//! Meeting domain model for host and invitee projections.
//!
//! # Responsibility
//! - Define canonical data structures used by lifecycle rules.
//! - Keep one meeting shape for both host-side and invitee-side views.
//!
//! # Invariants
//! - Every meeting is identified by a stable `MeetingId`.
//! - Deletion removes a meeting; there is no tombstone stage.

pub mod meeting;
pub mod profile;
