//! Partitioning of meeting snapshots into role x stage buckets.
//!
//! # Invariants
//! - Every meeting lands in at most one bucket for a given viewer.
//! - Meetings the viewer is unrelated to are excluded.
//! - Bucket order is the input order; nothing is re-sorted.

use crate::model::meeting::{Meeting, Role, Stage, UserId};

/// Meetings of one role split by lifecycle stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageBuckets<T> {
    pub awaiting_availability: Vec<T>,
    pub ready_to_finalize: Vec<T>,
    pub finalized: Vec<T>,
}

impl<T> StageBuckets<T> {
    pub fn new() -> Self {
        Self {
            awaiting_availability: Vec::new(),
            ready_to_finalize: Vec::new(),
            finalized: Vec::new(),
        }
    }

    pub fn get(&self, stage: Stage) -> &[T] {
        match stage {
            Stage::AwaitingAvailability => &self.awaiting_availability,
            Stage::ReadyToFinalize => &self.ready_to_finalize,
            Stage::Finalized => &self.finalized,
        }
    }

    fn get_mut(&mut self, stage: Stage) -> &mut Vec<T> {
        match stage {
            Stage::AwaitingAvailability => &mut self.awaiting_availability,
            Stage::ReadyToFinalize => &mut self.ready_to_finalize,
            Stage::Finalized => &mut self.finalized,
        }
    }

    pub fn len(&self) -> usize {
        self.awaiting_availability.len() + self.ready_to_finalize.len() + self.finalized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transforms every entry while keeping bucket placement and order.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> StageBuckets<U> {
        StageBuckets {
            awaiting_availability: self.awaiting_availability.into_iter().map(&mut f).collect(),
            ready_to_finalize: self.ready_to_finalize.into_iter().map(&mut f).collect(),
            finalized: self.finalized.into_iter().map(&mut f).collect(),
        }
    }
}

impl<T> Default for StageBuckets<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Host-side and invitee-side buckets for one viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingBuckets<T = Meeting> {
    pub hosted: StageBuckets<T>,
    pub invited: StageBuckets<T>,
}

impl<T> MeetingBuckets<T> {
    pub fn new() -> Self {
        Self {
            hosted: StageBuckets::new(),
            invited: StageBuckets::new(),
        }
    }

    /// Bucket for one role/stage pair. Unrelated always yields an empty slice.
    pub fn get(&self, role: Role, stage: Stage) -> &[T] {
        match role {
            Role::Host => self.hosted.get(stage),
            Role::Invitee => self.invited.get(stage),
            Role::Unrelated => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.hosted.len() + self.invited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn map<U>(self, mut f: impl FnMut(Role, T) -> U) -> MeetingBuckets<U> {
        MeetingBuckets {
            hosted: self.hosted.map(|item| f(Role::Host, item)),
            invited: self.invited.map(|item| f(Role::Invitee, item)),
        }
    }
}

impl<T> Default for MeetingBuckets<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits `meetings` into the viewer's six buckets.
pub fn categorize<'a, I>(meetings: I, viewer: UserId) -> MeetingBuckets
where
    I: IntoIterator<Item = &'a Meeting>,
{
    let mut buckets = MeetingBuckets::new();
    for meeting in meetings {
        let side = match meeting.role(viewer) {
            Role::Host => &mut buckets.hosted,
            Role::Invitee => &mut buckets.invited,
            Role::Unrelated => continue,
        };
        side.get_mut(meeting.stage).push(meeting.clone());
    }
    buckets
}
