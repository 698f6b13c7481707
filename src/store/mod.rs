pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::Result,
    models::{
        calendar::CalendarScope,
        directory::{Learner, Skill, Teacher},
        session::{NewSession, Session, SessionDetail, SessionPatch},
    },
};

/// Half-open interval overlap: `[a_start, a_end)` intersects
/// `[b_start, b_end)`. Intervals that only share an endpoint do not overlap.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Read-only lookups against the marketplace directory.
///
/// Existence checks and name resolution only; the directory is owned by an
/// external subsystem and never mutated here.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Finds a teacher by ID.
    async fn find_teacher(&self, id: Uuid) -> Result<Option<Teacher>>;

    /// Finds a learner by ID.
    async fn find_learner(&self, id: Uuid) -> Result<Option<Learner>>;

    /// Finds a skill by ID.
    async fn find_skill(&self, id: Uuid) -> Result<Option<Skill>>;

    /// Whether the teacher has a registered offering for the skill.
    async fn teacher_offers_skill(&self, teacher_id: Uuid, skill_id: Uuid) -> Result<bool>;
}

/// The session store: owns session records and the atomicity guarantees
/// around them.
///
/// Implementations must make `create` atomic with respect to all other
/// concurrent creations touching the same teacher or learner: the conflict
/// check and the insert happen under one mutual-exclusion scope, so two
/// racing overlapping bookings can never both commit. `update` needs only
/// per-record atomicity. Reads are plain snapshots.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Atomically checks the candidate against all active sessions of either
    /// participant and inserts it with status `PENDING`.
    ///
    /// Fails with `SchedulingConflict` on overlap, leaving no record.
    async fn create(&self, candidate: NewSession) -> Result<SessionDetail>;

    /// Loads, patches, and persists a session in one step.
    ///
    /// Fails with `NotFound` for an unknown ID and `InvalidTransition` when
    /// the patch carries a forbidden status edge. Notes are applied
    /// unconditionally when present; a status-less patch touches the
    /// lifecycle machine not at all.
    async fn update(&self, id: Uuid, patch: SessionPatch) -> Result<SessionDetail>;

    /// Snapshot of `CONFIRMED` sessions visible in the given calendar scope,
    /// in query order.
    async fn confirmed_sessions(&self, scope: CalendarScope) -> Result<Vec<SessionDetail>>;

    /// Finds any active session of either participant overlapping the given
    /// interval, skipping `exclude_session_id` (for reschedule-style checks
    /// against a session's own record).
    ///
    /// Which conflicting record is returned is arbitrary; callers may rely
    /// only on the fact of conflict.
    async fn find_conflict(
        &self,
        teacher_id: Uuid,
        learner_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        exclude_session_id: Option<Uuid>,
    ) -> Result<Option<Session>>;
}

#[cfg(test)]
mod tests {
    use super::overlaps;
    use chrono::{DateTime, TimeZone, Utc};

    fn hm(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, min, 0).unwrap()
    }

    #[test]
    fn contained_interval_overlaps() {
        assert!(overlaps(hm(10, 0), hm(12, 0), hm(10, 30), hm(11, 30)));
    }

    #[test]
    fn partial_overlap_detected_both_sides() {
        assert!(overlaps(hm(10, 0), hm(11, 0), hm(10, 30), hm(11, 30)));
        assert!(overlaps(hm(10, 30), hm(11, 30), hm(10, 0), hm(11, 0)));
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        assert!(!overlaps(hm(10, 0), hm(11, 0), hm(11, 0), hm(12, 0)));
        assert!(!overlaps(hm(11, 0), hm(12, 0), hm(10, 0), hm(11, 0)));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!overlaps(hm(9, 0), hm(10, 0), hm(11, 0), hm(12, 0)));
    }

    #[test]
    fn identical_intervals_overlap() {
        assert!(overlaps(hm(10, 0), hm(11, 0), hm(10, 0), hm(11, 0)));
    }
}
