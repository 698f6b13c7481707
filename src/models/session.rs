use chrono::{DateTime, Utc};
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::directory::PartyRef;

/// The booking lifecycle state of a session.
///
/// Stored in PostgreSQL as the `session_status` enum and serialized on the
/// wire in SCREAMING_SNAKE_CASE (`PENDING`, `CONFIRMED`, `COMPLETED`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSql, FromSql)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[postgres(name = "session_status")]
pub enum SessionStatus {
    /// Requested by a learner, not yet accepted by the teacher.
    #[postgres(name = "PENDING")]
    Pending,
    /// Accepted by the teacher; visible on calendars.
    #[postgres(name = "CONFIRMED")]
    Confirmed,
    /// Held and finished. Terminal.
    #[postgres(name = "COMPLETED")]
    Completed,
}

impl SessionStatus {
    /// Whether the session still occupies its time slot for conflict
    /// purposes (`PENDING` or `CONFIRMED`).
    pub fn is_active(self) -> bool {
        matches!(self, SessionStatus::Pending | SessionStatus::Confirmed)
    }

    /// The legal transition table: `PENDING → CONFIRMED → COMPLETED`.
    ///
    /// Self-loops and edges out of `COMPLETED` are forbidden; a no-op
    /// "transition" is rejected, not silently accepted.
    pub fn can_transition(self, to: SessionStatus) -> bool {
        matches!(
            (self, to),
            (SessionStatus::Pending, SessionStatus::Confirmed)
                | (SessionStatus::Confirmed, SessionStatus::Completed)
        )
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionStatus::Pending => "PENDING",
            SessionStatus::Confirmed => "CONFIRMED",
            SessionStatus::Completed => "COMPLETED",
        };
        write!(f, "{}", s)
    }
}

/// Represents a scheduled session between a teacher and a learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The unique identifier for the session.
    pub id: Uuid,
    /// The teacher giving the session. Immutable after creation.
    pub teacher_id: Uuid,
    /// The learner taking the session. Immutable after creation.
    pub learner_id: Uuid,
    /// The skill being taught. Must be an offering the teacher has registered.
    pub skill_id: Uuid,
    /// The start of the booked interval (inclusive).
    pub start_time: DateTime<Utc>,
    /// The end of the booked interval (exclusive).
    pub end_time: DateTime<Utc>,
    /// The lifecycle state of the session.
    pub status: SessionStatus,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A session with its referenced teacher, learner, and skill resolved,
/// as returned to API callers.
#[derive(Debug, Clone, Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: Session,
    pub teacher: PartyRef,
    pub learner: PartyRef,
    pub skill: PartyRef,
}

/// A candidate session to be created. Status is not caller-supplied:
/// every session starts as `PENDING`.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub teacher_id: Uuid,
    pub learner_id: Uuid,
    pub skill_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
}

/// A partial update to a session. Only status and notes are mutable.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub status: Option<SessionStatus>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::SessionStatus::{Completed, Confirmed, Pending};

    #[test]
    fn pending_confirms_and_confirmed_completes() {
        assert!(Pending.can_transition(Confirmed));
        assert!(Confirmed.can_transition(Completed));
    }

    #[test]
    fn skipping_confirmation_is_forbidden() {
        assert!(!Pending.can_transition(Completed));
    }

    #[test]
    fn completed_is_terminal() {
        assert!(!Completed.can_transition(Pending));
        assert!(!Completed.can_transition(Confirmed));
        assert!(!Completed.can_transition(Completed));
    }

    #[test]
    fn self_loops_are_rejected() {
        assert!(!Pending.can_transition(Pending));
        assert!(!Confirmed.can_transition(Confirmed));
    }

    #[test]
    fn no_backwards_edges() {
        assert!(!Confirmed.can_transition(Pending));
    }

    #[test]
    fn active_means_pending_or_confirmed() {
        assert!(Pending.is_active());
        assert!(Confirmed.is_active());
        assert!(!Completed.is_active());
    }
}
