use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::session::SessionStatus;

/// Which schedule a calendar request is scoped to.
///
/// Each variant carries exactly the data its projection needs: the two
/// participant scopes filter to one side of the session and name the
/// counterpart, the admin scope is unfiltered and names both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarScope {
    /// Sessions where the given teacher teaches; events name the learner.
    Teacher(Uuid),
    /// Sessions where the given learner attends; events name the teacher.
    Learner(Uuid),
    /// All confirmed sessions; events name both participants.
    Admin,
}

/// A read-only projection of a confirmed session for schedule display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Uuid,
    /// Human-readable title naming the skill and the counterpart.
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Sessions are time-bound slots, never all-day entries.
    pub all_day: bool,
    pub extended_props: ExtendedProps,
}

/// Raw ids and names carried alongside each event for client-side use.
/// Participant fields are populated per the viewing scope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedProps {
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learner_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learner_name: Option<String>,
    pub skill_id: Uuid,
    pub skill_name: String,
}
