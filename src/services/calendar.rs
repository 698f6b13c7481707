use crate::{
    error::Result,
    models::{
        calendar::{CalendarEvent, CalendarScope, ExtendedProps},
        session::SessionDetail,
    },
    state::AppState,
};

/// Projects one confirmed session into a calendar event for the given scope.
///
/// Pure mapping; the title names the counterpart of the viewing role and the
/// extended props carry the raw ids/names the client needs.
pub fn project(detail: &SessionDetail, scope: CalendarScope) -> CalendarEvent {
    let session = &detail.session;

    let (title, props) = match scope {
        CalendarScope::Teacher(_) => (
            format!("{} with {}", detail.skill.name, detail.learner.name),
            ExtendedProps {
                status: session.status,
                teacher_id: None,
                teacher_name: None,
                learner_id: Some(detail.learner.id),
                learner_name: Some(detail.learner.name.clone()),
                skill_id: detail.skill.id,
                skill_name: detail.skill.name.clone(),
            },
        ),
        CalendarScope::Learner(_) => (
            format!("{} with {}", detail.skill.name, detail.teacher.name),
            ExtendedProps {
                status: session.status,
                teacher_id: Some(detail.teacher.id),
                teacher_name: Some(detail.teacher.name.clone()),
                learner_id: None,
                learner_name: None,
                skill_id: detail.skill.id,
                skill_name: detail.skill.name.clone(),
            },
        ),
        CalendarScope::Admin => (
            format!(
                "{}: {} - {}",
                detail.skill.name, detail.teacher.name, detail.learner.name
            ),
            ExtendedProps {
                status: session.status,
                teacher_id: Some(detail.teacher.id),
                teacher_name: Some(detail.teacher.name.clone()),
                learner_id: Some(detail.learner.id),
                learner_name: Some(detail.learner.name.clone()),
                skill_id: detail.skill.id,
                skill_name: detail.skill.name.clone(),
            },
        ),
    };

    CalendarEvent {
        id: session.id,
        title,
        start: session.start_time,
        end: session.end_time,
        all_day: false,
        extended_props: props,
    }
}

/// Fetches the confirmed sessions visible in `scope` and projects them.
/// Snapshot read; no locking, no mutation.
pub async fn calendar_events(state: &AppState, scope: CalendarScope) -> Result<Vec<CalendarEvent>> {
    let sessions = state.store.confirmed_sessions(scope).await?;
    Ok(sessions.iter().map(|d| project(d, scope)).collect())
}

#[cfg(test)]
mod tests {
    use super::project;
    use crate::models::{
        calendar::CalendarScope,
        directory::PartyRef,
        session::{Session, SessionDetail, SessionStatus},
    };
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn fixture() -> SessionDetail {
        let teacher_id = Uuid::new_v4();
        let learner_id = Uuid::new_v4();
        let skill_id = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        SessionDetail {
            session: Session {
                id: Uuid::new_v4(),
                teacher_id,
                learner_id,
                skill_id,
                start_time: Utc.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap(),
                end_time: Utc.with_ymd_and_hms(2026, 3, 10, 11, 0, 0).unwrap(),
                status: SessionStatus::Confirmed,
                notes: None,
                created_at: now,
                updated_at: now,
            },
            teacher: PartyRef { id: teacher_id, name: "Ada".to_string() },
            learner: PartyRef { id: learner_id, name: "Linus".to_string() },
            skill: PartyRef { id: skill_id, name: "Rust".to_string() },
        }
    }

    #[test]
    fn teacher_view_names_the_learner() {
        let detail = fixture();
        let event = project(&detail, CalendarScope::Teacher(detail.teacher.id));
        assert_eq!(event.title, "Rust with Linus");
        assert_eq!(event.extended_props.learner_name.as_deref(), Some("Linus"));
        assert!(event.extended_props.teacher_name.is_none());
        assert!(!event.all_day);
    }

    #[test]
    fn learner_view_names_the_teacher() {
        let detail = fixture();
        let event = project(&detail, CalendarScope::Learner(detail.learner.id));
        assert_eq!(event.title, "Rust with Ada");
        assert_eq!(event.extended_props.teacher_name.as_deref(), Some("Ada"));
        assert!(event.extended_props.learner_name.is_none());
    }

    #[test]
    fn admin_view_names_both() {
        let detail = fixture();
        let event = project(&detail, CalendarScope::Admin);
        assert_eq!(event.title, "Rust: Ada - Linus");
        assert_eq!(event.extended_props.teacher_name.as_deref(), Some("Ada"));
        assert_eq!(event.extended_props.learner_name.as_deref(), Some("Linus"));
    }

    #[test]
    fn event_carries_the_session_interval() {
        let detail = fixture();
        let event = project(&detail, CalendarScope::Admin);
        assert_eq!(event.id, detail.session.id);
        assert_eq!(event.start, detail.session.start_time);
        assert_eq!(event.end, detail.session.end_time);
    }
}
