use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        directory::EntityKind,
        session::{NewSession, SessionDetail, SessionPatch, SessionStatus},
    },
    state::AppState,
    validation::session as session_validation,
};

/// Books a new session.
///
/// Validates the request shape, checks the referenced entities and the
/// teacher's offering against the directory, then hands the candidate to the
/// store, whose atomic create re-runs the conflict check under its
/// mutual-exclusion scope before inserting. Any failure aborts with no
/// partial state.
pub async fn create_session(state: &AppState, candidate: NewSession) -> Result<SessionDetail> {
    session_validation::validate_interval(candidate.start_time, candidate.end_time)?;
    if let Some(notes) = &candidate.notes {
        session_validation::validate_notes(notes)?;
    }

    state
        .directory
        .find_teacher(candidate.teacher_id)
        .await?
        .ok_or(AppError::NotFound(EntityKind::Teacher))?;
    state
        .directory
        .find_learner(candidate.learner_id)
        .await?
        .ok_or(AppError::NotFound(EntityKind::Learner))?;
    state
        .directory
        .find_skill(candidate.skill_id)
        .await?
        .ok_or(AppError::NotFound(EntityKind::Skill))?;

    if !state
        .directory
        .teacher_offers_skill(candidate.teacher_id, candidate.skill_id)
        .await?
    {
        return Err(AppError::OfferingMissing);
    }

    let detail = state.store.create(candidate).await?;
    tracing::info!(
        session_id = %detail.session.id,
        teacher_id = %detail.session.teacher_id,
        learner_id = %detail.session.learner_id,
        "📅 Session booked"
    );

    Ok(detail)
}

/// Applies a status and/or notes patch to a session.
///
/// Status edges go through the lifecycle table inside the store; a
/// status-less patch (pure notes edit) bypasses the lifecycle machine
/// entirely.
pub async fn update_session(
    state: &AppState,
    session_id: Uuid,
    patch: SessionPatch,
) -> Result<SessionDetail> {
    if let Some(notes) = &patch.notes {
        session_validation::validate_notes(notes)?;
    }

    let detail = state.store.update(session_id, patch).await?;

    // Completion is where the review subsystem picks up downstream.
    if detail.session.status == SessionStatus::Completed {
        tracing::info!(session_id = %detail.session.id, "🎓 Session completed");
    }

    Ok(detail)
}
