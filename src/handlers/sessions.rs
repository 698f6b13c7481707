use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::Result,
    handlers::respond,
    middleware_layer::auth::require_role,
    models::{
        principal::{Principal, Role},
        session::{NewSession, SessionPatch, SessionStatus},
    },
    services::scheduling,
    state::AppState,
};

/// The request payload for booking a session.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub teacher_id: Uuid,
    pub learner_id: Uuid,
    pub skill_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
}

/// The request payload for updating a session. Only status and notes are
/// mutable; participants and the interval are fixed at booking time.
#[derive(Deserialize)]
pub struct UpdateSessionRequest {
    pub status: Option<SessionStatus>,
    pub notes: Option<String>,
}

/// Books a session. Learner-confirmed or admin-originated requests only.
#[axum::debug_handler]
pub async fn create_session(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Response> {
    require_role(&principal, &[Role::Learner, Role::Admin])?;

    let candidate = NewSession {
        teacher_id: req.teacher_id,
        learner_id: req.learner_id,
        skill_id: req.skill_id,
        start_time: req.start_time,
        end_time: req.end_time,
        notes: req.notes,
    };

    let detail = scheduling::create_session(&state, candidate).await?;

    respond::send(StatusCode::CREATED, "Session created successfully", detail)
}

/// Updates a session's status and/or notes. Teacher-originated requests only.
#[axum::debug_handler]
pub async fn update_session(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<UpdateSessionRequest>,
) -> Result<Response> {
    require_role(&principal, &[Role::Teacher])?;

    let patch = SessionPatch {
        status: req.status,
        notes: req.notes,
    };

    let detail = scheduling::update_session(&state, session_id, patch).await?;

    respond::send(StatusCode::OK, "Session updated successfully", detail)
}
