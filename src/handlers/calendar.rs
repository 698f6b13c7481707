use axum::{extract::State, http::StatusCode, response::Response, Extension};

use crate::{
    error::Result,
    handlers::respond,
    middleware_layer::auth::require_role,
    models::{
        calendar::CalendarScope,
        principal::{Principal, Role},
    },
    services::calendar,
    state::AppState,
};

/// The calling teacher's schedule of confirmed sessions.
#[axum::debug_handler]
pub async fn teacher_calendar(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Response> {
    require_role(&principal, &[Role::Teacher])?;

    let events = calendar::calendar_events(&state, CalendarScope::Teacher(principal.user_id)).await?;

    respond::send(
        StatusCode::OK,
        "Teacher calendar events fetched successfully",
        events,
    )
}

/// The calling learner's schedule of confirmed sessions.
#[axum::debug_handler]
pub async fn learner_calendar(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Response> {
    require_role(&principal, &[Role::Learner])?;

    let events = calendar::calendar_events(&state, CalendarScope::Learner(principal.user_id)).await?;

    respond::send(
        StatusCode::OK,
        "Learner calendar events fetched successfully",
        events,
    )
}

/// The global schedule of confirmed sessions. Admin only.
#[axum::debug_handler]
pub async fn admin_calendar(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Response> {
    require_role(&principal, &[Role::Admin])?;

    let events = calendar::calendar_events(&state, CalendarScope::Admin).await?;

    respond::send(
        StatusCode::OK,
        "Admin calendar events fetched successfully",
        events,
    )
}
