//! Session scheduling engine for a skill-exchange marketplace.
//!
//! Learners book time-bound sessions with teachers for a specific skill. The
//! engine validates the referenced directory entities, prevents
//! double-booking through an atomic conflict-check-and-insert, drives the
//! `PENDING → CONFIRMED → COMPLETED` lifecycle, and projects confirmed
//! sessions into role-scoped calendar views.

use axum::{
    middleware::from_fn,
    routing::{get, patch, post},
    Router,
};

pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod store;

pub mod models {
    pub mod calendar;
    pub mod directory;
    pub mod principal;
    pub mod session;
}

pub mod services {
    pub mod calendar;
    pub mod scheduling;
}

pub mod handlers {
    pub mod calendar;
    pub mod respond;
    pub mod sessions;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod session;
}

use state::AppState;

/// Assembles the session routes behind the principal-extraction middleware.
///
/// Role requirements are enforced per handler; identity itself comes from
/// the upstream provider's headers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions", post(handlers::sessions::create_session))
        .route(
            "/api/sessions/{session_id}",
            patch(handlers::sessions::update_session),
        )
        .route(
            "/api/sessions/teacher/calendar",
            get(handlers::calendar::teacher_calendar),
        )
        .route(
            "/api/sessions/learner/calendar",
            get(handlers::calendar::learner_calendar),
        )
        .route(
            "/api/sessions/calendar",
            get(handlers::calendar::admin_calendar),
        )
        .route_layer(from_fn(middleware_layer::auth::require_auth))
        .with_state(state)
}
