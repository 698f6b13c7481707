use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::directory::EntityKind;
use crate::models::session::SessionStatus;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A referenced teacher, learner, skill, or session does not exist.
    #[error("{0} not found")]
    NotFound(EntityKind),

    /// The teacher has no registered offering for the requested skill.
    #[error("Teacher doesn't teach this skill")]
    OfferingMissing,

    /// The requested interval overlaps an active session for one of the
    /// participants.
    #[error("Time slot conflicts with existing session")]
    SchedulingConflict,

    /// An illegal or no-op status edge.
    #[error("Cannot transition from {0} to {1}")]
    InvalidTransition(SessionStatus, SessionStatus),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A missing or malformed principal.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The principal's role does not permit the operation.
    #[error("Authorization failed")]
    Forbidden,

    /// A database error.
    #[error("Database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A pool construction error.
    #[error("Pool creation error: {0}")]
    CreatePool(#[from] deadpool_postgres::CreatePoolError),

    /// A row was missing an expected column.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(kind) => {
                tracing::debug!("{} not found", kind);
                (StatusCode::NOT_FOUND, format!("{} not found", kind))
            }

            AppError::OfferingMissing => {
                tracing::debug!("Offering check failed");
                (
                    StatusCode::BAD_REQUEST,
                    "Teacher doesn't teach this skill".to_string(),
                )
            }

            AppError::SchedulingConflict => {
                tracing::debug!("Scheduling conflict");
                (
                    StatusCode::BAD_REQUEST,
                    "Time slot conflicts with existing session".to_string(),
                )
            }

            AppError::InvalidTransition(from, to) => {
                tracing::debug!("Invalid transition: {} -> {}", from, to);
                (
                    StatusCode::BAD_REQUEST,
                    format!("Cannot transition from {} to {}", from, to),
                )
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::Authentication(ref msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                (StatusCode::UNAUTHORIZED, msg.clone())
            }

            AppError::Forbidden => {
                tracing::warn!("Authorization failed");
                (StatusCode::FORBIDDEN, "Forbidden".to_string())
            }

            AppError::Postgres(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::Pool(ref e) => {
                tracing::error!("Pool error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::CreatePool(ref e) => {
                tracing::error!("Pool creation error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::MissingData(ref column) => {
                tracing::error!("Row missing column: {}", column);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "success": false,
            "message": message
        }))
        .unwrap_or_else(|_| r#"{"success":false,"message":"Internal server error"}"#.to_string());

        (status, body).into_response()
    }
}
