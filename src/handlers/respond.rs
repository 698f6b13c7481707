use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::{AppError, Result};

/// The response envelope every successful endpoint returns.
#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    success: bool,
    message: &'a str,
    data: T,
}

/// Wraps `data` in the success envelope and renders it with the given status.
pub fn send<T: Serialize>(status: StatusCode, message: &str, data: T) -> Result<Response> {
    let body = sonic_rs::to_string(&Envelope {
        success: true,
        message,
        data,
    })
    .map_err(|e| AppError::Internal(format!("Response serialization failed: {}", e)))?;

    Ok((status, body).into_response())
}
