use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::store::StoreError;

/// Outcomes surfaced by the auth and habit services. Each maps to a stable,
/// distinguishable status; credential failures stay deliberately vague.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    /// Uniqueness conflict. The outward message stays generic.
    #[error("already in use")]
    Conflict,
    /// Unified login failure: unknown email and wrong password are identical.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Missing, malformed or expired token, or a stale subject. All look the
    /// same from outside.
    #[error("not authenticated")]
    Unauthenticated,
    /// Authenticated but not the owner of the resource.
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    /// A collaborator failed. Never retried, detail never leaks outward.
    #[error("service unavailable")]
    Unavailable(#[source] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => ApiError::Conflict,
            StoreError::Unavailable(src) => ApiError::Unavailable(src),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict => (StatusCode::CONFLICT, "Already in use".to_string()),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Not authenticated".to_string())
            }
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Unavailable(src) => {
                error!(error = %src, "collaborator unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service unavailable".to_string(),
                )
            }
        };
        (status, message).into_response()
    }
}
