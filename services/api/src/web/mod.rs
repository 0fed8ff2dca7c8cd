//! services/api/src/web/mod.rs
//!
//! The HTTP layer: Axum handlers, shared state, auth, and the OpenAPI spec.

pub mod auth;
pub mod documents;
pub mod interviews;
pub mod middleware;
pub mod profiles;
pub mod public;
pub mod rest;
pub mod state;
pub mod transcription;
pub mod uploads;

pub use middleware::require_auth;

use axum::http::StatusCode;
use capture_core::ports::PortError;
use tracing::error;

/// Maps a port error onto the HTTP status and message a handler should return.
///
/// `Unexpected` details are logged but never echoed to the client.
pub(crate) fn port_err(err: PortError) -> (StatusCode, String) {
    match err {
        PortError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} was not found", what)),
        PortError::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
        PortError::InsufficientContent => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Please answer at least a couple of questions before generating".to_string(),
        ),
        PortError::SessionCompleted => (
            StatusCode::CONFLICT,
            "This interview has already been completed".to_string(),
        ),
        PortError::RateLimited => (
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded. Please try again in a moment.".to_string(),
        ),
        PortError::QuotaExceeded => (
            StatusCode::PAYMENT_REQUIRED,
            "AI usage limit reached. Please add credits.".to_string(),
        ),
        PortError::Unavailable(detail) => {
            error!("Collaborator unavailable: {}", detail);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "The AI service is temporarily unavailable".to_string(),
            )
        }
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::Unexpected(detail) => {
            error!("Unexpected port error: {}", detail);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        assert_eq!(
            port_err(PortError::NotFound("Document".into())).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            port_err(PortError::Validation("bad".into())).0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            port_err(PortError::SessionCompleted).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            port_err(PortError::RateLimited).0,
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            port_err(PortError::QuotaExceeded).0,
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            port_err(PortError::Unavailable("down".into())).0,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn unexpected_details_are_not_echoed() {
        let (status, message) = port_err(PortError::Unexpected("pg password in DSN".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("password"));
    }
}
