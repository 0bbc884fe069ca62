//! Mapping of client errors to HTTP responses.
//!
//! Every failure surfaces as `500 Internal Server Error` with a fixed,
//! client-safe message. The underlying error is logged, never returned.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

/// Public classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The node could not be queried.
    NodeUnavailable,
    /// The node returned logs that do not match the contract ABI.
    MalformedEvent,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// Message shown to clients.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NodeUnavailable => "the blockchain node could not be queried",
            Self::MalformedEvent => "the node returned an event that does not match the contract ABI",
            Self::Internal => "internal server error",
        }
    }
}

/// Error returned by route handlers.
#[derive(Debug)]
pub struct ApiError {
    kind: ErrorKind,
    source: dexterity::Error,
}

impl ApiError {
    /// Public classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<dexterity::Error> for ApiError {
    fn from(source: dexterity::Error) -> Self {
        let kind = match source {
            dexterity::Error::Rpc(_) => ErrorKind::NodeUnavailable,
            dexterity::Error::MalformedEvent { .. } => ErrorKind::MalformedEvent,
            _ => ErrorKind::Internal,
        };
        Self { kind, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(kind = ?self.kind, error = %self.source, "request failed");
        let body = json!({
            "error": {
                "kind": self.kind,
                "message": self.kind.message(),
            }
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_library_errors() {
        let rpc = ApiError::from(dexterity::Error::Rpc("connection refused".to_owned()));
        assert_eq!(rpc.kind(), ErrorKind::NodeUnavailable);

        let malformed = ApiError::from(dexterity::Error::MalformedEvent {
            event: "Swapped",
            reason: "topic mismatch".to_owned(),
        });
        assert_eq!(malformed.kind(), ErrorKind::MalformedEvent);

        let other = ApiError::from(dexterity::Error::EventNotFound("Deposited"));
        assert_eq!(other.kind(), ErrorKind::Internal);
    }

    #[test]
    fn response_hides_error_detail() {
        let response =
            ApiError::from(dexterity::Error::Rpc("secret-host:8545 refused".to_owned()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
