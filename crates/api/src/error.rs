//! Error responses for the proxy.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use stylist_core::StylistError;
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned by handlers. Every variant renders as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure from the proxy pipeline.
    #[error(transparent)]
    Stylist(#[from] StylistError),

    /// Request body was not valid JSON for the endpoint.
    #[error("invalid request body: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    /// Status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Stylist(err) => match err {
                StylistError::MissingField(_) => StatusCode::BAD_REQUEST,
                StylistError::Authentication(_) => StatusCode::UNAUTHORIZED,
                StylistError::NoUsableModel => StatusCode::SERVICE_UNAVAILABLE,
                StylistError::MissingCredential
                | StylistError::Upstream(_)
                | StylistError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", self);
        } else {
            warn!(status = status.as_u16(), "{}", self);
        }

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (StylistError::MissingField("closet"), StatusCode::BAD_REQUEST),
            (StylistError::MissingCredential, StatusCode::INTERNAL_SERVER_ERROR),
            (StylistError::Authentication("bad key".into()), StatusCode::UNAUTHORIZED),
            (StylistError::NoUsableModel, StatusCode::SERVICE_UNAVAILABLE),
            (StylistError::Upstream("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    }
}
