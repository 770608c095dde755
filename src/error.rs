use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Rejections produced by the sandbox handlers. Every variant carries the
/// exact message returned to the caller in a `{"message": ...}` body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Too early: {0}")]
    TooEarly(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            // 425 Too Early
            Self::TooEarly(_) => StatusCode::from_u16(425).unwrap_or(StatusCode::CONFLICT),
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Forbidden(msg)
            | Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::TooEarly(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(msg) => tracing::warn!(reason = %msg, "Simulated server error"),
            Self::Forbidden(msg) => tracing::debug!(reason = %msg, "Client banned"),
            Self::BadRequest(msg) | Self::NotFound(msg) | Self::TooEarly(msg) => {
                tracing::debug!(reason = %msg, status = status.as_u16(), "Request rejected");
            }
        }

        let body = Json(json!({
            "message": self.message()
        }));

        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorObject {
    id: &'static str,
    status: String,
    title: &'static str,
    description: &'static str,
}

/// Errors raised at the edge rather than by the sandbox handlers. These use
/// the gateway's `{"errors": [...]}` envelope.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Not acceptable")]
    NotAcceptable,
    #[error("Request timeout")]
    RequestTimeout,
    #[error("Gateway timeout")]
    GatewayTimeout,
}

impl GatewayError {
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn object(self) -> ErrorObject {
        let (id, title, description) = match self {
            Self::NotAcceptable => (
                "CM_NOT_ACCEPTABLE",
                "Client may not accept the response content type",
                "This service can only generate application/vnd.api+json or application/json.",
            ),
            Self::RequestTimeout => (
                "CM_TIMEOUT",
                "Request timeout",
                "The service was unable to receive your request within the timeout period.",
            ),
            Self::GatewayTimeout => (
                "CM_TIMEOUT",
                "Unable to call service",
                "The downstream service has not responded within the configured timeout period.",
            ),
        };
        ErrorObject { id, status: self.status().as_u16().to_string(), title, description }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "Gateway error");
        (self.status(), Json(json!({ "errors": [self.object()] }))).into_response()
    }
}
