use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gateway error taxonomy.
///
/// Every variant is terminal for the request — the gateway never retries
/// on its own. Messages stay free of secret material (tokens, session
/// attributes); anything sensitive goes to the logs, redacted.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No application prefix supplied")]
    InvalidPrefix,

    #[error("No application registered for prefix: {0}")]
    ApplicationNotFound(String),

    #[error("Application '{0}' has no routable host configured")]
    UndefinedHost(String),

    #[error("Request body is not valid JSON")]
    InvalidBody,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Conflicting lookup configuration for this route")]
    ConfigurationAmbiguous,

    #[error("Upstream host unavailable")]
    UpstreamUnavailable,

    #[error("Upstream host timed out")]
    UpstreamTimeout,

    #[error("Internal server error")]
    Internal,
}

/// Error response body: a stable machine-readable code plus a
/// human-readable message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPrefix => StatusCode::BAD_REQUEST,
            ApiError::ApplicationNotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::UndefinedHost(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::InsufficientPermissions => StatusCode::FORBIDDEN,
            ApiError::ConfigurationAmbiguous => StatusCode::BAD_REQUEST,
            ApiError::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the stable error code for the error type
    pub fn error_code(&self) -> &str {
        match self {
            ApiError::InvalidPrefix => "INVALID_PREFIX",
            ApiError::ApplicationNotFound(_) => "APPLICATION_NOT_FOUND",
            ApiError::UndefinedHost(_) => "UNDEFINED_HOST",
            ApiError::InvalidBody => "INVALID_BODY",
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            ApiError::ConfigurationAmbiguous => "CONFIGURATION_AMBIGUOUS",
            ApiError::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ApiError::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            ApiError::Internal => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Map authentication failures onto the taxonomy. All of them collapse
/// into 401: a verified token without a live session is just as
/// unauthenticated as a missing one.
impl From<session::SessionError> for ApiError {
    fn from(_: session::SessionError) -> Self {
        ApiError::Unauthenticated
    }
}

impl From<authz::DenyReason> for ApiError {
    fn from(reason: authz::DenyReason) -> Self {
        match reason {
            authz::DenyReason::Unauthenticated => ApiError::Unauthenticated,
            authz::DenyReason::InsufficientPermissions => ApiError::InsufficientPermissions,
            authz::DenyReason::ConfigurationAmbiguous => ApiError::ConfigurationAmbiguous,
        }
    }
}

impl From<directory::DirectoryError> for ApiError {
    fn from(err: directory::DirectoryError) -> Self {
        tracing::error!(error = %err, "directory backend failure");
        ApiError::Internal
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
