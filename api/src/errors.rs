use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Credential rejected: {0}")]
    CredentialRejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// HTTP status used when this error crosses the REST boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingCredential(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::CredentialRejected(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::OutOfRange(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AppError::MissingCredential(msg)
            | AppError::CredentialRejected(msg)
            | AppError::NotFound(msg)
            | AppError::UpstreamUnavailable(msg)
            | AppError::OutOfRange(msg)
            | AppError::BadRequest(msg)
            | AppError::ExternalServiceError(msg) => msg,
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter.
        AppError::ExternalServiceError(format!(
            "OpenWeatherMap request failed: {}",
            err.without_url()
        ))
    }
}
