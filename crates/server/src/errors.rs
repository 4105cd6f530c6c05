use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::ServiceError;
use service::importer::ImportError;
use thiserror::Error;
use tracing::error;

/// Error response with a `{"error": "..."}` body.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

/// NotFound → 404, bad input → 400, anything else → 500.
impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => JsonApiError::new(StatusCode::NOT_FOUND, e.to_string()),
            _ if e.is_client_error() => JsonApiError::new(StatusCode::BAD_REQUEST, e.to_string()),
            _ => {
                error!(err = %e, "request failed");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        JsonApiError::new(StatusCode::BAD_REQUEST, format!("invalid request body: {}", rejection.body_text()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("import failed: {0}")]
    Import(#[from] ImportError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
