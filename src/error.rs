//! Unified error types for the backend.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum AppError {
    /// No route matched the request.
    #[error("endpoint not found: {path}")]
    NotFound {
        /// Full requested URL.
        path: String,
    },

    /// Unhandled fault while serving the request.
    #[error("internal server error: {0}")]
    Internal(String),

    /// Request body could not be extracted as JSON.
    #[error(transparent)]
    JsonBody(#[from] JsonRejection),
}

/// JSON envelope for every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable summary.
    pub message: String,
    /// Requested URL, present on 404.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Fault description, present on 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::JsonBody(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::NotFound { path } => ErrorBody {
                message: "Endpoint not found".to_string(),
                path: Some(path),
                detail: None,
            },
            AppError::Internal(detail) => {
                tracing::error!(%detail, "request failed with internal error");
                ErrorBody {
                    message: "Internal server error".to_string(),
                    path: None,
                    detail: Some(detail),
                }
            }
            AppError::JsonBody(rejection) => ErrorBody {
                message: rejection.body_text(),
                path: None,
                detail: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Errors that stop the server from starting.
#[derive(Error, Debug)]
pub enum StartupError {
    /// Environment could not be deserialized into a config.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Config loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Prometheus exporter could not be installed.
    #[error("metrics exporter error: {0}")]
    Metrics(String),

    /// IO error (bind, accept).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
