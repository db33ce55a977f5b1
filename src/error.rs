// src/error.rs
//! Error taxonomy for the HTTP boundary.
//!
//! Component errors (`SourceError`) are typed with `thiserror`; `AppError` is what
//! handlers return and is rendered as `{ "error": <kind>, "detail": <message> }`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Failures of the headline source adapter. All of them abort the request.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("news provider API key is not configured")]
    MissingApiKey,

    #[error("news provider unreachable: {0}")]
    Network(#[from] reqwest::Error),

    #[error("news provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("news provider error {code}: {message}")]
    Provider { code: String, message: String },

    #[error("malformed news provider payload: {0}")]
    Malformed(String),
}

/// Request parameters the headline source cannot serve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown category '{0}', expected one of: business, entertainment, general, health, science, sports, technology")]
    UnknownCategory(String),

    #[error("country must be a two-letter code, got '{0}'")]
    InvalidCountry(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("bad request: {0}")]
    InvalidQuery(#[from] QueryError),

    #[error("News fetching failed: {0}")]
    Source(#[from] SourceError),

    #[error("internal server error: {0}")]
    Internal(String),
}

/// JSON body for every non-2xx response. `detail` is what the UI shows.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub detail: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            AppError::Source(SourceError::MissingApiKey) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Source(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) | AppError::InvalidQuery(_) => "bad_request",
            AppError::Source(SourceError::MissingApiKey) => "source_not_configured",
            AppError::Source(_) => "source_unavailable",
            AppError::Internal(_) => "server_error",
        }
    }
}

// Body rejections (bad JSON, wrong types, missing content-type) get the same JSON shape.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }
        let body = ErrorBody {
            error: self.kind(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
