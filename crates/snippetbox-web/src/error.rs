//! Error types for the web layer.
//!
//! Client errors carry only the canonical status text. Server errors are
//! logged with their full detail and a captured backtrace; the request span
//! opened by the logging middleware attaches method and URI to the event.
//! The client always receives the generic "Internal Server Error" body.

use std::backtrace::Backtrace;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Web service error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The requested page or snippet does not exist.
    #[error("not found")]
    NotFound,

    /// The request could not be decoded (e.g. a malformed form body).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Snippet store failure other than "no record".
    #[error("store error: {0}")]
    Store(snippetbox_core::Error),

    /// A handler asked for a page the template cache doesn't hold.
    #[error("template {0} does not exist")]
    MissingTemplate(String),

    /// Template execution failed.
    #[error("render error: {0}")]
    Render(#[from] minijinja::Error),

    /// Any other internal failure.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<snippetbox_core::Error> for AppError {
    fn from(err: snippetbox_core::Error) -> Self {
        match err {
            snippetbox_core::Error::NoRecord => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

impl AppError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::MissingTemplate(_) | Self::Render(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::NotFound => {}
            Self::BadRequest(reason) => {
                tracing::debug!(reason = %reason, "rejected malformed request");
            }
            _ => {
                let trace = Backtrace::force_capture();
                tracing::error!(error = %self, trace = %trace, "server error");
            }
        }

        client_error(status)
    }
}

/// Plain-text response carrying only the canonical reason for `status`.
pub fn client_error(status: StatusCode) -> Response {
    let body = status.canonical_reason().unwrap_or("Unknown Error");
    (status, body).into_response()
}
