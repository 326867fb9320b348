//! Error responses for the card API.
//!
//! Every failure leaves the server as `{"error": "<message>"}` with a status
//! chosen by [`IntoErrorResponse::status_code`].
use serde::{Deserialize, Serialize};
use std::fmt;
use tarot_engine::SelectionError;
use thiserror::Error;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

pub const NOT_FOUND_MESSAGE: &str = "Not Found";
pub const BAD_REQUEST_MESSAGE: &str = "Bad Request";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn into_response(self, status: StatusCode) -> Response {
        reply::with_status(reply::json(&self), status).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

/// Error classification for logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 4xx: expected during normal operation
    Client,
    /// 5xx
    Server,
}

/// Converts an error into the JSON error body, logging it on the way out.
pub trait IntoErrorResponse: fmt::Display {
    fn status_code(&self) -> StatusCode;

    /// Message shown to the caller. Server faults hide their details.
    fn error_message(&self) -> String {
        if self.status_code().is_server_error() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    fn severity(&self) -> ErrorSeverity {
        if self.status_code().is_server_error() {
            ErrorSeverity::Server
        } else {
            ErrorSeverity::Client
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_message())
    }

    fn into_http_response(self) -> Response
    where
        Self: Sized,
    {
        let status = self.status_code();
        match self.severity() {
            ErrorSeverity::Client => {
                tracing::info!(status = status.as_u16(), error = %self, "client error")
            }
            ErrorSeverity::Server => {
                tracing::error!(status = status.as_u16(), error = %self, "server error")
            }
        }
        self.to_error_response().into_response(status)
    }
}

impl IntoErrorResponse for SelectionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SelectionError::NotFound(_) => StatusCode::NOT_FOUND,
            SelectionError::Validation(_)
            | SelectionError::NoCardsAvailable
            | SelectionError::InsufficientPopulation { .. } => StatusCode::BAD_REQUEST,
            SelectionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failures a request handler can surface.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("request task failed: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoErrorResponse for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Selection(err) => err.status_code(),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
