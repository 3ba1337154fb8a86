//! Typed errors and HTTP mapping.

use crate::service::ValidationError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("config load: {0}")]
    Load(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Customer not found")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Member number already exists")]
    DuplicateMemberNumber,
    /// Store failure, carrying the operation-specific message shown to clients.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("template: {0}")]
    Template(#[from] tera::Error),
}

impl AppError {
    /// Wrap a store error for the given operation. Duplicate keys keep their own variant so
    /// clients can tell them apart from generic failures.
    pub fn store(context: &'static str, source: StoreError) -> Self {
        match source {
            StoreError::DuplicateKey => AppError::DuplicateMemberNumber,
            source => AppError::Store { context, source },
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, details: Option<String>) -> Self {
        ErrorBody {
            error: error.into(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, ErrorBody::new(self.to_string(), None)),
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Validation failed", Some(e.to_string())),
            ),
            AppError::DuplicateMemberNumber => {
                (StatusCode::BAD_REQUEST, ErrorBody::new(self.to_string(), None))
            }
            AppError::Store { context, source } => {
                tracing::error!(error = %source, "{}", context);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(*context, Some(source.to_string())),
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Invalid request body", Some(msg.clone())),
            ),
            AppError::Template(e) => {
                tracing::error!(error = ?e, "page rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Failed to render page", Some(e.to_string())),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
