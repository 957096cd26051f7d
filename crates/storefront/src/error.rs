//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cart::{CartStoreError, SyncError};
use crate::commerce::CommerceError;
use crate::db::RepositoryError;
use crate::orders::ValidationErrors;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Commerce platform API operation failed.
    #[error("Commerce error: {0}")]
    Commerce(#[from] CommerceError),

    /// Cart persistence failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartStoreError),

    /// Remote cart synchronisation failed.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Order payload failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Cart(_)
                | Self::Session(_)
                | Self::Commerce(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        match self {
            // Validation failures carry a structured per-field body so the
            // client can mark each offending input.
            Self::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
            }
            other => {
                let status = match &other {
                    Self::Database(_) | Self::Internal(_) | Self::Cart(_) | Self::Session(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                    Self::Commerce(_) | Self::Sync(_) => StatusCode::BAD_GATEWAY,
                    Self::NotFound(_) => StatusCode::NOT_FOUND,
                    Self::BadRequest(_) => StatusCode::BAD_REQUEST,
                    Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                };

                // Don't expose internal error details to clients
                let message = match &other {
                    Self::Database(_) | Self::Internal(_) | Self::Cart(_) | Self::Session(_) => {
                        "Internal server error".to_string()
                    }
                    Self::Commerce(_) | Self::Sync(_) => "External service error".to_string(),
                    _ => other.to_string(),
                };

                (status, message).into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
