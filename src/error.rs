//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the service.
//! Every failure a request can hit ends up as one of its variants: malformed or duplicate
//! input, a credential mismatch at sign-in, a rejected session token, an entity that is
//! absent or owned by somebody else, or a storage failure.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return it
//! directly. Client-facing variants carry a safe message; storage and internal failures
//! are logged with their detail and answered with a generic body.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::token::TokenError;

/// Message returned for every rejected sign-in, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Malformed or duplicate input the caller can correct (HTTP 400).
    Validation(String),
    /// Username/password mismatch at sign-in (HTTP 401).
    /// Carries no detail so an unknown user and a wrong password look the same.
    Auth,
    /// Missing, malformed, forged or expired session token (HTTP 401).
    /// The variant is kept for logging only and never reaches the response body.
    Token(TokenError),
    /// The entity does not exist or is not owned by the acting user (HTTP 404).
    /// Both cases are deliberately reported identically.
    NotFound(String),
    /// The underlying store failed (HTTP 500).
    Storage(String),
    /// Any other unexpected server-side failure (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Auth => write!(f, "Auth Error: {}", INVALID_CREDENTIALS),
            AppError::Token(kind) => write!(f, "Token Error: {}", kind),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth | AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Validation(msg) | AppError::NotFound(msg) => msg.as_str(),
            AppError::Auth => INVALID_CREDENTIALS,
            AppError::Token(_) => "unauthorized",
            AppError::Storage(detail) | AppError::Internal(detail) => {
                log::error!("{}: {}", self.status_code(), detail);
                "internal server error"
            }
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`, unique-constraint violations become `Validation`
/// and everything else is a `Storage` failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".into()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Validation("record already exists".into())
            }
            _ => AppError::Storage(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::Storage(error.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        AppError::Token(error)
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::Internal`.
///
/// This handles errors during password hashing or verification.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("password hashing failed: {}", error))
    }
}

/// A blocking hash task that panicked or was cancelled.
impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> AppError {
        AppError::Internal(format!("blocking task failed: {}", error))
    }
}
