//! Fintrack is a backend for tracking personal finances.
//!
//! Users sign up with an email and password (or with a Google account) and
//! then record their transactions, monthly budgets and savings goals. The
//! analytics endpoints summarise a user's own transactions over a period.
//!
//! This library provides a JSON REST API, see [build_router] for the routes.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod agent;
mod analytics;
mod app_state;
mod auth;
mod budget;
mod country;
mod database_id;
mod db;
mod endpoints;
mod extract;
mod goal;
mod logging;
mod password;
mod routing;
mod timezone;
mod transaction;
mod user;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{GoogleIdTokenVerifier, GoogleProfile, IdTokenVerifier};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use user::UserId;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email is not registered, the account has no password, or the
    /// password did not match.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The bearer token is missing, malformed, expired or has a bad signature.
    #[error("Missing or invalid authorization token")]
    InvalidToken,

    /// Signing a new token failed.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// The Google ID token could not be verified.
    #[error("Invalid Google token")]
    InvalidGoogleToken,

    /// The Google sign-in request did not include an ID token.
    #[error("ID token is required")]
    MissingIdToken,

    /// The server was started without a Google client ID.
    #[error("Google sign-in is not configured on this server")]
    GoogleSignInDisabled,

    /// The string is not a valid email address.
    #[error("{0} is not a valid email address")]
    InvalidEmail(String),

    /// An account with the email address already exists.
    #[error("Email is already registered!")]
    DuplicateEmail,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The old password given when changing passwords did not match.
    #[error("Current password is incorrect")]
    IncorrectPassword,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The request body or query failed validation, e.g. a negative amount.
    #[error("{0}")]
    Validation(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The user referenced by a token no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// No transaction has the requested ID.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// No budget has the requested ID.
    #[error("Budget not found")]
    BudgetNotFound,

    /// No goal has the requested ID.
    #[error("Goal not found")]
    GoalNotFound,

    /// The record exists but belongs to another user.
    #[error("You do not have permission to access this resource")]
    NotOwner,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref desc),
            ) if desc.ends_with("user.email") => Error::DuplicateEmail,
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::InvalidToken | Error::InvalidGoogleToken => {
                StatusCode::UNAUTHORIZED
            }
            Error::NotOwner => StatusCode::FORBIDDEN,
            Error::NotFound
            | Error::UserNotFound
            | Error::TransactionNotFound
            | Error::BudgetNotFound
            | Error::GoalNotFound => StatusCode::NOT_FOUND,
            Error::MissingIdToken
            | Error::InvalidEmail(_)
            | Error::DuplicateEmail
            | Error::TooWeak(_)
            | Error::IncorrectPassword
            | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::GoogleSignInDisabled => StatusCode::SERVICE_UNAVAILABLE,
            Error::TokenCreation(_)
            | Error::HashingError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::JSONSerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal details are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
