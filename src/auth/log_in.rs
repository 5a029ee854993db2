//! Logging in with an email and password.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    Error,
    auth::{AuthResponse, AuthState},
    extract::ApiJson,
    user::{Email, get_user_by_email},
};

/// The credentials entered when logging in.
#[derive(Debug, Deserialize)]
pub struct LogInRequest {
    pub email: String,
    pub password: String,
}

/// A route handler for logging in a user.
///
/// # Errors
/// Returns [Error::InvalidCredentials] if the email is not registered, if the
/// account has no password (Google-only accounts), or if the password is wrong.
pub async fn log_in(
    State(state): State<AuthState>,
    ApiJson(request): ApiJson<LogInRequest>,
) -> Result<Json<AuthResponse>, Error> {
    let email = Email::new(&request.email).map_err(|_| Error::InvalidCredentials)?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        get_user_by_email(&email, &connection)?
    }
    .ok_or(Error::InvalidCredentials)?;

    let password_hash = user
        .password_hash
        .as_ref()
        .ok_or(Error::InvalidCredentials)?;

    if !password_hash.verify(&request.password).await? {
        return Err(Error::InvalidCredentials);
    }

    AuthResponse::issue("Login successful!", &user, &state).map(Json)
}
