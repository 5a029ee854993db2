//! Authentication middleware that checks bearer tokens on protected routes.

use std::sync::{Arc, Mutex};

use axum::{
    RequestPartsExt,
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use rusqlite::Connection;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{IdTokenVerifier, JwtKeys, decode_token},
    user::{UserId, user_exists},
};

/// The state needed for the auth middleware and the sign-up and log-in endpoints.
#[derive(Clone)]
pub struct AuthState {
    /// The database connection for looking up and registering users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The keys for signing and verifying bearer tokens.
    pub jwt_keys: Arc<JwtKeys>,
    /// How long newly issued tokens are valid for.
    pub token_duration: Duration,
    /// The bcrypt cost for hashing new passwords.
    pub password_cost: u32,
    /// Checks Google ID tokens, `None` if Google sign-in is disabled.
    pub id_token_verifier: Option<Arc<dyn IdTokenVerifier>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            jwt_keys: state.jwt_keys.clone(),
            token_duration: state.token_duration,
            password_cost: state.password_cost,
            id_token_verifier: state.id_token_verifier.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token in the `Authorization` header.
///
/// The user ID is placed into the request extensions and the request executed
/// normally if the token is valid and its user still exists, otherwise a 401
/// JSON error is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserId>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let bearer = match parts.extract::<TypedHeader<Authorization<Bearer>>>().await {
        Ok(TypedHeader(Authorization(bearer))) => bearer,
        Err(_) => return Error::InvalidToken.into_response(),
    };

    let user_id = match decode_token(bearer.token(), &state.jwt_keys)
        .and_then(|claims| claims.user_id())
    {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    if let Err(error) = check_user_exists(user_id, &state) {
        return error.into_response();
    }

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

/// A token for a deleted account is treated the same as a bad token.
fn check_user_exists(user_id: UserId, state: &AuthState) -> Result<(), Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    match user_exists(user_id, &connection)? {
        true => Ok(()),
        false => {
            tracing::debug!("rejected token for missing user {user_id}");
            Err(Error::InvalidToken)
        }
    }
}
