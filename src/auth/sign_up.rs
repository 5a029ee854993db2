//! Registering a new account with an email and password.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    Error,
    auth::{AuthResponse, AuthState},
    extract::ApiJson,
    password::PasswordHash,
    user::{AuthProvider, Email, NewUser, create_user, email_exists},
    validation::validate_not_blank,
};

/// The data for registering a new account.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// A route handler for registering a new user.
///
/// Responds with a bearer token so the client is logged in straight away.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidEmail] if the email is malformed,
/// - [Error::TooWeak] if the password is too easy to guess,
/// - [Error::DuplicateEmail] if the email is already registered,
/// - or an internal error if hashing or the database fails.
pub async fn sign_up(
    State(state): State<AuthState>,
    ApiJson(request): ApiJson<SignUpRequest>,
) -> Result<Json<AuthResponse>, Error> {
    let email = Email::new(&request.email)?;
    let name = validate_not_blank(&request.name, "name")?;
    let password_hash =
        PasswordHash::from_raw_password(&request.password, state.password_cost).await?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        if email_exists(&email, &connection)? {
            return Err(Error::DuplicateEmail);
        }

        create_user(
            NewUser {
                email,
                password_hash: Some(password_hash),
                name,
                profile_picture: None,
                auth_provider: AuthProvider::Local,
            },
            &connection,
        )?
    };

    tracing::info!("Registered user {}", user.id);

    AuthResponse::issue("User registered successfully!", &user, &state).map(Json)
}

#[cfg(test)]
mod sign_up_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::{TEST_PASSWORD, get_test_server},
    };

    #[tokio::test]
    async fn sign_up_returns_token_and_user() {
        let server = get_test_server();

        let response = server
            .post(endpoints::SIGN_UP)
            .json(&json!({
                "email": "Alice@Example.com",
                "name": "Alice",
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["message"], "User registered successfully!");
        assert!(body["token"].as_str().is_some_and(|token| !token.is_empty()));
        assert_eq!(body["user"]["email"], "alice@example.com");
        assert_eq!(body["user"]["name"], "Alice");
        assert_eq!(body["user"]["isOnboarded"], false);
    }

    #[tokio::test]
    async fn sign_up_fails_on_duplicate_email() {
        let server = get_test_server();
        let request = json!({
            "email": "alice@example.com",
            "name": "Alice",
            "password": TEST_PASSWORD,
        });
        server.post(endpoints::SIGN_UP).json(&request).await.assert_status_ok();

        let response = server.post(endpoints::SIGN_UP).json(&request).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "message": "Email is already registered!" }));
    }

    #[tokio::test]
    async fn sign_up_fails_on_weak_password() {
        let server = get_test_server();

        let response = server
            .post(endpoints::SIGN_UP)
            .json(&json!({
                "email": "alice@example.com",
                "name": "Alice",
                "password": "password",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sign_up_fails_on_invalid_email() {
        let server = get_test_server();

        let response = server
            .post(endpoints::SIGN_UP)
            .json(&json!({
                "email": "not-an-email",
                "name": "Alice",
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sign_up_fails_on_missing_field() {
        let server = get_test_server();

        let response = server
            .post(endpoints::SIGN_UP)
            .json(&json!({ "email": "alice@example.com" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
