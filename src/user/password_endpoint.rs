//! Changing or setting the password of a logged-in user.

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    Error,
    extract::ApiJson,
    password::PasswordHash,
    user::{UserId, UserState, get_user_by_id, set_user_password},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Ignored for accounts that have never set a password.
    pub old_password: Option<String>,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub password: String,
}

/// A route handler for changing the password.
///
/// # Errors
/// This function will return a:
/// - [Error::IncorrectPassword] if the account has a password and `oldPassword` does not match it,
/// - [Error::TooWeak] if the new password is too easy to guess.
pub async fn change_password(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserId>,
    ApiJson(request): ApiJson<ChangePasswordRequest>,
) -> Result<Json<Value>, Error> {
    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        get_user_by_id(user_id, &connection)?
    };

    if let Some(current_hash) = &user.password_hash {
        let old_password = request.old_password.as_deref().unwrap_or_default();

        if !current_hash.verify(old_password).await? {
            return Err(Error::IncorrectPassword);
        }
    }

    let password_hash =
        PasswordHash::from_raw_password(&request.new_password, state.password_cost).await?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;
    set_user_password(user_id, &password_hash, &connection)?;

    Ok(Json(json!({ "message": "Password changed successfully!" })))
}

/// A route handler for setting a password without checking the old one.
///
/// Lets users who signed up with Google log in with an email and password too.
pub async fn set_password(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserId>,
    ApiJson(request): ApiJson<SetPasswordRequest>,
) -> Result<Json<Value>, Error> {
    let password_hash =
        PasswordHash::from_raw_password(&request.password, state.password_cost).await?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;
    set_user_password(user_id, &password_hash, &connection)?;

    Ok(Json(json!({ "message": "Password set successfully!" })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::{TEST_PASSWORD, get_test_server, sign_up_test_user},
    };

    const NEW_PASSWORD: &str = "correcthorsebatterystaple";

    #[tokio::test]
    async fn change_password_then_log_in_with_new_password() {
        let server = get_test_server();
        let (token, _) = sign_up_test_user(&server, "alice@example.com").await;

        let response = server
            .put(endpoints::PROFILE_PASSWORD)
            .authorization_bearer(&token)
            .json(&json!({ "oldPassword": TEST_PASSWORD, "newPassword": NEW_PASSWORD }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Password changed successfully!" }));
        server
            .post(endpoints::LOG_IN)
            .json(&json!({ "email": "alice@example.com", "password": NEW_PASSWORD }))
            .await
            .assert_status_ok();
        server
            .post(endpoints::LOG_IN)
            .json(&json!({ "email": "alice@example.com", "password": TEST_PASSWORD }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn change_password_rejects_wrong_old_password() {
        let server = get_test_server();
        let (token, _) = sign_up_test_user(&server, "alice@example.com").await;

        let response = server
            .put(endpoints::PROFILE_PASSWORD)
            .authorization_bearer(&token)
            .json(&json!({ "oldPassword": "notmypassword", "newPassword": NEW_PASSWORD }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "message": "Current password is incorrect" }));
    }

    #[tokio::test]
    async fn change_password_rejects_weak_new_password() {
        let server = get_test_server();
        let (token, _) = sign_up_test_user(&server, "alice@example.com").await;

        server
            .put(endpoints::PROFILE_PASSWORD)
            .authorization_bearer(&token)
            .json(&json!({ "oldPassword": TEST_PASSWORD, "newPassword": "abc" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn google_user_can_set_password_and_log_in() {
        let server = get_test_server();
        let body = server
            .post(endpoints::GOOGLE_SIGN_IN)
            .json(&json!({ "idToken": "bob@example.com" }))
            .await
            .json::<Value>();
        let token = body["token"].as_str().unwrap();

        let response = server
            .post(endpoints::SET_PASSWORD)
            .authorization_bearer(token)
            .json(&json!({ "password": NEW_PASSWORD }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Password set successfully!" }));
        server
            .post(endpoints::LOG_IN)
            .json(&json!({ "email": "bob@example.com", "password": NEW_PASSWORD }))
            .await
            .assert_status_ok();
        let profile = server
            .get(endpoints::PROFILE)
            .authorization_bearer(token)
            .await
            .json::<Value>();
        assert_eq!(profile["data"]["hasSetPassword"], true);
    }

    #[tokio::test]
    async fn change_password_skips_old_password_check_when_none_set() {
        let server = get_test_server();
        let body = server
            .post(endpoints::GOOGLE_SIGN_IN)
            .json(&json!({ "idToken": "bob@example.com" }))
            .await
            .json::<Value>();
        let token = body["token"].as_str().unwrap();

        server
            .put(endpoints::PROFILE_PASSWORD)
            .authorization_bearer(token)
            .json(&json!({ "newPassword": NEW_PASSWORD }))
            .await
            .assert_status_ok();
    }
}
