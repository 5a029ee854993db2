use serde::Serialize;

use crate::{
    Error,
    auth::{AuthState, encode_token},
    user::{User, UserId},
};

/// The body returned after a successful sign-up or log-in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthResponse {
    pub message: String,
    /// The bearer token to send in the `Authorization` header.
    pub token: String,
    pub user: UserInfo,
}

/// The user fields the client needs straight after logging in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub is_onboarded: bool,
}

impl AuthResponse {
    /// Issue a token for `user` and wrap it in a response with `message`.
    pub fn issue(message: &str, user: &User, state: &AuthState) -> Result<Self, Error> {
        let token = encode_token(user.id, &user.email, state.token_duration, &state.jwt_keys)?;

        Ok(Self {
            message: message.to_owned(),
            token,
            user: UserInfo {
                id: user.id,
                email: user.email.clone(),
                name: user.name.clone(),
                is_onboarded: user.is_onboarded,
            },
        })
    }
}
