//! Signing in with a Google account.
//!
//! The client obtains an ID token from Google and posts it here. The token is
//! checked against Google's published signing keys before the user is looked
//! up or created.

use async_trait::async_trait;
use axum::{Json, extract::State};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header, jwk::JwkSet};
use serde::Deserialize;

use crate::{
    Error,
    auth::{AuthResponse, AuthState},
    extract::ApiJson,
    user::{AuthProvider, Email, NewUser, create_user, get_user_by_email, save_user},
};

/// Where Google publishes the keys that sign its ID tokens.
pub const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// The identity asserted by a verified Google ID token.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GoogleProfile {
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Checks a Google ID token and extracts the user's profile from it.
#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    /// Verify `id_token` and return the profile it asserts.
    ///
    /// # Errors
    /// Returns [Error::InvalidGoogleToken] if the token cannot be verified.
    async fn verify(&self, id_token: &str) -> Result<GoogleProfile, Error>;
}

/// Verifies ID tokens against Google's JSON Web Key Set.
#[derive(Debug, Clone)]
pub struct GoogleIdTokenVerifier {
    client_id: String,
    certs_url: String,
    http_client: reqwest::Client,
}

impl GoogleIdTokenVerifier {
    /// Create a verifier that only accepts tokens issued for `client_id`.
    pub fn new(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_owned(),
            certs_url: GOOGLE_CERTS_URL.to_owned(),
            http_client: reqwest::Client::new(),
        }
    }

    async fn fetch_key_set(&self) -> Result<JwkSet, Error> {
        self.http_client
            .get(&self.certs_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| {
                tracing::error!("could not fetch Google signing keys: {error}");
                Error::InvalidGoogleToken
            })?
            .json::<JwkSet>()
            .await
            .map_err(|error| {
                tracing::error!("could not parse Google signing keys: {error}");
                Error::InvalidGoogleToken
            })
    }
}

#[async_trait]
impl IdTokenVerifier for GoogleIdTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleProfile, Error> {
        let header = decode_header(id_token).map_err(|error| {
            tracing::warn!("malformed Google ID token: {error}");
            Error::InvalidGoogleToken
        })?;
        let key_id = header.kid.ok_or(Error::InvalidGoogleToken)?;

        let key_set = self.fetch_key_set().await?;
        let jwk = key_set.find(&key_id).ok_or_else(|| {
            tracing::warn!("Google ID token signed with unknown key {key_id}");
            Error::InvalidGoogleToken
        })?;
        let decoding_key = DecodingKey::from_jwk(jwk).map_err(|error| {
            tracing::error!("could not use Google signing key {key_id}: {error}");
            Error::InvalidGoogleToken
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.client_id]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        decode::<GoogleProfile>(id_token, &decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|error| {
                tracing::warn!("rejected Google ID token: {error}");
                Error::InvalidGoogleToken
            })
    }
}

/// The body of a Google sign-in request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSignInRequest {
    pub id_token: Option<String>,
}

/// A route handler for signing in with a Google ID token.
///
/// A user is created the first time an email is seen. Returning users have
/// their profile picture refreshed.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingIdToken] if the request has no ID token,
/// - [Error::GoogleSignInDisabled] if no Google client ID is configured,
/// - [Error::InvalidGoogleToken] if the token could not be verified.
pub async fn sign_in_with_google(
    State(state): State<AuthState>,
    ApiJson(request): ApiJson<GoogleSignInRequest>,
) -> Result<Json<AuthResponse>, Error> {
    let id_token = match request.id_token.as_deref() {
        Some(token) if !token.is_empty() => token,
        _ => return Err(Error::MissingIdToken),
    };

    let verifier = state
        .id_token_verifier
        .as_ref()
        .ok_or(Error::GoogleSignInDisabled)?;

    let profile = verifier.verify(id_token).await?;
    let email = Email::new(&profile.email).map_err(|_| Error::InvalidGoogleToken)?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        match get_user_by_email(&email, &connection)? {
            Some(mut user) => {
                if profile.picture.is_some() {
                    user.profile_picture = profile.picture;
                }

                save_user(&user, &connection)?
            }
            None => {
                let name = profile
                    .name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| email_local_part(&email));

                let user = create_user(
                    NewUser {
                        email,
                        password_hash: None,
                        name,
                        profile_picture: profile.picture,
                        auth_provider: AuthProvider::Google,
                    },
                    &connection,
                )?;
                tracing::info!("Registered user {} through Google", user.id);

                user
            }
        }
    };

    AuthResponse::issue("Google auth successful!", &user, &state).map(Json)
}

fn email_local_part(email: &Email) -> String {
    email
        .as_str()
        .split_once('@')
        .map_or_else(|| email.to_string(), |(local, _)| local.to_owned())
}
