#![allow(missing_docs)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, Error, build_router, endpoints,
    auth::{GoogleProfile, IdTokenVerifier},
    user::UserId,
};

/// A password that passes the strength check.
pub(crate) const TEST_PASSWORD: &str = "averysafeandsecurepassword";

/// Accepts any ID token except "invalid" and treats the token as the email address.
#[derive(Debug, Default)]
pub(crate) struct StubVerifier {
    picture: Mutex<Option<String>>,
}

impl StubVerifier {
    pub(crate) fn set_picture(&self, picture: &str) {
        *self.picture.lock().unwrap() = Some(picture.to_owned());
    }
}

#[async_trait]
impl IdTokenVerifier for StubVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleProfile, Error> {
        if id_token == "invalid" {
            return Err(Error::InvalidGoogleToken);
        }

        let picture = self
            .picture
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| format!("https://example.com/{id_token}.png"));

        Ok(GoogleProfile {
            email: id_token.to_owned(),
            name: Some("Bob Builder".to_owned()),
            picture: Some(picture),
        })
    }
}

pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");
    crate::db::initialize(&connection).expect("could not initialize test DB");

    connection
}

pub(crate) fn get_test_state() -> AppState {
    AppState::new(
        Connection::open_in_memory().expect("could not create in-memory SQLite database"),
        "42",
        "Etc/UTC",
        Some(Arc::new(StubVerifier::default())),
    )
    .expect("could not create test app state")
    .with_password_cost(4)
}

pub(crate) fn get_test_server() -> TestServer {
    TestServer::try_new(build_router(get_test_state())).expect("could not create test server")
}

/// Register a user named "Test User" through the API and return their token and ID.
pub(crate) async fn sign_up_test_user(server: &TestServer, email: &str) -> (String, UserId) {
    let response = server
        .post(endpoints::SIGN_UP)
        .json(&json!({
            "email": email,
            "name": "Test User",
            "password": TEST_PASSWORD,
        }))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    let token = body["token"]
        .as_str()
        .expect("sign up response should contain a token")
        .to_owned();
    let user_id = body["user"]["id"]
        .as_i64()
        .expect("sign up response should contain the user ID");

    (token, UserId::new(user_id))
}
