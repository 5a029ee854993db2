//! Request extractors that reject bad input with the app's JSON error body.

use axum::extract::{
    FromRequest, FromRequestParts,
    rejection::{JsonRejection, PathRejection, QueryRejection},
};

use crate::Error;

/// Like [axum::Json], but a malformed body is rejected with [Error::Validation].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// Like [axum::extract::Query], but bad query strings are rejected with [Error::Validation].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

/// Like [axum::extract::Path], but bad path parameters are rejected with [Error::Validation].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::{Value, json};

    use crate::extract::ApiJson;

    #[derive(Deserialize)]
    struct Payload {
        amount: f64,
    }

    async fn echo(ApiJson(payload): ApiJson<Payload>) -> Json<Value> {
        Json(json!({ "amount": payload.amount }))
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_with_json_message() {
        let server = TestServer::try_new(Router::new().route("/echo", post(echo)))
            .expect("could not create test server");

        let response = server
            .post("/echo")
            .json(&json!({ "amount": "lots" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn well_formed_body_is_accepted() {
        let server = TestServer::try_new(Router::new().route("/echo", post(echo)))
            .expect("could not create test server");

        let response = server.post("/echo").json(&json!({ "amount": 1.5 })).await;

        response.assert_status_ok();
        response.assert_json(&json!({ "amount": 1.5 }));
    }
}
