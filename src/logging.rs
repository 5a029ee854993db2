//! Middleware for logging requests and responses.

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{
        HeaderMap, HeaderName, HeaderValue, StatusCode,
        header::{AUTHORIZATION, COOKIE, SET_COOKIE},
        request, response,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::Error;

/// Bodies longer than this many characters are truncated at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// JSON fields whose values are never written to the logs.
const REDACTED_FIELDS: [&str; 5] = ["password", "oldPassword", "newPassword", "idToken", "token"];

/// Headers whose values are never written to the logs.
const REDACTED_HEADERS: [HeaderName; 3] = [AUTHORIZATION, COOKIE, SET_COOKIE];

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Passwords and tokens in JSON bodies and credential headers are replaced
/// with asterisks.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_text) = match read_body_text(request.into_parts()).await {
        Ok(request) => request,
        Err(error) => {
            tracing::warn!("could not read request body: {error}");
            return Error::Validation("could not read request body".to_owned()).into_response();
        }
    };
    log_request(&parts, &redact_json(&body_text));

    let request = Request::from_parts(parts, Body::from(body_text));
    let response = next.run(request).await;

    let (parts, body_text) = match read_body_text(response.into_parts()).await {
        Ok(response) => response,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &redact_json(&body_text));

    Response::from_parts(parts, Body::from(body_text))
}

async fn read_body_text<P>((parts, body): (P, Body)) -> Result<(P, String), axum::Error> {
    let body_bytes = to_bytes(body, usize::MAX).await?;

    Ok((parts, String::from_utf8_lossy(&body_bytes).to_string()))
}

/// Replace the values of sensitive fields in a JSON body.
///
/// Bodies that are not JSON are returned unchanged.
fn redact_json(body: &str) -> String {
    let Ok(mut value) = serde_json::from_str::<Value>(body) else {
        return body.to_owned();
    };

    redact_value(&mut value);
    value.to_string()
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *field = Value::String(REDACTED.to_owned());
                } else {
                    redact_value(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {}
    }
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    for name in REDACTED_HEADERS {
        if headers.contains_key(&name) {
            headers.insert(name, HeaderValue::from_static(REDACTED));
        }
    }

    headers
}

fn describe_request(parts: &request::Parts) -> String {
    format!(
        "{} {} {:?}\nheaders: {:#?}",
        parts.method,
        parts.uri,
        parts.version,
        redact_headers(&parts.headers)
    )
}

fn describe_response(parts: &response::Parts) -> String {
    format!(
        "{} {:?}\nheaders: {:#?}",
        parts.status,
        parts.version,
        redact_headers(&parts.headers)
    )
}

fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| &body[..end])
}

fn log_request(parts: &request::Parts, body: &str) {
    let request = describe_request(parts);

    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Received request: {request}\nbody: {truncated}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {request}\nbody: {body:?}"),
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    let response = describe_response(parts);

    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Sending response: {response}\nbody: {truncated}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {response}\nbody: {body:?}"),
    }
}
