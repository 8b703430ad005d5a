//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many bytes are truncated in the `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Ok(body) = read_body(body).await else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    log_request(&parts, &body);

    let response = next.run(Request::from_parts(parts, Body::from(body))).await;

    let (parts, body) = response.into_parts();
    let Ok(body) = read_body(body).await else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    log_response(&parts, &body);

    Response::from_parts(parts, Body::from(body))
}

async fn read_body(body: Body) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .inspect_err(|error| tracing::error!("could not read body: {error}"))
}

/// The first [LOG_BODY_LENGTH_LIMIT] bytes of `body` as text, or `None` if
/// the body is short enough to log in full.
fn truncate_body(body: &str) -> Option<&str> {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return None;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    Some(&body[..end])
}

fn log_request(parts: &axum::http::request::Parts, body: &[u8]) {
    let body = String::from_utf8_lossy(body);

    match truncate_body(&body) {
        Some(truncated) => {
            tracing::info!(
                "Received request: {} {}\nbody: {truncated}...",
                parts.method,
                parts.uri
            );
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        ),
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &[u8]) {
    let body = String::from_utf8_lossy(body);

    match truncate_body(&body) {
        Some(truncated) => {
            tracing::info!(
                "Sending response: {} {:?}\nbody: {truncated}...",
                parts.status,
                parts.headers
            );
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!(
            "Sending response: {} {:?}\nbody: {body:?}",
            parts.status,
            parts.headers
        ),
    }
}
