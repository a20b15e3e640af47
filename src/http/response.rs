//! HTTP response building module
//!
//! JSON response builders shared by the book API and the probe endpoints.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{header, Response, StatusCode};
use serde::Serialize;

use crate::logger;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Serialize `body` as a JSON response with the given status
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => build_json(status, Bytes::from(json)),
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            build_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                Bytes::from_static(br#"{"message":"failed to serialize response"}"#),
            )
        }
    }
}

/// `{"message": ...}` body used for every failure
pub fn message_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &serde_json::json!({ "message": message }))
}

/// 405 with the methods the path does accept
pub fn method_not_allowed(allow: &str) -> Response<Full<Bytes>> {
    let mut response = message_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
    if let Ok(value) = header::HeaderValue::from_str(allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}

/// Probe response, `{"status": ...}`
pub fn health_response(status: StatusCode, state: &str) -> Response<Full<Bytes>> {
    json_response(status, &serde_json::json!({ "status": state }))
}

fn build_json(status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build {status} response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}
