//! Book API module
//!
//! Entry point for HTTP request processing: route matching, body decoding,
//! dispatch to the book handlers and access logging.

mod error;
mod handlers;
mod routes;
mod types;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{header, Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::http::{self as http_util, FormValues};
use crate::logger::{self, AccessLogEntry};

use error::{ApiError, ApiResult};
use routes::{match_route, Route, RouteMatch};

pub use routes::BASE_PATH;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let mut entry = access_entry(&req, remote_addr);

    let mut response = dispatch(req, &state).await;

    if let Ok(server) = header::HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(header::SERVER, server);
    }

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn access_entry<B>(req: &Request<B>, remote_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    entry
}

/// Route the request and turn any handler failure into its single error response
async fn dispatch<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    // Probe endpoints sit outside the API base path
    let health = &state.config.health;
    if health.enabled && method == Method::GET {
        if path == health.liveness_path {
            return http_util::health_response(StatusCode::OK, "ok");
        }
        if path == health.readiness_path {
            return handlers::readiness(state).await;
        }
    }

    let result = match match_route(&method, &path) {
        RouteMatch::Found(route) => serve(route, req, state).await,
        RouteMatch::MethodNotAllowed(allow) => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            return http_util::method_not_allowed(allow);
        }
        RouteMatch::NotFound => Err(ApiError::NotFound(format!("no route for {method} {path}"))),
    };

    result.unwrap_or_else(|err| {
        logger::log_request_failure(
            method.as_str(),
            &path,
            err.status().as_u16(),
            &err.to_string(),
        );
        err.into_response()
    })
}

async fn serve<B>(route: Route<'_>, req: Request<B>, state: &AppState) -> ApiResult<Response<Full<Bytes>>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    match route {
        Route::CreateBook => {
            let form = read_form(req, state.config.http.max_body_size).await?;
            handlers::create_book(state, &form).await
        }
        Route::ListBooks => handlers::list_books(state).await,
        Route::UpdateBook => {
            let form = read_form(req, state.config.http.max_body_size).await?;
            handlers::update_book(state, &form).await
        }
        Route::GetBook { id } => handlers::get_book(state, id).await,
        Route::DeleteBook { id } => handlers::delete_book(state, id).await,
    }
}

/// Read the body (bounded by `max_body_size`) and merge it with the query string
async fn read_form<B>(req: Request<B>, max_body_size: u64) -> ApiResult<FormValues>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if declared.is_some_and(|size| size > max_body_size) {
        return Err(ApiError::PayloadTooLarge(max_body_size));
    }

    let (parts, body) = req.into_parts();
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = Limited::new(body, limit)
        .collect()
        .await
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                ApiError::PayloadTooLarge(max_body_size)
            } else {
                ApiError::InvalidArgument(format!("failed to read request body: {e}"))
            }
        })?
        .to_bytes();

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    FormValues::decode(content_type, bytes, parts.uri.query())
        .await
        .map_err(|e| ApiError::InvalidArgument(format!("malformed form body: {e}")))
}
