use std::io::{Cursor, Read};
use std::time::Instant;

use serde_json::Value;
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::{error, info, warn};

use crate::errors::{into_reply, ApiError, RequestError};
use crate::handlers;
use crate::state::{ServiceContext, SharedContext};

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub fn json_response(status: u16, body: &Value) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.to_string().into_bytes();
    let len = bytes.len();
    Response::new(
        StatusCode(status),
        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
            .into_iter()
            .collect(),
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

fn content_type(request: &Request) -> String {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default()
}

/// Reads at most `limit` bytes of body, rejecting anything larger without
/// buffering it.
fn read_limited<R: Read>(
    reader: R,
    declared: Option<usize>,
    limit: usize,
) -> Result<Vec<u8>, ApiError> {
    if declared.is_some_and(|len| len > limit) {
        return Err(ApiError::PayloadTooLarge { limit });
    }
    let mut body = Vec::new();
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut body)
        .map_err(RequestError::Body)?;
    if body.len() > limit {
        return Err(ApiError::PayloadTooLarge { limit });
    }
    Ok(body)
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Health,
    Predict,
    PredictBase64,
}

fn route(method: &Method, path: &str) -> Result<Route, ApiError> {
    match (method, path) {
        (Method::Get, "/health") => Ok(Route::Health),
        (Method::Post, "/predict") => Ok(Route::Predict),
        (Method::Post, "/predict-base64") => Ok(Route::PredictBase64),
        _ => Err(ApiError::NotFound),
    }
}

/// Runs the handler for `route`. Prediction bodies are read through the size
/// limit before the handler sees them.
fn handle<R: Read>(
    route: Route,
    ctx: &ServiceContext,
    content_type: &str,
    body: R,
    declared: Option<usize>,
) -> Result<Value, ApiError> {
    match route {
        Route::Health => Ok(handlers::health::handle(ctx)),
        Route::Predict => {
            let body = read_limited(body, declared, ctx.max_body_bytes())?;
            handlers::predict::handle(ctx, content_type, &body)
        }
        Route::PredictBase64 => {
            let body = read_limited(body, declared, ctx.max_body_bytes())?;
            handlers::predict_base64::handle(ctx, &body)
        }
    }
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Routes one request, converts the outcome to JSON and responds.
///
/// Every failure is turned into a structured response here; nothing a client
/// sends can take the worker thread down.
pub fn dispatch(mut request: Request, ctx: SharedContext) {
    let started = Instant::now();
    let method  = request.method().clone();
    let url     = request.url().to_owned();
    let path    = url.split('?').next().unwrap_or("").to_owned();

    let outcome = route(&method, &path).and_then(|route| {
        let content_type = content_type(&request);
        let declared = request.body_length();
        handle(route, &ctx, &content_type, request.as_reader(), declared)
    });

    if let Err(err) = &outcome {
        if err.status() >= 500 {
            error!(
                method = %method,
                path = %path,
                error = %err,
                cause = ?std::error::Error::source(err),
                "request failed"
            );
        } else {
            warn!(method = %method, path = %path, error = %err, "request rejected");
        }
    }

    let (status, body) = into_reply(outcome);
    info!(
        method = %method,
        path = %path,
        status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );

    if let Err(e) = request.respond(json_response(status, &body)) {
        warn!(error = %e, "failed to write response");
    }
}
