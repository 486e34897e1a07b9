// src/server/handler.rs

//! `GET /`: run the command once and answer with what it printed.
//!
//! Per request:
//! 1. wait for the execution gate (or answer 503 if the request is cancelled
//!    first, including when it was already cancelled as the slot came free),
//! 2. run the command bound to the request's cancellation token,
//! 3. map the outcome to 200 / 500,
//! 4. release the gate. The permit is a guard, so this also happens if
//!    anything above unwinds.

use std::sync::Arc;

use axum::{
    Extension,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::exec::ExecutionOutcome;
use crate::server::AppState;
use crate::server::cancel::RequestCancel;
use crate::server::sniff::{TEXT_PLAIN, content_type_for};

/// `Refresh` is not in the registered header set but every browser honours it.
pub const REFRESH: HeaderName = HeaderName::from_static("refresh");

/// Value of the `Cache-Control` header on every admitted request.
pub const NO_STORE: &str = "no-store";

/// Axum handler for `GET /`.
pub async fn serve_command(
    State(state): State<Arc<AppState>>,
    Extension(RequestCancel(cancel)): Extension<RequestCancel>,
) -> Response {
    handle_request(&state, &cancel).await
}

/// Core of the handler, independent of axum extractors.
pub async fn handle_request(state: &AppState, cancel: &CancellationToken) -> Response {
    let permit = match state.gate.acquire(cancel).await {
        Ok(permit) => permit,
        Err(err) => {
            warn!(error = %err, "request abandoned before the command slot was free");
            return service_unavailable();
        }
    };

    // A free slot is granted even to an already-cancelled request; such a
    // request must not start the command.
    if cancel.is_cancelled() {
        warn!("request cancelled before admission; not running the command");
        permit.release();
        return service_unavailable();
    }

    let headers = admitted_headers(state.reload);
    let outcome = state.runner.run(&state.command, cancel).await;
    let response = outcome_response(outcome, headers);

    permit.release();
    response
}

/// Headers set once a request holds the gate.
fn admitted_headers(reload: u32) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if reload > 0 {
        headers.insert(REFRESH, HeaderValue::from(reload));
    }
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    headers
}

fn outcome_response(outcome: ExecutionOutcome, mut headers: HeaderMap) -> Response {
    let ExecutionOutcome { output, error } = outcome;

    let (status, body, content_type) = match error {
        None => (StatusCode::OK, output, None),
        Some(err) if output.is_empty() => {
            debug!(error = %err, "command failed without output; returning error text");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                err.to_string().into_bytes(),
                Some(TEXT_PLAIN),
            )
        }
        Some(err) => {
            debug!(error = %err, bytes = output.len(), "command failed; returning its output");
            (StatusCode::INTERNAL_SERVER_ERROR, output, None)
        }
    };

    let content_type = content_type.unwrap_or_else(|| content_type_for(&body));
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    (status, headers, Body::from(body)).into_response()
}

fn service_unavailable() -> Response {
    let status = StatusCode::SERVICE_UNAVAILABLE;
    let text = status.canonical_reason().unwrap_or("Service Unavailable");
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN))],
        text,
    )
        .into_response()
}
