// src/server/cancel.rs

//! Per-request cancellation signal.
//!
//! Every matched request gets a fresh [`CancellationToken`] stored as a
//! request extension. It fires when either
//! - the configured request timeout elapses, or
//! - the request future is dropped (the client disconnected).
//!
//! The handler threads this token through the execution gate and the process
//! runner so abandoned requests neither hold the gate nor leave processes
//! behind.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Request extension carrying the cancellation token.
#[derive(Debug, Clone)]
pub struct RequestCancel(pub CancellationToken);

/// Axum middleware installing a [`RequestCancel`] extension.
///
/// Use with [`axum::middleware::from_fn_with_state`], passing the request
/// timeout as state.
pub async fn request_cancellation(
    State(timeout): State<Duration>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = CancellationToken::new();
    req.extensions_mut().insert(RequestCancel(token.clone()));

    // Fires on every exit path, including the future being dropped
    // mid-flight. Firing after a normal completion is harmless and also
    // stops the timer below.
    let _guard = token.clone().drop_guard();

    let timer_token = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(timeout) => {
                debug!(timeout_ms = timeout.as_millis() as u64, "request deadline reached");
                timer_token.cancel();
            }
            _ = timer_token.cancelled() => {}
        }
    });

    next.run(req).await
}
