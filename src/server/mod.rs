// src/server/mod.rs

//! HTTP surface: router construction, shared state and the serve loop.
//!
//! - [`handler`] runs the command for `GET /`.
//! - [`cancel`] attaches the per-request cancellation token.
//! - [`sniff`] picks a `Content-Type` for command output.
//!
//! Layers, innermost first: cancellation (matched routes only), response
//! compression negotiated via `Accept-Encoding`, request logging.

pub mod cancel;
pub mod handler;
pub mod sniff;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto::Builder;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, CommandSpec};
use crate::errors::Result;
use crate::exec::CommandRunner;
use crate::gate::ExecutionGate;

pub use handler::{handle_request, serve_command};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Process-wide state shared by all requests. Read-only apart from the gate.
pub struct AppState {
    pub command: CommandSpec,
    pub reload: u32,
    pub request_timeout: Duration,
    pub gate: ExecutionGate,
    pub runner: Arc<dyn CommandRunner>,
}

impl AppState {
    pub fn new(config: &AppConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            command: config.command.clone(),
            reload: config.server.reload,
            request_timeout: config.server.request_timeout,
            gate: ExecutionGate::new(),
            runner,
        }
    }
}

/// Build the router: a single `GET /` route plus the middleware stack.
pub fn build_app(state: Arc<AppState>) -> Router {
    let timeout = state.request_timeout;

    Router::new()
        .route("/", get(serve_command))
        .route_layer(middleware::from_fn_with_state(
            timeout,
            cancel::request_cancellation,
        ))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Serve `app` on an already-bound listener until `shutdown` resolves.
///
/// Connections are driven by hyper-util directly rather than `axum::serve`,
/// which has no header read timeout. A client that has not sent a complete
/// request head within `read_timeout` is disconnected. After `shutdown`,
/// no new connections are accepted and open ones are drained.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    read_timeout: Duration,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    // HTTP/1 only: protocol sniffing would wait on silent clients before
    // the header timer starts.
    let mut builder = Builder::new(TokioExecutor::new()).http1_only();
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(read_timeout);

    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    // Usually fd exhaustion; back off instead of spinning.
                    warn!(error = %e, "failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            },
            () = &mut shutdown => break,
        };

        let service = TowerToHyperService::new(app.clone());
        let conn = builder
            .serve_connection(TokioIo::new(stream), service)
            .into_owned();
        let conn = graceful.watch(conn);

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!(%peer, error = %e, "connection closed with error");
            }
        });
    }

    debug!("listener closed; draining open connections");
    graceful.shutdown().await;
    Ok(())
}

/// Logs method, path, status code and duration for each request.
async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    let resp = next.run(req).await;

    info!(
        http.method = %method,
        http.path = %path,
        http.status = resp.status().as_u16(),
        http.duration_ms = start.elapsed().as_millis() as u64,
        "request completed"
    );

    resp
}
