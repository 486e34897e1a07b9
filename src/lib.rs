// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod gate;
pub mod logging;
pub mod server;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::AppConfig;
use crate::errors::{CmdServerError, Result};
use crate::exec::{CommandRunner, ProcessRunner};
use crate::server::{AppState, build_app};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config validation (fatal on a missing command)
/// - the execution gate + process runner behind `GET /`
/// - the listener (fatal on bind failure)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config = AppConfig::try_from(args)?;
    run_with_runner(config, Arc::new(ProcessRunner)).await
}

/// Like [`run`], but with an already validated config and a caller-chosen
/// runner.
pub async fn run_with_runner(config: AppConfig, runner: Arc<dyn CommandRunner>) -> Result<()> {
    let addr = config.server.addr.clone();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| CmdServerError::BindError {
            addr: addr.clone(),
            source,
        })?;

    let local = listener.local_addr()?;
    info!(
        addr = %local,
        cmd = %config.command,
        reload = config.server.reload,
        timeout_secs = config.server.request_timeout.as_secs(),
        "cmdserver listening"
    );

    let state = Arc::new(AppState::new(&config, runner));
    server::serve(
        listener,
        build_app(state),
        config.server.read_timeout,
        shutdown_signal(),
    )
    .await?;

    debug!("server shut down");
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the server just
/// keeps running.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
