#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use cmdserver::config::{AppConfig, CommandSpec, ServerConfig};
use cmdserver::exec::{CommandRunner, ProcessRunner};
use cmdserver::server::{AppState, build_app};

/// Builder for `AppConfig` to simplify test setup.
pub struct AppConfigBuilder {
    server: ServerConfig,
    command: Vec<String>,
}

impl AppConfigBuilder {
    /// Start from defaults with the given command line.
    pub fn new(command: &[&str]) -> Self {
        Self {
            server: ServerConfig {
                addr: "127.0.0.1:0".to_string(),
                ..ServerConfig::default()
            },
            command: command.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Shorthand for `sh -c <script>`.
    pub fn shell(script: &str) -> Self {
        Self::new(&["sh", "-c", script])
    }

    pub fn reload(mut self, secs: u32) -> Self {
        self.server.reload = secs;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.server.request_timeout = timeout;
        self
    }

    pub fn addr(mut self, addr: &str) -> Self {
        self.server.addr = addr.to_string();
        self
    }

    pub fn build(self) -> AppConfig {
        AppConfig {
            server: self.server,
            command: CommandSpec::new(self.command)
                .expect("Failed to build valid command from builder"),
        }
    }
}

/// Shared state wired to a real [`ProcessRunner`].
pub fn process_state(config: &AppConfig) -> Arc<AppState> {
    Arc::new(AppState::new(config, Arc::new(ProcessRunner)))
}

/// Shared state wired to an arbitrary runner.
pub fn state_with_runner(config: &AppConfig, runner: Arc<dyn CommandRunner>) -> Arc<AppState> {
    Arc::new(AppState::new(config, runner))
}

/// Router over a state built by one of the helpers above.
pub fn app(state: &Arc<AppState>) -> axum::Router {
    build_app(Arc::clone(state))
}
