// src/config/model.rs

use std::fmt;
use std::time::Duration;

/// The command executed on every request: program name plus arguments.
///
/// Construct through [`CommandSpec::new`], which guarantees a non-empty
/// program name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    /// Create a spec without checking the program name.
    ///
    /// Callers are expected to have validated the input already (see
    /// `validate.rs`).
    pub(crate) fn new_unchecked(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Listener and response settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address handed to the TCP listener, e.g. `localhost:8080`.
    pub addr: String,

    /// Seconds after which browsers should reload the page.
    ///
    /// `0` means no `Refresh` header is sent.
    pub reload: u32,

    /// Deadline for a single request. When it elapses the request's
    /// cancellation signal fires.
    pub request_timeout: Duration,

    /// How long a connection may take to send a complete request head.
    pub read_timeout: Duration,
}

impl ServerConfig {
    pub const DEFAULT_ADDR: &'static str = "localhost:8080";
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: Self::DEFAULT_ADDR.to_string(),
            reload: 0,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Fully validated startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub command: CommandSpec,
}
