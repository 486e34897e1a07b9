// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Only startup problems end up here. Per-request failures are turned into
//! HTTP responses by the handler and never reach this type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmdServerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("failed to bind {addr}: {source}")]
    BindError {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CmdServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_includes_message() {
        let err = CmdServerError::ConfigError("need command".into());
        assert_eq!(err.to_string(), "Configuration error: need command");
    }

    #[test]
    fn bind_error_names_address() {
        let err = CmdServerError::BindError {
            addr: "localhost:1".into(),
            source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
        };
        assert!(err.to_string().starts_with("failed to bind localhost:1"));
    }
}
