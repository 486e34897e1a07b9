// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the configured command,
//! using `tokio::process::Command`, and handing back what it printed.
//!
//! - [`runner`] spawns the OS process, captures stdout+stderr through one
//!   shared pipe and kills the process when the request is cancelled.
//! - [`backend`] provides the `CommandRunner` trait the HTTP handler talks to,
//!   with [`ProcessRunner`] as the production implementation. Tests can swap
//!   in a fake that never touches the OS.

pub mod backend;
pub mod runner;

pub use backend::{CommandRunner, ProcessRunner};
pub use runner::{ExecutionOutcome, RunError, run_command};
