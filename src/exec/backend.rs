// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The request handler talks to a `CommandRunner` instead of spawning
//! processes itself. This makes it easy to swap in a fake runner in tests
//! (e.g. one that records concurrency or returns canned output) while keeping
//! the production implementation in [`super::runner`].

use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::config::CommandSpec;

use super::runner::{ExecutionOutcome, run_command};

/// Trait abstracting how the configured command is executed.
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion, or until `cancel` fires.
    ///
    /// Implementations never fail outright: every problem is reported inside
    /// the returned [`ExecutionOutcome`].
    fn run<'a>(
        &'a self,
        command: &'a CommandSpec,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ExecutionOutcome> + Send + 'a>>;
}

/// Runner used in production: spawns a real OS process per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a self,
        command: &'a CommandSpec,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ExecutionOutcome> + Send + 'a>> {
        Box::pin(run_command(command, cancel))
    }
}
