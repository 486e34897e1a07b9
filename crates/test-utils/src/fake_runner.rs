use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cmdserver::config::CommandSpec;
use cmdserver::exec::{CommandRunner, ExecutionOutcome, RunError};
use tokio_util::sync::CancellationToken;

/// What a [`FakeRunner`] reports once its (simulated) command finishes.
#[derive(Debug, Clone)]
pub enum FakeResult {
    Success(Vec<u8>),
    Exit { code: i32, output: Vec<u8> },
}

/// A fake runner that:
/// - counts invocations and tracks how many were in flight at once
/// - optionally "runs" for a while, honouring cancellation
/// - returns a canned result without touching the OS.
pub struct FakeRunner {
    result: FakeResult,
    delay: Duration,
    invocations: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeRunner {
    pub fn new(result: FakeResult) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
            invocations: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn succeeding(output: &[u8]) -> Self {
        Self::new(FakeResult::Success(output.to_vec()))
    }

    pub fn failing(code: i32, output: &[u8]) -> Self {
        Self::new(FakeResult::Exit {
            code,
            output: output.to_vec(),
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn outcome(&self) -> ExecutionOutcome {
        match &self.result {
            FakeResult::Success(out) => ExecutionOutcome::success(out.clone()),
            FakeResult::Exit { code, output } => {
                ExecutionOutcome::failure(output.clone(), RunError::Exit { code: *code })
            }
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(
        &'a self,
        _command: &'a CommandSpec,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ExecutionOutcome> + Send + 'a>> {
        Box::pin(async move {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let outcome = tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    ExecutionOutcome::failure(Vec::new(), RunError::Cancelled)
                }
                _ = tokio::time::sleep(self.delay) => self.outcome(),
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            outcome
        })
    }
}
