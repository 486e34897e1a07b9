//! Shared helpers for cmdserver's integration tests.

pub mod builders;
pub mod fake_runner;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for a whole request in tests that are not about timing.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// `RUST_LOG` overrides the default of debug output for this crate and
/// warnings for everything else (hyper, tower-http).
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,cmdserver=debug"));

        fmt().with_env_filter(filter).with_test_writer().init();
    });
}

/// Await `fut`, failing the test if it takes longer than `limit`.
pub async fn within<F, T>(limit: Duration, fut: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(value) => value,
        Err(_) => panic!("did not finish within {limit:?}"),
    }
}
