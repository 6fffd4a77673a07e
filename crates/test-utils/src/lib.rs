//! Shared helpers for `powertask` integration tests.
//!
//! - [`builders`]: device descriptions without writing TOML.
//! - [`fakes`]: scripted energy, a recording store and an action call log.

pub mod builders;
pub mod fakes;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Upper bound for any async test that drives the runtime.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Install a per-test capturing subscriber once per test binary.
///
/// Filtered by `RUST_LOG` (default `powertask=debug`), so a failing test
/// shows every skip and restore decision of the sweeps it ran.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("powertask=debug"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// Await `fut`, failing the test if it outlives [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(fut: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, fut).await {
        Ok(value) => value,
        Err(_) => panic!("test did not finish within {TEST_TIMEOUT:?}"),
    }
}
