//! Process-once tracing setup for test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Install the process-wide tracing subscriber, filtered by `RUST_LOG`.
///
/// Safe to call from every test case; only the first call installs, and an
/// already-installed subscriber (e.g. from the test framework) is left in
/// place.
pub fn init() {
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
