//! Shared fixtures for the engine tests: config builders, an in-memory
//! generator and test logging.

pub mod builders;
pub mod fake_generator;

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Route engine logs into the test harness capture, once per binary.
///
/// Output shows up for failing tests only. `RUST_LOG` picks the level and
/// defaults to `info`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
