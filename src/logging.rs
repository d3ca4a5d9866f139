//! Tracing setup for test binaries.
//!
//! Reads `.env` first, then `RUST_LOG` (default `jat=debug`) and
//! `JAT_LOG_FORMAT` (`json` for JSON lines, anything else for plain text).
//! Output goes through the test writer, so it is captured per test.

use tracing_subscriber::EnvFilter;

pub static DEFAULT_FILTER: &str = "jat=debug";
pub static FORMAT_VAR: &str = "JAT_LOG_FORMAT";

/// Installs the global subscriber. Only the first call in a process wins;
/// later calls return without touching it.
pub fn init() {
    dotenv::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer();

    let json = std::env::var(FORMAT_VAR).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if installed.is_ok() {
        tracing::debug!(json, "test logging initialized");
    }
}
