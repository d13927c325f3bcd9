//! Logging setup for binaries and tests
//!
//! Library code only emits through the `log` facade; a binary picks the
//! backend once at startup.

pub use log::{debug, error, info, trace, warn, LevelFilter};

/// Initialize `env_logger` with `default_level`, letting `RUST_LOG` override it
pub fn init(default_level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Initialize logging for tests, tolerating repeated calls
pub fn init_for_tests() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(LevelFilter::Debug)
        .try_init();
}
