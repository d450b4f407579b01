//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Honors `RUST_LOG`; falls back to `info` when it is unset. Safe to call
/// more than once (later calls are ignored).
pub fn init() {
    init_with_filter("info");
}

/// Initialize logging with `default_filter` used when `RUST_LOG` is unset
pub fn init_with_filter(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}
