//! Logging utilities
//!
//! The engine logs through the `log` facade; binaries pick the sink. These helpers
//! install `env_logger`, honouring `RUST_LOG` when it is set.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with a default filter (e.g. `"info"` or `"brawl_engine=debug"`)
///
/// `RUST_LOG` still wins when present. Calling this twice is harmless.
pub fn init_with_filter(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::trace!("Logger already initialised");
    }
}
