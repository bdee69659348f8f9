//! Folio CLI Library
//!
//! Command implementations and logging setup for the `folio` binary.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use folio::cmd;
//!
//! cmd::build::run(Path::new("folio.toml"), None, false, false, false).unwrap();
//! ```

pub mod cmd;

pub use folio_core::Config;
pub use folio_generator::{BuildOptions, BuildReport, build_site};

/// Tracing level for a `-v` count, with `--debug` forcing at least DEBUG.
pub fn log_level(verbose: u8, debug: bool) -> tracing::Level {
    let verbose = if debug { verbose.max(2) } else { verbose };
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Initialize tracing with the specified verbosity level.
///
/// `RUST_LOG` directives still apply on top of the chosen level.
///
/// ```no_run
/// folio::init_tracing(1, false); // INFO
/// ```
pub fn init_tracing(verbose: u8, debug: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = log_level(verbose, debug);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
