//! Rulefold core library.
//!
//! Gathers the lint rules an external engine resolved for several
//! file-type profiles, folds them into one canonical ruleset per plugin
//! namespace, reports conflicting declarations, and renders deterministic
//! rule modules.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `models`: Settings values, profiles, namespaces and conflicts.
//! - `severity`: Severity token normalization.
//! - `namespace`: Plugin namespace derivation from rule names.
//! - `serialize`: Deterministic source rendering of settings.
//! - `reconcile`: First-writer-wins folding of profiles.
//! - `loader`: Resolved-configuration sources (snapshot file, command).
//! - `writer`: Artifact rendering, writing and checking.
//! - `generate`: End-to-end run orchestration.
//! - `diagnostics`: Injected sink for conflicts and write failures.
//! - `output`: Human/JSON printers.
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod generate;
pub mod loader;
pub mod models;
pub mod namespace;
pub mod output;
pub mod reconcile;
pub mod serialize;
pub mod severity;
pub mod utils;
pub mod writer;

pub use error::{Error, Result};

/// Initialize the tracing subscriber for logging to stderr.
///
/// `RULEFOLD_LOG` (then `RUST_LOG`) takes precedence over the verbosity flag.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default = match verbose {
        0 => "rulefold=warn",
        1 => "rulefold=info",
        _ => "rulefold=debug",
    };
    let filter = EnvFilter::try_from_env("RULEFOLD_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
