//! Error types for rule gathering.
//!
//! Only failures that abort a run live here. Conflicting declarations,
//! unknown severities and individual write failures are reported through
//! the diagnostic sink instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The linting engine could not produce a rule table for a glob
    #[error("cannot resolve lint configuration for '{glob}': {message}")]
    Resolve { glob: String, message: String },

    #[error("invalid glob pattern '{glob}': {message}")]
    InvalidGlob { glob: String, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config or snapshot file exists but is not valid for its format
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
