//! # Error Handling
//!
//! This module defines the centralized error type for `kondunite`. It uses
//! `thiserror` to build a single `Error` enum covering every failure the
//! unification pipeline can surface, with messages that name the offending
//! file, option, or cycle.
//!
//! ## Key Components
//!
//! - **`Error`**: all failure modes of the library. Per-document problems
//!   (an unparseable document, malformed metadata) are logged and skipped by
//!   the loader rather than returned, so only run-level failures end up here.
//!
//! - **`Result<T>`**: a type alias for `std::result::Result<T, Error>`.
//!
//! Run-level failures include:
//!
//! - Invalid run configuration (bad `--img` or `--repl-registry` values).
//! - A dependency cycle between manifest files.
//! - Missing or unreadable manifest directory.
//! - Reading the replicated base or writing the output.

use thiserror::Error;

/// Main error type for kondunite operations
#[derive(Error, Debug)]
pub enum Error {
    /// A run option could not be interpreted.
    ///
    /// Carries the offending value and an optional hint about the expected
    /// shape.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the option
        hint: Option<String>,
    },

    /// A single manifest document could not be used.
    ///
    /// The loader downgrades this to a warning; it is an error type so the
    /// reason can be formatted uniformly.
    #[error("Invalid manifest document in {file} (document {index}): {message}")]
    ManifestParse {
        file: String,
        index: usize,
        message: String,
    },

    /// The file-level dependency graph contains a cycle.
    #[error("Cycle detected in manifest dependencies: {cycle}")]
    GraphCycle { cycle: String },

    /// The manifest directory could not be searched.
    #[error("Manifest discovery error: {message}")]
    Discovery { message: String },

    /// Reading or writing a file failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
