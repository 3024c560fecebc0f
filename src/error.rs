//! Error types for the warning registry.

use thiserror::Error;

/// Main error type.
///
/// Most operations here are total and never fail; the variants below cover
/// the two exceptions: malformed ignore patterns and frame accounting
/// requested before interception is installed (a host wiring bug).
#[derive(Debug, Error)]
pub enum WarnboxError {
    #[error("invalid ignore pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("log interception is not installed")]
    NotInstalled,
}

/// Result type for warnbox operations.
pub type Result<T> = std::result::Result<T, WarnboxError>;
