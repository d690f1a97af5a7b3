//! Error types for plan comparison.
//!
//! Merging and flattening never fail; errors only come from decoding plan
//! input and from parsing user-facing options.

use thiserror::Error;

/// Top-level error type for the comparison crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Plan element input could not be decoded.
    #[error("Invalid plan element JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Plan element input could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A sort policy name did not match any known policy.
    #[error(
        "Unknown sort policy '{0}'. Must be one of: display-order, alphabetical, reverse-alphabetical, reverse-display-order"
    )]
    UnknownSortPolicy(String),
}
