//! Result type alias for plan comparison.

/// Convenience alias for `std::result::Result<T, crate::Error>`.
pub type Result<T, E = crate::Error> = std::result::Result<T, E>;
