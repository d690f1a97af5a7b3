//! Result type alias for the smoke-test driver.

/// Convenience alias for `std::result::Result<T, crate::Error>`.
pub type Result<T, E = crate::Error> = std::result::Result<T, E>;
