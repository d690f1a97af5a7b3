//! plan-compare CLI library.
//!
//! Loads two execution plan elements from JSON and prints their merged
//! properties side by side.

pub mod commands;
pub mod output;

pub use output::OutputFormat;
