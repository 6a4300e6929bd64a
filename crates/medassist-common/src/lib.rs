//! medassist-common — Shared error type and confidence helpers used across all medassist crates.

pub mod error;
pub mod confidence;

// Re-export commonly used types
pub use confidence::{round_hundredths, ConfidenceBand};
pub use error::{ApiError, CONFIGURATION_ERROR_MESSAGE, INTERNAL_ERROR_MESSAGE};
