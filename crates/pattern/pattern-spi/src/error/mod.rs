//! Error module containing error types and result aliases

mod pattern_error;

pub use pattern_error::PatternError;

/// Result type for pattern engine operations
pub type Result<T> = std::result::Result<T, PatternError>;
