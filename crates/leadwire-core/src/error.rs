//! Error types for mapping operations.
//!
//! Transform failures are per-field: the engine records them as diagnostics
//! and keeps processing, so these errors never abort a whole transform on
//! their own.

use thiserror::Error;

/// Errors raised by transform functions during mapping.
#[derive(Debug, Clone, Error)]
pub enum MappingError {
    /// A resolved value had a type the transform cannot work with.
    #[error("unexpected value type: expected {expected}")]
    UnexpectedType {
        /// The type the transform expected to receive
        expected: &'static str,
    },

    /// A transform failed for a reason of its own.
    #[error("transform failed: {message}")]
    Transform {
        /// Transform-specific failure message
        message: String,
    },
}

impl MappingError {
    /// Creates an unexpected-type error.
    pub fn unexpected_type(expected: &'static str) -> Self {
        Self::UnexpectedType { expected }
    }

    /// Creates a transform error from a message.
    pub fn transform(message: impl Into<String>) -> Self {
        Self::Transform { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_format() {
        let error = MappingError::unexpected_type("string");
        assert_eq!(error.to_string(), "unexpected value type: expected string");

        let error = MappingError::transform("bad timestamp");
        assert_eq!(error.to_string(), "transform failed: bad timestamp");
    }
}
