//! Account path error types.

use thiserror::Error;

/// Errors raised when validating an account path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path has no segments.
    #[error("Account path is empty")]
    EmptyPath,

    /// The path is deeper than allowed.
    #[error("Account path has {depth} segments, maximum is {max}")]
    ExceedsMaxDepth {
        /// Configured maximum depth.
        max: usize,
        /// Actual depth of the rejected path.
        depth: usize,
    },

    /// A segment violates the segment content policy.
    ///
    /// Segments currently accept any printable text, so this variant is
    /// reserved for stricter policies.
    #[error("Invalid account path segment: {0:?}")]
    InvalidSegment(String),
}

impl PathError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyPath => "EMPTY_PATH",
            Self::ExceedsMaxDepth { .. } => "EXCEEDS_MAX_DEPTH",
            Self::InvalidSegment(_) => "INVALID_SEGMENT",
        }
    }
}
