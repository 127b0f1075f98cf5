use thiserror::Error;

/// Errors raised by the scoring and aggregation core.
///
/// Numeric degeneracies (zero variance, zero car strength) are never errors;
/// they are recovered where they occur.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoreError {
    /// A mandatory input was absent.
    #[error("missing mandatory input: {field}")]
    MissingInput { field: &'static str },

    /// Rounds were not supplied in strictly increasing order.
    #[error("round {next} supplied after round {previous}; rounds must be strictly increasing")]
    RoundOrder { previous: u32, next: u32 },

    /// An event failed basic identity checks.
    #[error("invalid event: {0}")]
    InvalidEvent(String),
}
