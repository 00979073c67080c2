//! Error types for trace-conditioning operations.

use thiserror::Error;

/// Errors that can occur while conditioning a trace.
#[derive(Debug, Error)]
pub enum SignalError {
    /// A parameter fell outside its valid range (filter cutoffs outside
    /// the normalized band, inverted passband, negative noise amplitude).
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Coefficient or transform computation came out numerically
    /// degenerate (non-finite values).
    #[error("design failure: {0}")]
    DesignFailure(String),

    /// Time axis and trace lengths disagree, or channel lengths disagree.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A trace with zero samples where at least one is required.
    #[error("trace has no samples")]
    EmptyTrace,

    /// Resampling collapsed the trace to 0 or 1 samples.
    #[error("resampled length {0} is degenerate")]
    DegenerateLength(usize),

    /// Unrecognized integer code for the downsampling method.
    #[error("unknown downsampling method {0}, expected 1 or 2")]
    InvalidMethod(u8),
}

/// Result type for trace-conditioning operations.
pub type SignalResult<T> = Result<T, SignalError>;
