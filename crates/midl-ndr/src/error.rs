//! NDR error types

use thiserror::Error;

/// NDR encoding/decoding errors
#[derive(Debug, Error)]
pub enum NdrError {
    /// Fewer bytes remain than a fixed-width read requires
    #[error("short buffer: needed {needed} bytes, have {have}")]
    ShortBuffer { needed: usize, have: usize },

    /// A conformance header declares more elements than the input can hold
    #[error("buffer overflow: declared count {declared} exceeds {remaining} remaining bytes")]
    BufferOverflow { declared: u64, remaining: usize },

    /// Deferred pointer payloads and referents went out of step
    #[error("deferred pointer queue mismatch: {pending} referent(s) pending")]
    DeferredMismatch { pending: usize },

    /// Variance header inconsistent with conformance header
    #[error("conformance mismatch: max_count={max_count}, actual_count={actual_count}")]
    ConformanceMismatch { max_count: u64, actual_count: u64 },

    /// Array length does not fit the declared bound
    #[error("array size mismatch: expected at most {expected}, got {got}")]
    ArraySizeMismatch { expected: usize, got: usize },

    /// Invalid string - not null terminated or invalid encoding
    #[error("invalid string: {0}")]
    InvalidString(String),

    /// Non-null referent where none is allowed
    #[error("invalid pointer: referent ID {0:#x}")]
    InvalidPointer(u64),

    /// Invalid discriminant for union
    #[error("invalid union discriminant: {0}")]
    InvalidDiscriminant(i64),

    /// A count does not fit the wire or host integer width
    #[error("integer overflow: {0}")]
    IntegerOverflow(u64),

    /// UTF-8 decoding error
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// UTF-16 decoding error
    #[error("UTF-16 error: {0}")]
    Utf16(#[from] std::char::DecodeUtf16Error),
}

/// Result type for NDR operations
pub type Result<T> = std::result::Result<T, NdrError>;
