//! # Codec Error Types
//!
//! Error kinds surfaced by decoder and encoder sessions.

use thiserror::Error;

/// Errors that can occur during codec session operations.
///
/// Every variant is detected and returned synchronously by the operation that
/// hit it; nothing is retried internally.
#[derive(Error, Debug)]
pub enum CodecError {
    // ========================================================================
    // Caller Errors
    // ========================================================================
    /// Malformed caller input: bad channel count, undersized buffer, length
    /// out of range, sample count not a multiple of the channel count.
    ///
    /// Always detected before native state is touched.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation attempted on a destroyed session or a zero handle.
    #[error("{0} is closed")]
    Closed(&'static str),

    // ========================================================================
    // Native Codec Errors
    // ========================================================================
    /// Native encoder setup failed (allocation or parameter finalisation).
    /// Partially allocated native state has already been released.
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// Native encode or flush call returned a negative result.
    #[error("Encode failed: {0}")]
    EncodeFailure(String),

    /// A scratch buffer could not be reserved.
    #[error("Allocation failed: {0}")]
    AllocationFailure(String),

    // ========================================================================
    // Stream Errors
    // ========================================================================
    /// I/O error from the reader or writer wrapped by a stream adapter.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Discriminant of a [`CodecError`], for callers that map errors to codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecErrorKind {
    InvalidArgument,
    Closed,
    Initialization,
    EncodeFailure,
    AllocationFailure,
    Io,
}

impl CodecError {
    /// Build an [`CodecError::InvalidArgument`] from any message.
    pub fn invalid(message: impl Into<String>) -> Self {
        CodecError::InvalidArgument(message.into())
    }

    pub fn kind(&self) -> CodecErrorKind {
        match self {
            CodecError::InvalidArgument(_) => CodecErrorKind::InvalidArgument,
            CodecError::Closed(_) => CodecErrorKind::Closed,
            CodecError::Initialization(_) => CodecErrorKind::Initialization,
            CodecError::EncodeFailure(_) => CodecErrorKind::EncodeFailure,
            CodecError::AllocationFailure(_) => CodecErrorKind::AllocationFailure,
            CodecError::Io(_) => CodecErrorKind::Io,
        }
    }

    /// Returns `true` if the caller broke a precondition and no side effects
    /// happened.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            CodecError::InvalidArgument(_) | CodecError::Closed(_)
        )
    }

    /// Returns `true` if the native codec itself failed. The failed call must
    /// not be retried on the same session.
    pub fn is_native_failure(&self) -> bool {
        matches!(
            self,
            CodecError::Initialization(_)
                | CodecError::EncodeFailure(_)
                | CodecError::AllocationFailure(_)
        )
    }
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = CodecError::invalid("Output buffer holds 10 samples, at least 2304 required");
        assert_eq!(
            err.to_string(),
            "Invalid argument: Output buffer holds 10 samples, at least 2304 required"
        );

        assert_eq!(CodecError::Closed("Decoder").to_string(), "Decoder is closed");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CodecError::invalid("x").kind(),
            CodecErrorKind::InvalidArgument
        );
        assert_eq!(CodecError::Closed("Encoder").kind(), CodecErrorKind::Closed);
        assert_eq!(
            CodecError::Initialization("x".into()).kind(),
            CodecErrorKind::Initialization
        );
        assert_eq!(
            CodecError::EncodeFailure("x".into()).kind(),
            CodecErrorKind::EncodeFailure
        );
        assert_eq!(
            CodecError::AllocationFailure("x".into()).kind(),
            CodecErrorKind::AllocationFailure
        );

        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(CodecError::from(io).kind(), CodecErrorKind::Io);
    }

    #[test]
    fn test_error_classification() {
        assert!(CodecError::invalid("x").is_caller_error());
        assert!(CodecError::Closed("Decoder").is_caller_error());
        assert!(!CodecError::EncodeFailure("x".into()).is_caller_error());

        assert!(CodecError::EncodeFailure("x".into()).is_native_failure());
        assert!(CodecError::Initialization("x".into()).is_native_failure());
        assert!(!CodecError::invalid("x").is_native_failure());
    }
}
