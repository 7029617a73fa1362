//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to encode a value.
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        /// Format being written.
        format: &'static str,
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to decode bytes into the expected shape.
    #[error("{format} decoding failed: {message}")]
    DecodingFailed {
        /// Format being read.
        format: &'static str,
        /// Description of the decoding error.
        message: String,
    },
}

impl CodecError {
    /// Create an encoding failed error.
    pub fn encoding_failed(format: &'static str, message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            format,
            message: message.into(),
        }
    }

    /// Create a decoding failed error.
    pub fn decoding_failed(format: &'static str, message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            format,
            message: message.into(),
        }
    }
}
