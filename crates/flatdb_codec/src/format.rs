//! On-disk document formats.

use crate::error::{CodecError, CodecResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialization format of the document files in a collection.
///
/// The format also fixes the document file extension, so collections in
/// different formats never read each other's files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    /// JSON via `serde_json`, stored as `<id>.json`.
    #[default]
    Json,
    /// CBOR via `ciborium`, stored as `<id>.cbor`.
    Cbor,
}

impl DocumentFormat {
    /// Returns the file extension for this format (without the dot).
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Cbor => "cbor",
        }
    }

    /// Returns the format's display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Cbor => "CBOR",
        }
    }

    /// Encodes `value` to bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EncodingFailed`] if serialization fails.
    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> CodecResult<Vec<u8>> {
        match self {
            Self::Json => serde_json::to_vec(value)
                .map_err(|e| CodecError::encoding_failed(self.name(), e.to_string())),
            Self::Cbor => {
                let mut bytes = Vec::new();
                ciborium::into_writer(value, &mut bytes)
                    .map_err(|e| CodecError::encoding_failed(self.name(), e.to_string()))?;
                Ok(bytes)
            }
        }
    }

    /// Decodes bytes into a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DecodingFailed`] if the bytes are malformed or
    /// do not match the shape of `T`.
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> CodecResult<T> {
        match self {
            Self::Json => serde_json::from_slice(bytes)
                .map_err(|e| CodecError::decoding_failed(self.name(), e.to_string())),
            Self::Cbor => ciborium::from_reader(bytes)
                .map_err(|e| CodecError::decoding_failed(self.name(), e.to_string())),
        }
    }
}
