//! The stored document envelope.

use serde::{Deserialize, Serialize};

/// The unit of storage: an immutable ID paired with a payload.
///
/// Serialized as `{"ID": <u64>, "Data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Unique, immutable document ID.
    #[serde(rename = "ID")]
    pub id: u64,
    /// The caller's payload.
    #[serde(rename = "Data")]
    pub data: T,
}

impl<T> Envelope<T> {
    /// Creates an envelope.
    pub fn new(id: u64, data: T) -> Self {
        Self { id, data }
    }

    /// Consumes the envelope, returning the payload.
    pub fn into_data(self) -> T {
        self.data
    }
}

/// A borrowed envelope, serialized identically to [`Envelope`].
///
/// Used on the write path so a payload can be encoded without cloning it.
#[derive(Debug, Serialize)]
pub struct EnvelopeRef<'a, T> {
    /// Document ID.
    #[serde(rename = "ID")]
    pub id: u64,
    /// Borrowed payload.
    #[serde(rename = "Data")]
    pub data: &'a T,
}

impl<'a, T> EnvelopeRef<'a, T> {
    /// Creates a borrowed envelope.
    pub fn new(id: u64, data: &'a T) -> Self {
        Self { id, data }
    }
}
