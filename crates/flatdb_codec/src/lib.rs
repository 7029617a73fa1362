//! # FlatDB Codec
//!
//! Serialization boundary for FlatDB documents.
//!
//! This crate provides:
//! - [`Envelope`]: the stored `{ID, Data}` pair
//! - [`DocumentFormat`]: the byte encoding of envelopes (JSON or CBOR)
//! - [`Value`]: a hashable field value used by indexes and queries
//! - [`field_of`]: serde-driven field lookup by name
//!
//! ## Usage
//!
//! ```
//! use flatdb_codec::{DocumentFormat, Envelope, EnvelopeRef};
//!
//! let bytes = DocumentFormat::Json.encode(&EnvelopeRef::new(1, &"hi")).unwrap();
//! assert_eq!(bytes, br#"{"ID":1,"Data":"hi"}"#);
//!
//! let envelope: Envelope<String> = DocumentFormat::Json.decode(&bytes).unwrap();
//! assert_eq!(envelope.data, "hi");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod envelope;
mod error;
mod fields;
mod format;
mod value;

pub use envelope::{Envelope, EnvelopeRef};
pub use error::{CodecError, CodecResult};
pub use fields::field_of;
pub use format::DocumentFormat;
pub use value::Value;
