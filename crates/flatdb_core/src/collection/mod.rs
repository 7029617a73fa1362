//! Typed collection API.
//!
//! Provides `Collection<T>` for storing payloads of type `T` one file per
//! document, with automatic ID allocation, optional secondary indexes and
//! serde-based encoding via the `Document` trait.

mod document;
mod typed;

pub use document::Document;
pub use typed::{Collection, ID_FILE};
