//! CLI command implementations.

pub mod bench;
pub mod find;
pub mod inspect;

use flatdb_core::Document;
use serde::{Deserialize, Serialize};

/// A document of unknown shape, read as plain JSON data.
#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDocument(pub serde_json::Value);

impl Document for RawDocument {}
