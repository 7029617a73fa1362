//! # FlatDB Core
//!
//! Typed collections, secondary indexes and queries for FlatDB.
//!
//! This crate provides:
//! - [`Database`]: a directory of collections
//! - [`Collection`]: one-file-per-document storage with monotonic IDs
//! - [`HashIndex`]: in-memory equality indexes rebuilt on [`Collection::init`]
//! - [`Query`] and [`QueryBuilder`]: composable filters with AND, OR,
//!   LIMIT and OFFSET
//!
//! ```rust,ignore
//! use flatdb_core::{CollectionConfig, Database, Document};
//! use serde::{Deserialize, Serialize};
//! use std::path::Path;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Book { title: String, author: String }
//!
//! impl Document for Book {}
//!
//! let db = Database::open(Path::new("library"))?;
//! let books = db.collection_with::<Book>("books", CollectionConfig::new().with_index("author"))?;
//! books.init()?;
//!
//! books.insert(&Book { title: "Dune".into(), author: "Herbert".into() })?;
//! let found = books.query().filter("author", "=", "Herbert").limit(10).execute()?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod config;
mod database;
mod error;
mod index;
mod query;
mod types;

pub use collection::{Collection, Document, ID_FILE};
pub use config::{CollectionConfig, DatabaseConfig, InsertMode};
pub use database::Database;
pub use error::{CoreError, CoreResult};
pub use index::HashIndex;
pub use query::{Operator, Query, QueryBuilder};
pub use types::InsertResult;

pub use flatdb_codec::{DocumentFormat, Envelope, Value};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
