//! Error types for FlatDB core.

use crate::query::Operator;
use flatdb_codec::{CodecError, Value};
use flatdb_storage::StorageError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in FlatDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage error (counter or document files).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Payload encoding error.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stored bytes do not decode into an envelope of the expected shape.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        /// Path of the offending document file.
        path: PathBuf,
        /// Underlying codec failure.
        #[source]
        source: CodecError,
    },

    /// No document exists for the requested ID.
    #[error("document {id} not found")]
    DocumentNotFound {
        /// The requested ID.
        id: u64,
    },

    /// No document has the requested field value.
    #[error("no document with {field} = {value}")]
    NoMatch {
        /// Field that was looked up.
        field: String,
        /// Value that was looked up.
        value: Value,
    },

    /// A comparison token is not one of the recognized operators.
    #[error("invalid query operator {token:?}")]
    InvalidOperator {
        /// The rejected token.
        token: String,
    },

    /// A recognized operator cannot be applied to the given operand.
    #[error("operator {operator} is not supported for {value_type} values")]
    UnsupportedOperator {
        /// The operator.
        operator: Operator,
        /// Kind of the operand.
        value_type: &'static str,
    },

    /// Collection setup or index rebuild failed.
    #[error("failed to initialize collection {collection}: {source}")]
    Initialization {
        /// Collection name.
        collection: String,
        /// Underlying failure.
        #[source]
        source: Box<CoreError>,
    },

    /// A collection operation failed.
    #[error("{operation} failed on collection {collection}: {source}")]
    Collection {
        /// Collection name.
        collection: String,
        /// Operation name.
        operation: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<CoreError>,
    },

    /// A query node failed to execute.
    #[error("error executing {node} query: {source}")]
    Query {
        /// Kind of the failing node.
        node: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<CoreError>,
    },

    /// Operation not permitted.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

impl CoreError {
    /// Creates an initialization error for `collection`.
    pub fn initialization(collection: impl Into<String>, source: CoreError) -> Self {
        Self::Initialization {
            collection: collection.into(),
            source: Box::new(source),
        }
    }

    /// Wraps `source` with the collection and operation it came from.
    pub fn collection(
        collection: impl Into<String>,
        operation: &'static str,
        source: CoreError,
    ) -> Self {
        Self::Collection {
            collection: collection.into(),
            operation,
            source: Box::new(source),
        }
    }

    /// Wraps `source` with the query node it came from.
    pub fn query(node: &'static str, source: CoreError) -> Self {
        Self::Query {
            node,
            source: Box::new(source),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Returns the innermost error beneath any context wrappers.
    pub fn root_cause(&self) -> &CoreError {
        match self {
            Self::Initialization { source, .. }
            | Self::Collection { source, .. }
            | Self::Query { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Returns true if the root cause is a missing document or value.
    pub fn is_not_found(&self) -> bool {
        match self.root_cause() {
            Self::DocumentNotFound { .. } | Self::NoMatch { .. } => true,
            Self::Storage(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Returns true if the root cause is a lookup that matched nothing.
    pub fn is_no_match(&self) -> bool {
        matches!(self.root_cause(), Self::NoMatch { .. })
    }
}
