//! Payload trait for typed collections.

use flatdb_codec::{field_of, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Trait for payload types stored in a FlatDB collection.
///
/// Serialization comes from serde. Field access, used by indexes and
/// unindexed lookups, defaults to reading the named top-level field of the
/// payload's serialized form, so an empty impl is enough:
///
/// ```rust
/// use flatdb_core::Document;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct User {
///     name: String,
///     age: i64,
/// }
///
/// impl Document for User {}
/// ```
///
/// Hot payload types can override [`Document::field`] with direct
/// accessors to skip the intermediate serialization:
///
/// ```rust
/// use flatdb_core::{Document, Value};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct User {
///     name: String,
///     age: i64,
/// }
///
/// impl Document for User {
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "name" => Some(Value::from(self.name.as_str())),
///             "age" => Some(Value::Integer(self.age)),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Returns the value of the field called `name`, or `None` if the
    /// payload has no such field.
    fn field(&self, name: &str) -> Option<Value> {
        field_of(self, name)
    }
}
