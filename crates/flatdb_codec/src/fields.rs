//! Field access through serde.

use crate::value::Value;
use serde::Serialize;

/// Returns the value of the top-level field `name` of `payload`.
///
/// The payload is serialized to a JSON tree and the field is looked up by
/// its serialized name, so `#[serde(rename)]` attributes apply. Returns
/// `None` only when the payload does not serialize to a map or has no field
/// of that name. Byte vectors serialize as sequences, so a `Vec<u8>` field
/// reads back as a [`Value::Array`] of integers.
///
/// # Example
///
/// ```
/// use flatdb_codec::{field_of, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct User {
///     name: String,
///     age: i64,
/// }
///
/// let user = User { name: "Ada".into(), age: 36 };
/// assert_eq!(field_of(&user, "age"), Some(Value::Integer(36)));
/// assert_eq!(field_of(&user, "email"), None);
/// ```
pub fn field_of<T: Serialize + ?Sized>(payload: &T, name: &str) -> Option<Value> {
    match serde_json::to_value(payload).ok()? {
        serde_json::Value::Object(mut fields) => fields.remove(name).map(Value::from_json),
        _ => None,
    }
}
