//! Data models shared by the classroom services.
//!
//! Field names follow the JSON stored on disk and exchanged over HTTP (camelCase).

mod badge;
mod student;
mod task;
mod teacher;

pub use badge::*;
pub use student::*;
pub use task::*;
pub use teacher::*;

use serde::{de::DeserializeOwned, Deserialize, Deserializer};

/// Deserialize an optional request field, treating a value of the wrong JSON type as absent.
///
/// Use with `#[serde(default, deserialize_with = "lenient")]`.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserialize a stored list, reading `null` the same as a missing field.
///
/// Use with `#[serde(default, deserialize_with = "null_as_empty")]`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A required string field, with an empty string counted as missing.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
