//! Structured payload attached to a record.
//!
//! Every shape a caller can hand over is reduced to a JSON object exactly
//! once, when the record is built:
//!
//! - objects are kept as they are
//! - arrays become `{"data": [...]}`
//! - primitives become `{"value": ...}`
//! - errors become `{"message", "name", "stack", "debug"}`
//! - anything that fails to serialize becomes `{"value": "<debug repr>"}`

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized, schema-less key/value payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Details(Map<String, Value>);

impl Details {
    /// Empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Normalize an arbitrary JSON value. `null` yields `None`.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Object(map) => Some(Self(map)),
            Value::Array(items) => {
                let mut map = Map::new();
                let _ = map.insert("data".into(), Value::Array(items));
                Some(Self(map))
            }
            primitive => {
                let mut map = Map::new();
                let _ = map.insert("value".into(), primitive);
                Some(Self(map))
            }
        }
    }

    /// Normalize anything serializable.
    ///
    /// Serialization failures (non-string map keys, failing `Serialize`
    /// impls) are coerced to `{"value": "<unserializable: ...>"}` instead of
    /// surfacing an error.
    #[must_use]
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Option<Self> {
        match serde_json::to_value(value) {
            Ok(v) => Self::from_value(v),
            Err(e) => Some(Self::single(
                "value",
                Value::String(format!("<unserializable: {e}>")),
            )),
        }
    }

    /// Wrap a `Debug` rendering as `{"value": "..."}`.
    #[must_use]
    pub fn from_debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Self::single("value", Value::String(format!("{value:?}")))
    }

    /// Structured view of an error and its cause chain.
    #[must_use]
    pub fn from_error<E: Error + ?Sized>(err: &E) -> Self {
        let mut map = Map::new();
        let _ = map.insert("message".into(), Value::String(err.to_string()));
        let _ = map.insert("name".into(), Value::String(short_type_name::<E>()));

        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        if !chain.is_empty() {
            let _ = map.insert("stack".into(), Value::String(chain.join("\ncaused by: ")));
        }
        let _ = map.insert("debug".into(), Value::String(format!("{err:?}")));
        Self(map)
    }

    fn single(key: &str, value: Value) -> Self {
        let mut map = Map::new();
        let _ = map.insert(key.to_string(), value);
        Self(map)
    }

    /// Insert a serializable value under `key`. Unserializable values are
    /// stored as their error text.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Serialize) {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|e| Value::String(format!("<unserializable: {e}>")));
        let _ = self.0.insert(key.into(), value);
    }

    /// Builder form of [`Details::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.insert(key, value);
        self
    }

    /// Overlay `other` on top of `self`; keys from `other` win.
    pub fn extend(&mut self, other: Details) {
        self.0.extend(other.0);
    }

    /// Look up a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Details {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// `std::any::type_name` without the module path (`io::Error` → `Error`).
fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
