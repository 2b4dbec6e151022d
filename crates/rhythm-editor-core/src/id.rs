//! Host-defined region identifiers.
//!
//! The host addresses regions with whatever identifier shape it likes (a
//! string, a number, a path array, an object). The core only needs a
//! deterministic serialized form to key the registry, so an `EditableId`
//! keeps the original value alongside its compact JSON key.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use smol_str::SmolStr;

use crate::error::EditorError;

/// Opaque identifier for an editable region.
///
/// Equality and hashing use the serialized key only. Object keys are sorted
/// during serialization, so `{"a":1,"b":2}` and `{"b":2,"a":1}` name the same
/// region.
#[derive(Clone)]
pub struct EditableId {
    value: Value,
    key: SmolStr,
}

impl EditableId {
    /// Build an identifier from any serializable host value.
    pub fn new<T: Serialize + ?Sized>(id: &T) -> Result<Self, EditorError> {
        Ok(Self::from(serde_json::to_value(id)?))
    }

    /// The host's original identifier value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Serialized form used as the registry key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl From<Value> for EditableId {
    fn from(value: Value) -> Self {
        let key = SmolStr::new(value.to_string());
        Self { value, key }
    }
}

impl From<&str> for EditableId {
    fn from(s: &str) -> Self {
        Self::from(Value::from(s))
    }
}

impl From<String> for EditableId {
    fn from(s: String) -> Self {
        Self::from(Value::from(s))
    }
}

impl From<u64> for EditableId {
    fn from(n: u64) -> Self {
        Self::from(Value::from(n))
    }
}

impl From<i64> for EditableId {
    fn from(n: i64) -> Self {
        Self::from(Value::from(n))
    }
}

impl PartialEq for EditableId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for EditableId {}

impl Hash for EditableId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for EditableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EditableId({})", self.key)
    }
}

impl fmt::Display for EditableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl Serialize for EditableId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EditableId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}
