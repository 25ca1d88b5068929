//! Raw inbound events.
//!
//! A [`RawEvent`] is the loosely-typed form of one protocol message as it leaves
//! the transport: a JSON object whose key order is preserved. It is never
//! mutated after construction; classification only reads discriminator fields
//! and deserialization only borrows it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use super::error::EventError;

/// One inbound protocol message as an ordered key/value tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct RawEvent {
    /// Always a `Value::Object`.
    value: Value,
}

impl RawEvent {
    /// Parses a JSON document into a raw event.
    ///
    /// The document must be a JSON object.
    pub fn parse(text: &str) -> Result<Self, EventError> {
        let value: Value = serde_json::from_str(text)?;
        Self::try_from(value)
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }

    /// Returns the string value of a discriminator field.
    ///
    /// Absent fields and non-string values both yield `None`.
    pub fn discriminator(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns the integer value of a field.
    ///
    /// Numeric strings are accepted since some implementations quote ids.
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok())),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Iterates over the top-level keys in their original order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.value
            .as_object()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    /// Deserializes the whole event into a typed structure.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.value)
    }

    /// Returns the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.value
    }
}

impl TryFrom<Value> for RawEvent {
    type Error = EventError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(_) => Ok(Self { value }),
            other => Err(EventError::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }
}

impl Serialize for RawEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl From<Map<String, Value>> for RawEvent {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            value: Value::Object(map),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
