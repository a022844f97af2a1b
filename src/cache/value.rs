//! Values and Keys
//!
//! The scalar kinds the facade stores and the opaque keys it hands out.

use std::fmt;
use std::ops::Deref;

use serde::Serialize;
use uuid::Uuid;

// == Value ==
/// A scalar value accepted by [`Cache::store`](super::Cache::store).
///
/// Serializes untagged, so history records show `"cool"` or `123` rather
/// than an enum wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
}

impl Value {
    /// Encodes the value into the bytes written to the backend.
    ///
    /// | kind  | encoding             |
    /// |-------|----------------------|
    /// | text  | raw UTF-8 bytes      |
    /// | bytes | unchanged            |
    /// | int   | decimal ASCII text   |
    /// | float | decimal ASCII text   |
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Value::Text(text) => text.as_bytes().to_vec(),
            Value::Bytes(bytes) => bytes.clone(),
            Value::Int(int) => int.to_string().into_bytes(),
            Value::Float(float) => float.to_string().into_bytes(),
        }
    }

    /// Short name of the value kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

// == Key ==
/// Opaque key generated by the facade for every stored value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    /// Generates a fresh random (UUID v4) key.
    pub fn generate() -> Self {
        Key(Uuid::new_v4().to_string())
    }

    /// Borrows the key text, as passed to the backend.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for Key {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
