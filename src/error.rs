//! Error types for the instrumented cache
//!
//! Provides unified error handling using thiserror.

use std::num::{ParseFloatError, ParseIntError};
use std::string::FromUtf8Error;

use thiserror::Error;

// == Decode Error Enum ==
/// Failure to interpret raw stored bytes as the requested value kind.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Bytes are not valid UTF-8
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// Text is not a base-10 integer
    #[error("invalid integer: {0}")]
    Integer(#[from] ParseIntError),

    /// Text is not a floating-point number
    #[error("invalid float: {0}")]
    Float(#[from] ParseFloatError),

    /// Raised by a caller-supplied decoder
    #[error("{0}")]
    Custom(String),
}

// == Cache Error Enum ==
/// Unified error type for the cache facade, instrumentation and fetch cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Storage backend is unreachable or rejected the command
    #[error("Backend error: {0}")]
    Backend(String),

    /// Stored bytes could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// External content fetch failed
    #[error("Fetch error for {request_id}: {message}")]
    Fetch { request_id: String, message: String },

    /// Call arguments or results could not be serialized for history
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Builds a `Fetch` error for the given request identity.
    pub fn fetch(request_id: impl Into<String>, message: impl ToString) -> Self {
        CacheError::Fetch {
            request_id: request_id.into(),
            message: message.to_string(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
