//! Decoders
//!
//! Functions turning raw stored bytes back into typed values. Any closure
//! with the same shape can be passed to [`Cache::get_with`](super::Cache::get_with).

use crate::error::DecodeError;

/// Signature shared by the built-in decoders.
///
/// Useful to pick a decoder at runtime or keep one in a table; a
/// `Decoder<T>` is accepted anywhere [`Cache::get_with`](super::Cache::get_with)
/// takes a closure.
pub type Decoder<T> = fn(&[u8]) -> Result<T, DecodeError>;

/// Decodes UTF-8 text.
pub fn utf8(raw: &[u8]) -> Result<String, DecodeError> {
    Ok(String::from_utf8(raw.to_vec())?)
}

/// Decodes a base-10 integer.
pub fn integer(raw: &[u8]) -> Result<i64, DecodeError> {
    Ok(utf8(raw)?.parse()?)
}

/// Decodes a floating-point number.
pub fn float(raw: &[u8]) -> Result<f64, DecodeError> {
    Ok(utf8(raw)?.parse()?)
}

/// Returns the raw bytes unchanged.
pub fn bytes(raw: &[u8]) -> Result<Vec<u8>, DecodeError> {
    Ok(raw.to_vec())
}
