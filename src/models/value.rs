//! Table cell values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell of a [`crate::Table`].
///
/// Cells read from CSV start out as [`Value::Text`] and are coerced to the
/// column type during conversion. [`Value::Bytes`] only appears in tables
/// assembled by hand; conversion out of the store always yields text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Unsigned integer.
    UInt(u64),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw byte string.
    Bytes(Vec<u8>),
}

impl Value {
    /// Creates a text value.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Returns the value as `f64` if it is numeric or numeric text.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::UInt(v) => Some(*v as f64),
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(s) => parse_float(s),
            Self::Bytes(_) => None,
        }
    }

    /// Returns the value as `i64` if it holds an integral number.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::UInt(v) => i64::try_from(*v).ok(),
            Self::Int(v) => Some(*v),
            Self::Float(v) => float_to_i64(*v),
            Self::Text(s) => parse_integer(s),
            Self::Bytes(_) => None,
        }
    }

    /// Returns true if the value is a raw byte string.
    #[must_use]
    pub const fn is_bytes(&self) -> bool {
        matches!(self, Self::Bytes(_))
    }

    /// Returns the text rendering used in CSV cells.
    #[must_use]
    pub fn to_cell(&self) -> String {
        match self {
            Self::UInt(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => format_float(*v),
            Self::Text(s) => s.clone(),
            Self::Bytes(b) => decode_bytes(b),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cell())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Formats a float for a CSV cell.
///
/// NaN is written as an empty cell and integral values keep a trailing
/// `.0`, matching what pandas produces for float columns.
#[must_use]
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else if v.is_infinite() {
        let sign = if v.is_sign_positive() { "" } else { "-" };
        format!("{sign}inf")
    } else {
        format!("{v:?}")
    }
}

/// Parses float text; empty cells and `nan` read as NaN.
#[must_use]
pub fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    s.parse::<f64>().ok()
}

/// Parses integer text, accepting integral floats such as `3.0`.
#[must_use]
pub fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    s.parse::<f64>().ok().and_then(float_to_i64)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_i64(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

/// Decodes a fixed-width byte string, dropping trailing NUL padding.
#[must_use]
pub fn decode_bytes(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|b| *b != 0)
        .map_or(0, |last| last + 1);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
