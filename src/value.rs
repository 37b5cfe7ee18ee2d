//! The generic JSON value tree.
//!
//! This module provides [`JsonValue`], the tagged representation of any JSON
//! value that the conversion engine consumes and produces. Unlike most Rust
//! JSON models it keeps four distinct numeric variants — [`Int`], [`Long`],
//! [`Float`] and [`Double`] — because the dispatch rules treat them
//! differently: narrow integrals serialize as `Int`, 64-bit integrals as
//! `Long`, and the two float widths stay apart so a round trip reproduces the
//! variant it started from.
//!
//! [`Int`]: JsonValue::Int
//! [`Long`]: JsonValue::Long
//! [`Float`]: JsonValue::Float
//! [`Double`]: JsonValue::Double
//!
//! ## Creating values
//!
//! ```rust
//! use json_auto::{json, JsonValue};
//!
//! let null = JsonValue::Null;
//! let number = JsonValue::from(42);
//! let text = JsonValue::from("hello");
//!
//! let obj = json!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(obj.is_object());
//! ```

use crate::JsonMap;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed representation of any JSON value.
///
/// # Examples
///
/// ```rust
/// use json_auto::JsonValue;
///
/// let num = JsonValue::Int(42);
/// let text = JsonValue::String("hello".to_string());
///
/// assert!(num.is_number());
/// assert!(text.is_string());
/// assert_eq!(num.as_i64(), Some(42));
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    String(String),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Array(Vec<JsonValue>),
    Object(JsonMap),
}

impl JsonValue {
    /// The distinguished zero-integer value.
    pub const ZERO: JsonValue = JsonValue::Int(0);

    /// Converts an unclassified numeric value into its best-fitting variant.
    ///
    /// If the value differs from its 64-bit integral truncation it becomes a
    /// [`Double`](JsonValue::Double); otherwise, if the 64-bit integral
    /// differs from its 32-bit truncation it becomes a
    /// [`Long`](JsonValue::Long); otherwise it becomes an
    /// [`Int`](JsonValue::Int), with [`JsonValue::ZERO`] for exactly zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_auto::JsonValue;
    ///
    /// assert_eq!(JsonValue::best_fit(5.0), JsonValue::Int(5));
    /// assert_eq!(JsonValue::best_fit(5.5), JsonValue::Double(5.5));
    /// assert_eq!(JsonValue::best_fit(1e12), JsonValue::Long(1_000_000_000_000));
    /// assert_eq!(JsonValue::best_fit(0.0), JsonValue::ZERO);
    /// ```
    #[must_use]
    pub fn best_fit(value: f64) -> JsonValue {
        let long = value as i64;
        if long as f64 != value {
            return JsonValue::Double(value);
        }
        let int = long as i32;
        if int as i64 != long {
            return JsonValue::Long(long);
        }
        if int == 0 {
            JsonValue::ZERO
        } else {
            JsonValue::Int(int)
        }
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, JsonValue::Bool(_))
    }

    /// Returns `true` if the value is any of the four numeric variants.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(
            self,
            JsonValue::Int(_) | JsonValue::Long(_) | JsonValue::Float(_) | JsonValue::Double(_)
        )
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, JsonValue::String(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    /// If the value is a boolean, returns it.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integral number, or a float with no fractional
    /// part that fits in 64 bits, returns it as an `i64`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_auto::JsonValue;
    ///
    /// assert_eq!(JsonValue::Int(42).as_i64(), Some(42));
    /// assert_eq!(JsonValue::Double(42.0).as_i64(), Some(42));
    /// assert_eq!(JsonValue::Double(42.5).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            JsonValue::Int(n) => Some(n as i64),
            JsonValue::Long(n) => Some(n),
            JsonValue::Float(f) => exact_i64(f as f64),
            JsonValue::Double(d) => exact_i64(d),
            _ => None,
        }
    }

    /// If the value is numeric, returns it as an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            JsonValue::Int(n) => Some(n as f64),
            JsonValue::Long(n) => Some(n as f64),
            JsonValue::Float(f) => Some(f as f64),
            JsonValue::Double(d) => Some(d),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<JsonValue>> {
        match self {
            JsonValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is an object, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&JsonMap> {
        match self {
            JsonValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The name of the variant, for diagnostics.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::String(_) => "string",
            JsonValue::Int(_) => "integer",
            JsonValue::Long(_) => "long",
            JsonValue::Float(_) => "float",
            JsonValue::Double(_) => "double",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }
}

fn exact_i64(value: f64) -> Option<i64> {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Null => f.write_str("null"),
            JsonValue::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            JsonValue::String(s) => write_escaped(f, s),
            JsonValue::Int(n) => write!(f, "{}", n),
            JsonValue::Long(n) => write!(f, "{}", n),
            JsonValue::Float(n) => write!(f, "{}", n),
            JsonValue::Double(n) => write!(f, "{}", n),
            JsonValue::Array(arr) => {
                f.write_str("[")?;
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            JsonValue::Object(obj) => {
                f.write_str("{")?;
                for (i, (key, value)) in obj.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_escaped(f, key)?;
                    f.write_str(":")?;
                    write!(f, "{}", value)?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{0008}' => f.write_str("\\b")?,
            '\u{000C}' => f.write_str("\\f")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<i8> for JsonValue {
    fn from(value: i8) -> Self {
        JsonValue::Int(value as i32)
    }
}

impl From<i16> for JsonValue {
    fn from(value: i16) -> Self {
        JsonValue::Int(value as i32)
    }
}

impl From<i32> for JsonValue {
    fn from(value: i32) -> Self {
        JsonValue::Int(value)
    }
}

impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        JsonValue::Long(value)
    }
}

impl From<u8> for JsonValue {
    fn from(value: u8) -> Self {
        JsonValue::Int(value as i32)
    }
}

impl From<u16> for JsonValue {
    fn from(value: u16) -> Self {
        JsonValue::Int(value as i32)
    }
}

impl From<u32> for JsonValue {
    fn from(value: u32) -> Self {
        JsonValue::Long(value as i64)
    }
}

impl From<f32> for JsonValue {
    fn from(value: f32) -> Self {
        JsonValue::Float(value)
    }
}

impl From<f64> for JsonValue {
    fn from(value: f64) -> Self {
        JsonValue::Double(value)
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(value: Vec<JsonValue>) -> Self {
        JsonValue::Array(value)
    }
}

impl From<JsonMap> for JsonValue {
    fn from(value: JsonMap) -> Self {
        JsonValue::Object(value)
    }
}

impl Serialize for JsonValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            JsonValue::Null => serializer.serialize_unit(),
            JsonValue::Bool(b) => serializer.serialize_bool(*b),
            JsonValue::String(s) => serializer.serialize_str(s),
            JsonValue::Int(n) => serializer.serialize_i32(*n),
            JsonValue::Long(n) => serializer.serialize_i64(*n),
            JsonValue::Float(n) => serializer.serialize_f32(*n),
            JsonValue::Double(n) => serializer.serialize_f64(*n),
            JsonValue::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            JsonValue::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct JsonValueVisitor;

        impl<'de> Visitor<'de> for JsonValueVisitor {
            type Value = JsonValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid JSON value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(JsonValue::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                if let Ok(int) = i32::try_from(value) {
                    Ok(JsonValue::Int(int))
                } else {
                    Ok(JsonValue::Long(value))
                }
            }

            fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<Self::Value, E> {
                if let Ok(long) = i64::try_from(value) {
                    self.visit_i64(long)
                } else {
                    Ok(JsonValue::Double(value as f64))
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(JsonValue::Double(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(JsonValue::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(JsonValue::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(JsonValue::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(JsonValue::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(JsonValue::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut values = JsonMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(JsonValue::Object(values))
            }
        }

        deserializer.deserialize_any(JsonValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_fit_plain_integer() {
        assert_eq!(JsonValue::best_fit(5.0), JsonValue::Int(5));
        assert_eq!(JsonValue::best_fit(-17.0), JsonValue::Int(-17));
    }

    #[test]
    fn best_fit_long() {
        assert_eq!(
            JsonValue::best_fit(4_000_000_000.0),
            JsonValue::Long(4_000_000_000)
        );
    }

    #[test]
    fn best_fit_double() {
        assert_eq!(JsonValue::best_fit(0.5), JsonValue::Double(0.5));
        assert_eq!(JsonValue::best_fit(1e300), JsonValue::Double(1e300));
        assert!(matches!(
            JsonValue::best_fit(f64::NAN),
            JsonValue::Double(_)
        ));
    }

    #[test]
    fn best_fit_zero_is_the_distinguished_zero() {
        assert_eq!(JsonValue::best_fit(0.0), JsonValue::ZERO);
    }

    #[test]
    fn as_i64_rejects_fractions() {
        assert_eq!(JsonValue::Double(3.0).as_i64(), Some(3));
        assert_eq!(JsonValue::Double(3.5).as_i64(), None);
        assert_eq!(JsonValue::String("3".to_string()).as_i64(), None);
    }

    #[test]
    fn display_escapes_strings() {
        let value = JsonValue::String("a\"b\\c\nd".to_string());
        assert_eq!(value.to_string(), r#""a\"b\\c\nd""#);
    }

    #[test]
    fn display_object_keeps_order() {
        let mut obj = JsonMap::new();
        obj.insert("b".to_string(), JsonValue::Int(1));
        obj.insert("a".to_string(), JsonValue::Null);
        let value = JsonValue::Object(obj);
        assert_eq!(value.to_string(), r#"{"b":1,"a":null}"#);
    }

    #[test]
    fn serde_bridge_round_trip() {
        let value: JsonValue = serde_json::from_str(r#"{"n":5,"big":4000000000,"x":1.5}"#).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.get("n"), Some(&JsonValue::Int(5)));
        assert_eq!(obj.get("big"), Some(&JsonValue::Long(4_000_000_000)));
        assert_eq!(obj.get("x"), Some(&JsonValue::Double(1.5)));

        let text = serde_json::to_string(&value).unwrap();
        let back: JsonValue = serde_json::from_str(&text).unwrap();
        assert_eq!(back, value);
    }
}
