//! # json_auto
//!
//! Automatic, schema-driven conversion between Rust values and a generic
//! JSON value tree — no per-type mapping code, no text parsing, just a pair
//! of type-directed dispatchers over [`JsonValue`].
//!
//! ## How it works
//!
//! Every convertible type carries the [`Reflect`] capability: it can
//! classify a value as a [`Shape`] for the serializer and describe itself as
//! a [`TypeDesc`] for the deserializer. Struct types additionally register a
//! [`StructSchema`] — an ordered list of field descriptors with naming
//! flags and getter/setter access — once per type, via the
//! [`json_schema!`] macro or the builder API. Both dispatchers walk an
//! ordered rule chain in which exactly one rule applies to any input, and
//! recurse into themselves for nested values; generic type arguments travel
//! inside the descriptors, so a `HashMap<String, Vec<Option<i32>>>` needs no
//! annotations at all.
//!
//! ## Quick start
//!
//! ```rust
//! use json_auto::{from_json, json, json_schema, to_json};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct User {
//!     id: i64,
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! json_schema! {
//!     User {
//!         id: i64,
//!         name: String,
//!         tags: Vec<String>,
//!     }
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     tags: vec!["admin".to_string()],
//! };
//!
//! let json = to_json(&user).unwrap();
//! assert_eq!(json, json!({"id": 123i64, "name": "Alice", "tags": ["admin"]}));
//!
//! let back: User = from_json(&json).unwrap();
//! assert_eq!(back, user);
//! ```
//!
//! ## Field annotations
//!
//! Schema flags control the JSON mapping per field: `[rename = "other"]`
//! changes the member name, `[ignore]` drops the field in both directions,
//! and `[always]` writes an explicit null for an absent `Option` instead of
//! omitting the member.
//!
//! ## Custom hooks
//!
//! A type can take over its own conversion entirely by declaring inherent
//! `to_json`/`from_json` methods and registering with
//! `json_schema! { Type [hooked] { ... } }`. Presence of a hook replaces
//! generic dispatch for that type on that side; everything the hook cannot
//! express simply stays with the generic rules.
//!
//! ## Well-known scalars
//!
//! The codec table in [`codec`] converts chrono's temporal types,
//! `SystemTime`, `uuid::Uuid` and `fixedbitset::FixedBitSet` (plus the
//! in-crate [`Year`]/[`YearMonth`]) to and from their canonical JSON forms.
//!
//! ## Scope
//!
//! The crate converts between values and the [`JsonValue`] tree; it does not
//! parse or print JSON text. [`JsonValue`] implements serde's
//! `Serialize`/`Deserialize`, so any serde text format — `serde_json` in
//! particular — moves trees across the text boundary.
//!
//! ## Concurrency
//!
//! Conversion is synchronous recursive descent with no shared mutable
//! state: schemas are immutable after their one-time registration, and all
//! other descriptors are stack-local. Concurrent calls over disjoint data
//! need no locking.

pub mod codec;
pub mod de;
pub mod error;
pub mod macros;
pub mod map;
pub mod reflect;
pub mod schema;
pub mod ser;
pub mod ty;
pub mod value;

pub use codec::{Year, YearMonth};
pub use de::{deserialize_dyn, deserialize_string};
pub use error::{Error, Result};
pub use map::JsonMap;
pub use reflect::{take, AsAny, CharArray, Reflect, Scalar, Shape};
pub use schema::{find_field, Describe, EnumSchema, FieldDef, ParentDef, StructSchema};
pub use ser::{serialize, serialize_fields};
pub use ty::{
    ArrayDesc, MapDesc, OptionalDesc, ScalarKind, SeqDesc, TypeDesc, TypeKind,
};
pub use value::JsonValue;

/// Creates the JSON representation of any convertible value.
///
/// Typed convenience over [`serialize`].
///
/// # Examples
///
/// ```rust
/// use json_auto::{to_json, JsonValue};
///
/// assert_eq!(to_json(&5i32).unwrap(), JsonValue::Int(5));
/// assert_eq!(to_json(&None::<String>).unwrap(), JsonValue::Null);
/// ```
///
/// # Errors
///
/// Returns an error if a custom hook fails or a nested value cannot be
/// serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json<T: Reflect>(value: &T) -> Result<JsonValue> {
    ser::serialize(value)
}

/// Deserializes a JSON value into a concrete type.
///
/// Typed convenience over [`deserialize_dyn`]: builds `T`'s descriptor,
/// runs the dispatcher, and unboxes the result. A JSON null is only
/// accepted when `T` is an `Option`.
///
/// # Examples
///
/// ```rust
/// use json_auto::{from_json, JsonValue};
///
/// let n: i32 = from_json(&JsonValue::Int(5)).unwrap();
/// assert_eq!(n, 5);
///
/// let absent: Option<i32> = from_json(&JsonValue::Null).unwrap();
/// assert_eq!(absent, None);
///
/// assert!(from_json::<i32>(&JsonValue::Null).is_err());
/// ```
///
/// # Errors
///
/// Returns an error when the JSON value does not fit `T` under the ordered
/// dispatch rules.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_json<T: Reflect>(json: &JsonValue) -> Result<T> {
    let desc = T::type_desc();
    match de::deserialize_dyn(&desc, json)? {
        Some(value) => take::<T>(value),
        None => Err(Error::data(format!(
            "JSON null cannot be deserialized as {}",
            desc.name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_nested_generic_container() {
        use std::collections::HashMap;

        let mut value: HashMap<String, Vec<Option<i32>>> = HashMap::new();
        value.insert("a".to_string(), vec![Some(1), None, Some(3)]);

        let json = to_json(&value).unwrap();
        let back: HashMap<String, Vec<Option<i32>>> = from_json(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn from_json_rejects_null_for_non_optional_targets() {
        let err = from_json::<String>(&JsonValue::Null).unwrap_err();
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn json_value_passes_through_both_ways() {
        let original = json!({"k": [1, 2]});
        let serialized = to_json(&original).unwrap();
        assert_eq!(serialized, original);
        let back: JsonValue = from_json(&serialized).unwrap();
        assert_eq!(back, original);
    }
}
