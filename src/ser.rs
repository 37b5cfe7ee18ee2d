//! Object-to-JSON serialization.
//!
//! [`serialize`] is the ordered matcher chain: the value classifies itself
//! once as a [`Shape`] and exactly one rule applies. The plain shapes —
//! pass-through JSON, strings, numbers, booleans, characters, character
//! arrays and fixed-size arrays — convert directly. Every structured shape
//! first offers the value's custom hook a chance to own the conversion;
//! only when no hook is declared do the generic rules for enums,
//! collections, maps, scalars, optionals and field-mapped objects run.
//!
//! Field-by-field object mapping walks a schema's embedded-parent chain
//! before its own fields, so parent members always precede the declaring
//! type's members in the output, and applies the field flags: ignored
//! fields never appear, absent optionals are omitted unless the field is
//! marked always-emit, in which case an explicit null is written.

use crate::codec;
use crate::error::{Error, Result};
use crate::map::JsonMap;
use crate::reflect::{Reflect, Shape};
use crate::schema::StructSchema;
use crate::value::JsonValue;

/// Creates the JSON representation of any convertible value.
///
/// # Examples
///
/// ```rust
/// use json_auto::{serialize, JsonValue};
///
/// assert_eq!(serialize(&5i32).unwrap(), JsonValue::Int(5));
/// assert_eq!(serialize(&true).unwrap(), JsonValue::Bool(true));
/// assert_eq!(
///     serialize(&vec![1i32, 2, 3]).unwrap(),
///     JsonValue::Array(vec![
///         JsonValue::Int(1),
///         JsonValue::Int(2),
///         JsonValue::Int(3),
///     ])
/// );
/// ```
///
/// # Errors
///
/// Returns an error if a custom hook fails or a nested value cannot be
/// serialized.
pub fn serialize(value: &dyn Reflect) -> Result<JsonValue> {
    match value.shape() {
        Shape::Json(json) => Ok(json.clone()),
        Shape::Str(s) => Ok(JsonValue::String(s.to_owned())),
        Shape::Int(n) => Ok(JsonValue::Int(n)),
        Shape::Long(n) => Ok(JsonValue::Long(n)),
        Shape::Float(n) => Ok(JsonValue::Float(n)),
        Shape::Double(n) => Ok(JsonValue::Double(n)),
        Shape::Number(n) => Ok(JsonValue::best_fit(n)),
        Shape::Bool(b) => Ok(JsonValue::Bool(b)),
        Shape::Char(c) => Ok(JsonValue::String(c.to_string())),
        Shape::Chars(chars) => Ok(JsonValue::String(chars.iter().collect())),
        Shape::Array(items) => serialize_elements(&items),
        Shape::Enum(name) => with_hook(value, || Ok(JsonValue::String(name.to_owned()))),
        Shape::Seq(items) => with_hook(value, || serialize_elements(&items)),
        Shape::Map(entries) => with_hook(value, || serialize_entries(&entries)),
        Shape::Scalar(scalar) => with_hook(value, || Ok(codec::encode(&scalar))),
        Shape::Optional(inner) => with_hook(value, || match inner {
            Some(present) => serialize(present),
            None => Ok(JsonValue::Null),
        }),
        Shape::Struct(schema) => with_hook(value, || {
            let mut object = JsonMap::new();
            add_fields(&mut object, schema, value)?;
            Ok(JsonValue::Object(object))
        }),
    }
}

/// Serializes a value's fields into a JSON object, bypassing every other
/// rule including the custom hook. Only field-mapped (schema-carrying)
/// values qualify.
pub fn serialize_fields(value: &dyn Reflect) -> Result<JsonValue> {
    match value.shape() {
        Shape::Struct(schema) => {
            let mut object = JsonMap::new();
            add_fields(&mut object, schema, value)?;
            Ok(JsonValue::Object(object))
        }
        _ => Err(Error::structure(format!(
            "{} has no field schema",
            value.type_name()
        ))),
    }
}

fn with_hook(
    value: &dyn Reflect,
    fallback: impl FnOnce() -> Result<JsonValue>,
) -> Result<JsonValue> {
    match value.to_json_hook() {
        Some(Ok(json)) => Ok(json),
        Some(Err(err)) => Err(Error::hook(value.type_name(), err)),
        None => fallback(),
    }
}

fn serialize_elements(items: &[&dyn Reflect]) -> Result<JsonValue> {
    let mut array = Vec::with_capacity(items.len());
    for item in items {
        array.push(serialize(*item)?);
    }
    Ok(JsonValue::Array(array))
}

fn serialize_entries(entries: &[(String, &dyn Reflect)]) -> Result<JsonValue> {
    let mut object = JsonMap::with_capacity(entries.len());
    for (key, value) in entries {
        object.insert(key.clone(), serialize(*value)?);
    }
    Ok(JsonValue::Object(object))
}

fn add_fields(object: &mut JsonMap, schema: &StructSchema, value: &dyn Reflect) -> Result<()> {
    if let Some(parent) = schema.parent_def() {
        add_fields(object, parent.schema(), parent.project(value)?)?;
    }
    for field in schema.fields() {
        if field.is_ignored() {
            continue;
        }
        let key = field.json_name();
        let field_value = field.get(value)?;
        match field_value.shape() {
            Shape::Optional(Some(present)) => {
                object.insert(key.to_owned(), serialize(present)?);
            }
            Shape::Optional(None) => {
                if field.is_always() {
                    object.insert(key.to_owned(), JsonValue::Null);
                }
            }
            _ => {
                object.insert(key.to_owned(), serialize(field_value)?);
            }
        }
    }
    Ok(())
}
