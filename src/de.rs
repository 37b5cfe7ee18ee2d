//! JSON-to-object deserialization.
//!
//! [`deserialize_dyn`] applies the ordered rules against a target
//! [`TypeDesc`] and a JSON value. Optional targets come first and are the
//! only targets that tolerate a JSON null for themselves; a null against any
//! other target yields the engine's null result, `Ok(None)`. After the
//! pass-through and custom-hook rules, dispatch follows the JSON variant
//! class: string, number, boolean, array or object, each with its own
//! sub-dispatch on the target kind.
//!
//! Numeric narrowing is range-checked: a JSON number that does not fit the
//! integral target exactly is a data error, never a silent truncation. A
//! floating JSON value converts to an integral target only when it holds an
//! exact in-range integral value.
//!
//! Generic type arguments never need recovering here: every container
//! descriptor already embeds the descriptors of its arguments, so recursive
//! calls simply thread them through.

use crate::codec;
use crate::error::{Error, Result};
use crate::map::JsonMap;
use crate::reflect::{CharArray, Reflect};
use crate::schema::StructSchema;
use crate::ty::{ScalarKind, TypeDesc, TypeKind};
use crate::value::JsonValue;

/// Deserializes a JSON value against a target type descriptor.
///
/// Returns `Ok(None)` for a JSON null against a non-optional target — the
/// dynamic rendering of a null result. Typed callers should use
/// [`from_json`](crate::from_json), which turns that case into an error for
/// types that cannot hold one.
///
/// # Errors
///
/// Returns an error when the JSON variant has no rule for the target kind,
/// when a value does not fit the target (range, arity, unknown enum
/// variant), or when a custom hook fails.
pub fn deserialize_dyn(ty: &TypeDesc, json: &JsonValue) -> Result<Option<Box<dyn Reflect>>> {
    // optional targets, ahead of the null check: absence becomes None
    if let TypeKind::Optional(opt) = &ty.kind {
        let inner = deserialize_dyn(&opt.inner, json)?;
        return Ok(Some((opt.wrap)(inner)?));
    }

    if json.is_null() {
        return Ok(None);
    }

    if let TypeKind::Json = ty.kind {
        return Ok(Some(Box::new(json.clone())));
    }

    // the custom hook owns everything below
    if let Some(hook) = ty.from_json {
        return match hook(json) {
            Ok(value) => Ok(Some(value)),
            Err(err) => Err(Error::hook(ty.name, err)),
        };
    }

    match json {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => deserialize_string(ty, s).map(Some),
        JsonValue::Int(_) | JsonValue::Long(_) | JsonValue::Float(_) | JsonValue::Double(_) => {
            deserialize_number(ty, json).map(Some)
        }
        JsonValue::Bool(b) => match ty.kind {
            TypeKind::Bool => Ok(Some(Box::new(*b))),
            _ => Err(Error::data(format!(
                "can't deserialize boolean as {}",
                ty.name
            ))),
        },
        JsonValue::Array(items) => deserialize_array(ty, items).map(Some),
        JsonValue::Object(object) => deserialize_object(ty, object).map(Some),
    }
}

/// Deserializes a string against a target type descriptor: the string
/// sub-dispatch, also used for map keys.
///
/// The final rule is the descriptor's single-string constructor, which
/// covers value-holder types and the primitive targets (whose descriptors
/// carry their `FromStr` parse).
pub fn deserialize_string(ty: &TypeDesc, s: &str) -> Result<Box<dyn Reflect>> {
    match &ty.kind {
        TypeKind::String => Ok(Box::new(s.to_owned())),
        TypeKind::Char => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Box::new(c)),
                _ => Err(Error::data(format!(
                    "a character must be a string of length 1, found {:?}",
                    s
                ))),
            }
        }
        TypeKind::CharArray => Ok(Box::new(CharArray(s.chars().collect()))),
        TypeKind::Scalar(kind) => codec::parse(*kind, s),
        TypeKind::Enum(schema) => schema.from_name(s).ok_or_else(|| {
            Error::data(format!("{} has no variant named {:?}", schema.name(), s))
        }),
        _ => match ty.from_string {
            Some(ctor) => ctor(s),
            None => Err(Error::data(format!(
                "can't deserialize string as {}",
                ty.name
            ))),
        },
    }
}

fn deserialize_number(ty: &TypeDesc, json: &JsonValue) -> Result<Box<dyn Reflect>> {
    match ty.kind {
        TypeKind::I8 => integral::<i8>(ty, json),
        TypeKind::I16 => integral::<i16>(ty, json),
        TypeKind::I32 => integral::<i32>(ty, json),
        TypeKind::I64 => integral::<i64>(ty, json),
        TypeKind::U8 => integral::<u8>(ty, json),
        TypeKind::U16 => integral::<u16>(ty, json),
        TypeKind::U32 => integral::<u32>(ty, json),
        TypeKind::U64 => integral::<u64>(ty, json),
        TypeKind::F32 => Ok(Box::new(codec::json_to_f64(json)? as f32)),
        TypeKind::F64 => Ok(Box::new(codec::json_to_f64(json)?)),
        _ => Err(Error::data(format!(
            "can't deserialize number as {}",
            ty.name
        ))),
    }
}

fn integral<T>(ty: &TypeDesc, json: &JsonValue) -> Result<Box<dyn Reflect>>
where
    T: Reflect + TryFrom<i64>,
{
    let wide = codec::json_to_i64(json)?;
    match T::try_from(wide) {
        Ok(value) => Ok(Box::new(value)),
        Err(_) => Err(Error::data(format!(
            "{} is out of range for {}",
            wide, ty.name
        ))),
    }
}

fn deserialize_array(ty: &TypeDesc, items: &[JsonValue]) -> Result<Box<dyn Reflect>> {
    match &ty.kind {
        TypeKind::List(seq) | TypeKind::Set(seq) => {
            (seq.build)(deserialize_items(&seq.item, items)?)
        }
        TypeKind::Array(array) => {
            if items.len() != array.len {
                return Err(Error::data(format!(
                    "{} expects {} elements, found {}",
                    ty.name,
                    array.len,
                    items.len()
                )));
            }
            (array.build)(deserialize_items(&array.item, items)?)
        }
        TypeKind::Scalar(ScalarKind::Bits) => codec::bits_from_indices(items),
        _ => Err(Error::data(format!(
            "can't deserialize array as {}",
            ty.name
        ))),
    }
}

fn deserialize_items(item: &TypeDesc, items: &[JsonValue]) -> Result<Vec<Box<dyn Reflect>>> {
    let mut out = Vec::with_capacity(items.len());
    for value in items {
        match deserialize_dyn(item, value)? {
            Some(element) => out.push(element),
            None => {
                return Err(Error::data(format!(
                    "null element for non-optional item type {}",
                    item.name
                )))
            }
        }
    }
    Ok(out)
}

fn deserialize_object(ty: &TypeDesc, object: &JsonMap) -> Result<Box<dyn Reflect>> {
    match &ty.kind {
        TypeKind::Map(map) => {
            let mut entries = Vec::with_capacity(object.len());
            for (name, value) in object.iter() {
                let key = deserialize_string(&map.key, name)?;
                let value = deserialize_dyn(&map.value, value)?.ok_or_else(|| {
                    Error::data(format!(
                        "null value for non-optional map value type {}",
                        map.value.name
                    ))
                })?;
                entries.push((key, value));
            }
            (map.build)(entries)
        }
        TypeKind::Struct(schema) => deserialize_struct(schema, object),
        _ => Err(Error::data(format!(
            "can't deserialize object as {}",
            ty.name
        ))),
    }
}

fn deserialize_struct(schema: &StructSchema, object: &JsonMap) -> Result<Box<dyn Reflect>> {
    let mut instance = schema.make_instance();
    for (name, value) in object.iter() {
        assign_field(schema, instance.as_mut(), name, value)?;
    }
    Ok(instance)
}

/// Resolves one JSON member against the schema chain and assigns it.
///
/// Resolution is declaring-schema-first: own fields by rename, own fields by
/// literal name, then the parent chain with the instance projected to its
/// embedded parent.
fn assign_field(
    schema: &StructSchema,
    instance: &mut dyn Reflect,
    name: &str,
    json: &JsonValue,
) -> Result<()> {
    if let Some(field) = schema.find_own(name) {
        if field.is_ignored() {
            return Err(Error::structure(format!(
                "can't assign ignored field {}.{}",
                schema.name(),
                field.name()
            )));
        }
        let desc = field.type_desc();
        match deserialize_dyn(&desc, json)? {
            Some(value) => field.set(instance, value),
            None => Err(Error::data(format!(
                "null value for non-optional field {}.{}",
                schema.name(),
                field.name()
            ))),
        }
    } else if let Some(parent) = schema.parent_def() {
        assign_field(parent.schema(), parent.project_mut(instance)?, name, json)
    } else {
        Err(Error::structure(format!(
            "no field in {} matches key {:?}",
            schema.name(),
            name
        )))
    }
}
