//! Shared fixture types for the integration tests.

#![allow(dead_code)]

use std::sync::OnceLock;

use json_auto::{
    json, json_enum, json_schema, Describe, Error, FieldDef, JsonValue, Reflect, Result, Shape,
    StructSchema, TypeDesc, TypeKind,
};

#[derive(Debug, Default, PartialEq, Clone)]
pub struct Simple {
    pub string1: String,
    pub int1: i32,
}

json_schema! {
    Simple {
        string1: String,
        int1: i32,
    }
}

#[derive(Debug, Default, PartialEq, Clone)]
pub struct Nested {
    pub string1: String,
    pub integer1: Option<i32>,
    pub inner1: Option<Simple>,
    pub array1: Vec<i32>,
}

json_schema! {
    Nested {
        string1: String,
        integer1: Option<i32>,
        inner1: Option<Simple>,
        array1: Vec<i32>,
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Renamed {
    pub int1: i32,
}

json_schema! {
    Renamed {
        int1[rename = "fred"]: i32,
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct PartlyHidden {
    pub kept: i32,
    pub secret: String,
}

json_schema! {
    PartlyHidden {
        kept: i32,
        secret[ignore]: String,
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct MaybeNamed {
    pub value1: Option<String>,
}

json_schema! {
    MaybeNamed {
        value1: Option<String>,
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct AlwaysNamed {
    pub value1: Option<String>,
}

json_schema! {
    AlwaysNamed {
        value1[always]: Option<String>,
    }
}

/// Stores an integer but converts through a `{"dec", "hex"}` object pair,
/// cross-checking the two encodings on the way back in.
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct DecHex {
    pub int1: i32,
}

impl DecHex {
    fn to_json(&self) -> Result<JsonValue> {
        Ok(json!({
            "dec": (self.int1.to_string()),
            "hex": (format!("{:X}", self.int1))
        }))
    }

    fn from_json(json: &JsonValue) -> Result<DecHex> {
        let object = json
            .as_object()
            .ok_or_else(|| Error::data("expected an object"))?;
        let dec = object
            .get("dec")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| Error::data("missing \"dec\""))?;
        let hex = object
            .get("hex")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| Error::data("missing \"hex\""))?;
        let dec: i32 = dec
            .parse()
            .map_err(|_| Error::data("\"dec\" is not a decimal integer"))?;
        let from_hex = i32::from_str_radix(hex, 16)
            .map_err(|_| Error::data("\"hex\" is not a hex integer"))?;
        if dec != from_hex {
            return Err(Error::data("inconsistent values"));
        }
        Ok(DecHex { int1: dec })
    }
}

json_schema! {
    DecHex [hooked] {
        int1: i32,
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Blue,
}

json_enum! {
    Color { Red, Green, Blue }
}

#[derive(Debug, Default, PartialEq)]
pub struct Base {
    pub a: i32,
}

json_schema! {
    Base {
        a: i32,
    }
}

/// Extends `Base` through an embedded parent: `a` serializes before `b`,
/// and field lookup searches `Sub` before `Base`.
#[derive(Debug, Default, PartialEq)]
pub struct Sub {
    pub base: Base,
    pub b: i32,
}

impl Describe for Sub {
    fn schema() -> &'static StructSchema {
        static SCHEMA: OnceLock<StructSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            StructSchema::new::<Sub>("Sub")
                .parent::<Sub, Base>(|s| &s.base, |s| &mut s.base)
                .field(FieldDef::new::<Sub, i32>("b", |s| &s.b, |s, v| s.b = v))
        })
    }
}

impl Reflect for Sub {
    fn shape(&self) -> Shape<'_> {
        Shape::Struct(<Sub as Describe>::schema())
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::structure(<Sub as Describe>::schema())
    }
}

/// A single-string value holder: serializes as its text, deserializes
/// through its string constructor.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct Tag(pub String);

impl Reflect for Tag {
    fn shape(&self) -> Shape<'_> {
        Shape::Str(&self.0)
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new("Tag", TypeKind::Opaque)
            .with_from_string(|s| Ok(Box::new(Tag(s.to_string()))))
    }
}

/// An unclassified numeric wrapper: serializes through the best-fit rule.
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct Amount(pub f64);

impl Reflect for Amount {
    fn shape(&self) -> Shape<'_> {
        Shape::Number(self.0)
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new("Amount", TypeKind::Opaque)
    }
}
