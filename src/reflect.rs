//! The value-side reflection surface.
//!
//! [`Reflect`] is the capability every convertible type carries: it can
//! present itself to the serializer as a [`Shape`] (a closed tagged union the
//! ordered matcher chain dispatches on), describe itself to the deserializer
//! as a [`TypeDesc`](crate::TypeDesc), and optionally supply a custom
//! serialization hook. The trait replaces runtime type inspection: instead of
//! asking "what is this value?" with a chain of type tests, the engine asks
//! the value to classify itself once and then matches on the closed union.
//!
//! Implementations for the primitives, strings, standard containers and
//! `Option` live here; the well-known scalar types (dates, identifiers,
//! bit sets) are implemented next to their codecs in
//! [`codec`](crate::codec), and struct/enum types get implementations from
//! [`json_schema!`](crate::json_schema) / [`json_enum!`](crate::json_enum)
//! or by hand against the schema builder.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::{self, Display};
use std::hash::Hash;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::codec::{Year, YearMonth};
use crate::error::{Error, Result};
use crate::schema::StructSchema;
use crate::ty::{ArrayDesc, MapDesc, OptionalDesc, SeqDesc, TypeDesc, TypeKind};
use crate::value::JsonValue;

/// Upcast support to [`Any`], implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A convertible value.
///
/// The two required methods are the two directions of the engine:
/// [`shape`](Reflect::shape) classifies an existing value for the
/// serializer, [`type_desc`](Reflect::type_desc) describes the type as a
/// deserialization target. [`to_json_hook`](Reflect::to_json_hook) is the
/// serialization half of the custom-hook protocol; the deserialization half
/// rides on the descriptor (`TypeDesc::from_json`).
pub trait Reflect: AsAny {
    /// Classifies this value for the serializer's ordered matcher chain.
    fn shape(&self) -> Shape<'_>;

    /// Describes this type as a deserialization target, including the
    /// descriptors of any generic type arguments.
    fn type_desc() -> TypeDesc
    where
        Self: Sized;

    /// The type's name, for diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Custom serialization hook. A `Some` return fully replaces generic
    /// dispatch for this value; the default declares no hook.
    fn to_json_hook(&self) -> Option<Result<JsonValue>> {
        None
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.type_name())
    }
}

/// Unboxes a dynamically-typed value into its concrete type.
///
/// Container build functions and the typed entry points use this to recover
/// concrete values from the engine's `Box<dyn Reflect>` results.
pub fn take<T: Reflect>(value: Box<dyn Reflect>) -> Result<T> {
    let name = value.type_name();
    match value.into_any().downcast::<T>() {
        Ok(boxed) => Ok(*boxed),
        Err(_) => Err(Error::structure(format!(
            "expected {}, found {}",
            std::any::type_name::<T>(),
            name
        ))),
    }
}

/// The closed union of value classifications the serializer matches on.
///
/// The variants are ordered here the way the matcher chain consults them;
/// the custom hook is offered between [`Shape::Array`] and [`Shape::Enum`].
pub enum Shape<'a> {
    /// Already a JSON value; passes through unchanged.
    Json(&'a JsonValue),
    /// Character-sequence-like.
    Str(&'a str),
    /// Narrow integral (fits the 32-bit JSON integer).
    Int(i32),
    /// 64-bit integral.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Unclassified numeric; serializes through the best-fit rule.
    Number(f64),
    Bool(bool),
    Char(char),
    /// A character array; serializes as the concatenated string.
    Chars(&'a [char]),
    /// A fixed-size array.
    Array(Vec<&'a dyn Reflect>),
    /// An enum value's symbolic variant name.
    Enum(&'static str),
    /// An ordered or unordered collection, in natural iteration order.
    Seq(Vec<&'a dyn Reflect>),
    /// A key-value map; keys already stringified.
    Map(Vec<(String, &'a dyn Reflect)>),
    /// A well-known scalar handled by the codec table.
    Scalar(Scalar<'a>),
    /// An optional wrapper.
    Optional(Option<&'a dyn Reflect>),
    /// Field-by-field object mapping through the registered schema.
    Struct(&'static StructSchema),
}

/// Scalar values with fixed codec-table entries.
pub enum Scalar<'a> {
    DateTime(chrono::DateTime<chrono::FixedOffset>),
    Timestamp(std::time::SystemTime),
    Instant(chrono::DateTime<chrono::Utc>),
    LocalDate(chrono::NaiveDate),
    LocalDateTime(chrono::NaiveDateTime),
    LocalTime(chrono::NaiveTime),
    Year(Year),
    YearMonth(YearMonth),
    Uuid(uuid::Uuid),
    Bits(&'a fixedbitset::FixedBitSet),
}

/// A character array.
///
/// `Vec<char>` reflects as an ordinary sequence; this newtype is the
/// character-*array* classification, which serializes as a single
/// concatenated JSON string and deserializes from one.
///
/// # Examples
///
/// ```rust
/// use json_auto::{to_json, CharArray, JsonValue};
///
/// let chars = CharArray::from("abc");
/// assert_eq!(to_json(&chars).unwrap(), JsonValue::from("abc"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharArray(pub Vec<char>);

impl From<&str> for CharArray {
    fn from(value: &str) -> Self {
        CharArray(value.chars().collect())
    }
}

impl From<String> for CharArray {
    fn from(value: String) -> Self {
        CharArray(value.chars().collect())
    }
}

impl Display for CharArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.0 {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

impl Reflect for CharArray {
    fn shape(&self) -> Shape<'_> {
        Shape::Chars(&self.0)
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new("CharArray", TypeKind::CharArray)
    }
}

impl Reflect for JsonValue {
    fn shape(&self) -> Shape<'_> {
        Shape::Json(self)
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new("JsonValue", TypeKind::Json)
    }
}

/// Single-string construction through `FromStr`, the Rust rendering of a
/// one-string-argument constructor.
fn parse_text<T>(s: &str) -> Result<Box<dyn Reflect>>
where
    T: Reflect + FromStr,
    T::Err: Display,
{
    match s.parse::<T>() {
        Ok(value) => Ok(Box::new(value)),
        Err(err) => Err(Error::data(format!(
            "can't parse {:?} as {}: {}",
            s,
            std::any::type_name::<T>(),
            err
        ))),
    }
}

macro_rules! reflect_integral {
    ($($ty:ty => $kind:ident, $shape:ident as $repr:ty;)*) => {
        $(
            impl Reflect for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::$shape(*self as $repr)
                }

                fn type_desc() -> TypeDesc {
                    TypeDesc::new(stringify!($ty), TypeKind::$kind)
                        .with_from_string(parse_text::<$ty>)
                }
            }
        )*
    };
}

reflect_integral! {
    i8  => I8,  Int as i32;
    i16 => I16, Int as i32;
    i32 => I32, Int as i32;
    i64 => I64, Long as i64;
    u8  => U8,  Int as i32;
    u16 => U16, Int as i32;
    u32 => U32, Long as i64;
    f32 => F32, Float as f32;
    f64 => F64, Double as f64;
}

impl Reflect for u64 {
    fn shape(&self) -> Shape<'_> {
        if *self <= i64::MAX as u64 {
            Shape::Long(*self as i64)
        } else {
            Shape::Number(*self as f64)
        }
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new("u64", TypeKind::U64).with_from_string(parse_text::<u64>)
    }
}

impl Reflect for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Bool(*self)
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new("bool", TypeKind::Bool).with_from_string(parse_text::<bool>)
    }
}

impl Reflect for char {
    fn shape(&self) -> Shape<'_> {
        Shape::Char(*self)
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new("char", TypeKind::Char)
    }
}

impl Reflect for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Str(self)
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new("String", TypeKind::String)
    }
}

fn build_vec<T: Reflect>(items: Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(take::<T>(item)?);
    }
    Ok(Box::new(out))
}

fn build_deque<T: Reflect>(items: Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>> {
    let mut out = VecDeque::with_capacity(items.len());
    for item in items {
        out.push_back(take::<T>(item)?);
    }
    Ok(Box::new(out))
}

fn build_array<T: Reflect, const N: usize>(
    items: Vec<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>> {
    let found = items.len();
    let mut out = Vec::with_capacity(found);
    for item in items {
        out.push(take::<T>(item)?);
    }
    match <[T; N]>::try_from(out) {
        Ok(array) => Ok(Box::new(array)),
        Err(_) => Err(Error::data(format!(
            "expected {} elements, found {}",
            N, found
        ))),
    }
}

fn build_hash_set<T: Reflect + Eq + Hash>(
    items: Vec<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>> {
    let mut out = HashSet::with_capacity(items.len());
    for item in items {
        out.insert(take::<T>(item)?);
    }
    Ok(Box::new(out))
}

fn build_btree_set<T: Reflect + Ord>(items: Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>> {
    let mut out = BTreeSet::new();
    for item in items {
        out.insert(take::<T>(item)?);
    }
    Ok(Box::new(out))
}

fn build_hash_map<K, V>(entries: Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>) -> Result<Box<dyn Reflect>>
where
    K: Reflect + Display + Eq + Hash,
    V: Reflect,
{
    let mut out = HashMap::with_capacity(entries.len());
    for (key, value) in entries {
        out.insert(take::<K>(key)?, take::<V>(value)?);
    }
    Ok(Box::new(out))
}

fn build_btree_map<K, V>(entries: Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>) -> Result<Box<dyn Reflect>>
where
    K: Reflect + Display + Ord,
    V: Reflect,
{
    let mut out = BTreeMap::new();
    for (key, value) in entries {
        out.insert(take::<K>(key)?, take::<V>(value)?);
    }
    Ok(Box::new(out))
}

fn build_index_map<K, V>(entries: Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>) -> Result<Box<dyn Reflect>>
where
    K: Reflect + Display + Eq + Hash,
    V: Reflect,
{
    let mut out = IndexMap::with_capacity(entries.len());
    for (key, value) in entries {
        out.insert(take::<K>(key)?, take::<V>(value)?);
    }
    Ok(Box::new(out))
}

fn wrap_option<T: Reflect>(value: Option<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>> {
    Ok(Box::new(match value {
        Some(inner) => Some(take::<T>(inner)?),
        None => None::<T>,
    }))
}

impl<T: Reflect> Reflect for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self.iter().map(|item| item as &dyn Reflect).collect())
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new(
            std::any::type_name::<Self>(),
            TypeKind::List(SeqDesc {
                item: Box::new(T::type_desc()),
                build: build_vec::<T>,
            }),
        )
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self.iter().map(|item| item as &dyn Reflect).collect())
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new(
            std::any::type_name::<Self>(),
            TypeKind::List(SeqDesc {
                item: Box::new(T::type_desc()),
                build: build_deque::<T>,
            }),
        )
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn shape(&self) -> Shape<'_> {
        Shape::Array(self.iter().map(|item| item as &dyn Reflect).collect())
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new(
            std::any::type_name::<Self>(),
            TypeKind::Array(ArrayDesc {
                item: Box::new(T::type_desc()),
                len: N,
                build: build_array::<T, N>,
            }),
        )
    }
}

impl<T: Reflect + Eq + Hash> Reflect for HashSet<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self.iter().map(|item| item as &dyn Reflect).collect())
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new(
            std::any::type_name::<Self>(),
            TypeKind::Set(SeqDesc {
                item: Box::new(T::type_desc()),
                build: build_hash_set::<T>,
            }),
        )
    }
}

impl<T: Reflect + Ord> Reflect for BTreeSet<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self.iter().map(|item| item as &dyn Reflect).collect())
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new(
            std::any::type_name::<Self>(),
            TypeKind::Set(SeqDesc {
                item: Box::new(T::type_desc()),
                build: build_btree_set::<T>,
            }),
        )
    }
}

impl<K, V> Reflect for HashMap<K, V>
where
    K: Reflect + Display + Eq + Hash,
    V: Reflect,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(k, v)| (k.to_string(), v as &dyn Reflect))
                .collect(),
        )
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new(
            std::any::type_name::<Self>(),
            TypeKind::Map(MapDesc {
                key: Box::new(K::type_desc()),
                value: Box::new(V::type_desc()),
                build: build_hash_map::<K, V>,
            }),
        )
    }
}

impl<K, V> Reflect for BTreeMap<K, V>
where
    K: Reflect + Display + Ord,
    V: Reflect,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(k, v)| (k.to_string(), v as &dyn Reflect))
                .collect(),
        )
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new(
            std::any::type_name::<Self>(),
            TypeKind::Map(MapDesc {
                key: Box::new(K::type_desc()),
                value: Box::new(V::type_desc()),
                build: build_btree_map::<K, V>,
            }),
        )
    }
}

impl<K, V> Reflect for IndexMap<K, V>
where
    K: Reflect + Display + Eq + Hash,
    V: Reflect,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(k, v)| (k.to_string(), v as &dyn Reflect))
                .collect(),
        )
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new(
            std::any::type_name::<Self>(),
            TypeKind::Map(MapDesc {
                key: Box::new(K::type_desc()),
                value: Box::new(V::type_desc()),
                build: build_index_map::<K, V>,
            }),
        )
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Optional(self.as_ref().map(|inner| inner as &dyn Reflect))
    }

    fn type_desc() -> TypeDesc {
        TypeDesc::new(
            std::any::type_name::<Self>(),
            TypeKind::Optional(OptionalDesc {
                inner: Box::new(T::type_desc()),
                wrap: wrap_option::<T>,
            }),
        )
    }
}
