//! Runtime type descriptors.
//!
//! A [`TypeDesc`] tells the deserializer what to build. It is the explicit,
//! recursive rendering of a possibly-generic target type: a container
//! descriptor embeds the descriptors of its type arguments, so every nested
//! `deserialize` call receives complete type information without any runtime
//! type lookup.
//!
//! Descriptors are produced by [`Reflect::type_desc`](crate::Reflect::type_desc)
//! implementations, which are monomorphized — the point where static type
//! information exists. The descriptor itself is transient: it is built fresh
//! per call and lives on the stack for the duration of one conversion. The
//! expensive part of a struct descriptor, the ordered field list, sits behind
//! it as a `&'static` [`StructSchema`](crate::StructSchema) built once per
//! type.
//!
//! Container descriptors also carry a monomorphized build function. This is
//! how the dynamically-dispatched engine can produce a concrete `Vec<T>`,
//! `HashMap<K, V>` or `Option<T>`: the element values travel as
//! `Box<dyn Reflect>` and the build function downcasts and assembles them.

use crate::error::Result;
use crate::reflect::Reflect;
use crate::schema::{EnumSchema, StructSchema};
use crate::value::JsonValue;

/// A custom deserialization hook: builds an instance from a JSON value.
pub type FromJsonFn = fn(&JsonValue) -> Result<Box<dyn Reflect>>;

/// A single-string constructor, the textual fallback of string dispatch.
pub type FromStringFn = fn(&str) -> Result<Box<dyn Reflect>>;

/// Assembles a sequence container from deserialized elements.
pub type BuildSeqFn = fn(Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>>;

/// Assembles a map container from deserialized key-value pairs.
pub type BuildMapFn = fn(Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>) -> Result<Box<dyn Reflect>>;

/// Wraps a deserialized inner value (or its absence) into an optional.
pub type WrapOptionFn = fn(Option<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>>;

/// The recursive descriptor of a deserialization target type.
pub struct TypeDesc {
    pub name: &'static str,
    pub kind: TypeKind,
    /// Custom deserialization hook; when present it owns the whole
    /// conversion for this type.
    pub from_json: Option<FromJsonFn>,
    /// Optional single-string constructor used as the last rule of string
    /// dispatch.
    pub from_string: Option<FromStringFn>,
}

impl TypeDesc {
    /// Creates a descriptor with no hooks.
    #[must_use]
    pub fn new(name: &'static str, kind: TypeKind) -> Self {
        TypeDesc {
            name,
            kind,
            from_json: None,
            from_string: None,
        }
    }

    /// Creates a descriptor for a scalar codec kind.
    #[must_use]
    pub fn scalar(name: &'static str, kind: ScalarKind) -> Self {
        TypeDesc::new(name, TypeKind::Scalar(kind))
    }

    /// Creates a descriptor for a struct type from its registered schema.
    #[must_use]
    pub fn structure(schema: &'static StructSchema) -> Self {
        TypeDesc::new(schema.name(), TypeKind::Struct(schema))
    }

    /// Creates a descriptor for an enum type from its registered schema.
    #[must_use]
    pub fn enumeration(schema: &'static EnumSchema) -> Self {
        TypeDesc::new(schema.name(), TypeKind::Enum(schema))
    }

    /// Attaches a custom deserialization hook.
    #[must_use]
    pub fn with_from_json(mut self, hook: FromJsonFn) -> Self {
        self.from_json = Some(hook);
        self
    }

    /// Attaches a single-string constructor.
    #[must_use]
    pub fn with_from_string(mut self, ctor: FromStringFn) -> Self {
        self.from_string = Some(ctor);
        self
    }
}

/// The closed set of target-type categories the deserializer dispatches on.
pub enum TypeKind {
    Bool,
    Char,
    String,
    /// A character array ([`CharArray`](crate::CharArray)); built from the
    /// characters of a JSON string.
    CharArray,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// The JSON value type itself; deserialization is a passthrough.
    Json,
    /// A well-known scalar handled by the codec table.
    Scalar(ScalarKind),
    /// An ordered sequence (`Vec`, `VecDeque`).
    List(SeqDesc),
    /// An unordered collection (`HashSet`, `BTreeSet`).
    Set(SeqDesc),
    /// A fixed-size array; arity must match the JSON array length.
    Array(ArrayDesc),
    /// A key-value map; keys deserialize through string dispatch.
    Map(MapDesc),
    /// An optional wrapper; evaluated before the null check.
    Optional(OptionalDesc),
    Struct(&'static StructSchema),
    Enum(&'static EnumSchema),
    /// No built-in rule applies; only the `from_json`/`from_string` hooks on
    /// the descriptor can produce a value.
    Opaque,
}

/// Scalar kinds with fixed codec-table entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// `chrono::DateTime<FixedOffset>`, bespoke calendar format.
    DateTime,
    /// `std::time::SystemTime`, bespoke calendar format through the local
    /// zone.
    Timestamp,
    /// `chrono::DateTime<Utc>`, RFC 3339 with `Z` suffix.
    Instant,
    /// `chrono::NaiveDate`.
    LocalDate,
    /// `chrono::NaiveDateTime`.
    LocalDateTime,
    /// `chrono::NaiveTime`.
    LocalTime,
    /// [`Year`](crate::Year).
    Year,
    /// [`YearMonth`](crate::YearMonth).
    YearMonth,
    /// `uuid::Uuid`.
    Uuid,
    /// `fixedbitset::FixedBitSet`; converts with a JSON array of set-bit
    /// indices rather than a string.
    Bits,
}

/// Item descriptor and build function for sequence containers.
pub struct SeqDesc {
    pub item: Box<TypeDesc>,
    pub build: BuildSeqFn,
}

/// Item descriptor, expected length and build function for fixed-size arrays.
pub struct ArrayDesc {
    pub item: Box<TypeDesc>,
    pub len: usize,
    pub build: BuildSeqFn,
}

/// Key and value descriptors and build function for map containers.
pub struct MapDesc {
    pub key: Box<TypeDesc>,
    pub value: Box<TypeDesc>,
    pub build: BuildMapFn,
}

/// Inner descriptor and wrap function for optional targets.
pub struct OptionalDesc {
    pub inner: Box<TypeDesc>,
    pub wrap: WrapOptionFn,
}
