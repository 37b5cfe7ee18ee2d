//! Per-type schema descriptors.
//!
//! A [`StructSchema`] is the explicit, precomputed replacement for walking a
//! type's fields at conversion time: an ordered list of [`FieldDef`]s, each
//! carrying the JSON naming flags and a typed getter/setter pair, plus an
//! optional [`ParentDef`] that chains to an embedded parent's schema. The
//! parent chain models a base-type hierarchy: the serializer emits parent
//! fields before the declaring type's own fields, and field lookup searches
//! the declaring type first.
//!
//! Schemas are registered once per type: a [`Describe`] implementation
//! builds the schema inside a `OnceLock` static on first use and every
//! subsequent conversion reuses it. The [`json_schema!`](crate::json_schema)
//! macro generates both the `Describe` and the
//! [`Reflect`](crate::Reflect) implementation for ordinary structs;
//! hierarchies and unusual cases implement them by hand with the builder
//! API below.
//!
//! ```rust
//! use json_auto::{json_schema, to_json, JsonValue};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Account {
//!     id: i64,
//!     name: String,
//! }
//!
//! json_schema! {
//!     Account {
//!         id: i64,
//!         name[rename = "fullName"]: String,
//!     }
//! }
//!
//! let json = to_json(&Account { id: 7, name: "Ada".into() }).unwrap();
//! let obj = json.as_object().unwrap();
//! assert_eq!(obj.get("fullName"), Some(&JsonValue::from("Ada")));
//! ```

use std::fmt;

use crate::error::{Error, Result};
use crate::reflect::{take, Reflect};
use crate::ty::TypeDesc;

/// The describable interface: access to a type's registered schema.
///
/// Implementations return the same `&'static` schema on every call; building
/// it on first use is the one-time registration step.
pub trait Describe: Reflect + Sized {
    fn schema() -> &'static StructSchema;
}

/// Typed field access behind a dyn-friendly interface.
///
/// One `Accessor<S, F>` is created per field at schema construction; the
/// generic parameters disappear behind the trait so the engine can drive any
/// field through `&dyn Reflect`.
trait FieldAccess: Send + Sync {
    fn get<'a>(&self, owner: &'a dyn Reflect) -> Result<&'a dyn Reflect>;
    fn set(&self, owner: &mut dyn Reflect, value: Box<dyn Reflect>) -> Result<()>;
}

struct Accessor<S, F> {
    get: fn(&S) -> &F,
    set: fn(&mut S, F),
}

impl<S: Reflect, F: Reflect> FieldAccess for Accessor<S, F> {
    fn get<'a>(&self, owner: &'a dyn Reflect) -> Result<&'a dyn Reflect> {
        let owner = owner
            .as_any()
            .downcast_ref::<S>()
            .ok_or_else(|| Error::structure("field getter applied to a foreign type"))?;
        Ok((self.get)(owner) as &dyn Reflect)
    }

    fn set(&self, owner: &mut dyn Reflect, value: Box<dyn Reflect>) -> Result<()> {
        let owner = owner
            .as_any_mut()
            .downcast_mut::<S>()
            .ok_or_else(|| Error::structure("field setter applied to a foreign type"))?;
        (self.set)(owner, take::<F>(value)?);
        Ok(())
    }
}

/// One field of a struct schema: naming, flags, type descriptor, access.
pub struct FieldDef {
    name: &'static str,
    rename: Option<&'static str>,
    ignored: bool,
    always: bool,
    ty: fn() -> TypeDesc,
    access: Box<dyn FieldAccess>,
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("rename", &self.rename)
            .field("ignored", &self.ignored)
            .field("always", &self.always)
            .finish_non_exhaustive()
    }
}

impl FieldDef {
    /// Creates a field definition from a literal name and a getter/setter
    /// pair on the owning type.
    ///
    /// The field's type descriptor is taken from `F`'s
    /// [`Reflect::type_desc`], so generic type arguments travel with the
    /// field automatically.
    pub fn new<S, F>(name: &'static str, get: fn(&S) -> &F, set: fn(&mut S, F)) -> Self
    where
        S: Reflect,
        F: Reflect,
    {
        FieldDef {
            name,
            rename: None,
            ignored: false,
            always: false,
            ty: F::type_desc,
            access: Box::new(Accessor { get, set }),
        }
    }

    /// Overrides the JSON member name for this field.
    #[must_use]
    pub fn renamed(mut self, json_name: &'static str) -> Self {
        self.rename = Some(json_name);
        self
    }

    /// Excludes this field from conversion in both directions.
    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Forces emission of an explicit null when the field's value is absent,
    /// instead of omitting the member.
    #[must_use]
    pub fn always(mut self) -> Self {
        self.always = true;
        self
    }

    /// The literal field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The rename override, if any.
    #[must_use]
    pub fn rename(&self) -> Option<&'static str> {
        self.rename
    }

    /// The effective JSON member name: the rename override, else the literal
    /// name.
    #[must_use]
    pub fn json_name(&self) -> &'static str {
        self.rename.unwrap_or(self.name)
    }

    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    #[must_use]
    pub fn is_always(&self) -> bool {
        self.always
    }

    /// Builds the field's type descriptor.
    #[must_use]
    pub fn type_desc(&self) -> TypeDesc {
        (self.ty)()
    }

    /// Reads the field out of an instance of the owning type.
    pub fn get<'a>(&self, owner: &'a dyn Reflect) -> Result<&'a dyn Reflect> {
        self.access.get(owner)
    }

    /// Writes a deserialized value into the field of an instance of the
    /// owning type.
    pub fn set(&self, owner: &mut dyn Reflect, value: Box<dyn Reflect>) -> Result<()> {
        self.access.set(owner, value)
    }
}

/// Projection from a type to its embedded parent, behind a dyn-friendly
/// interface.
trait ParentAccess: Send + Sync {
    fn get<'a>(&self, owner: &'a dyn Reflect) -> Result<&'a dyn Reflect>;
    fn get_mut<'a>(&self, owner: &'a mut dyn Reflect) -> Result<&'a mut dyn Reflect>;
}

struct ParentAccessor<S, P> {
    get: fn(&S) -> &P,
    get_mut: fn(&mut S) -> &mut P,
}

impl<S: Reflect, P: Reflect> ParentAccess for ParentAccessor<S, P> {
    fn get<'a>(&self, owner: &'a dyn Reflect) -> Result<&'a dyn Reflect> {
        let owner = owner
            .as_any()
            .downcast_ref::<S>()
            .ok_or_else(|| Error::structure("parent projection applied to a foreign type"))?;
        Ok((self.get)(owner) as &dyn Reflect)
    }

    fn get_mut<'a>(&self, owner: &'a mut dyn Reflect) -> Result<&'a mut dyn Reflect> {
        let owner = owner
            .as_any_mut()
            .downcast_mut::<S>()
            .ok_or_else(|| Error::structure("parent projection applied to a foreign type"))?;
        Ok((self.get_mut)(owner) as &mut dyn Reflect)
    }
}

/// The embedded-parent link of a schema: the parent's schema plus the
/// projections that view an instance as its parent.
pub struct ParentDef {
    schema: fn() -> &'static StructSchema,
    access: Box<dyn ParentAccess>,
}

impl ParentDef {
    /// The parent's registered schema.
    #[must_use]
    pub fn schema(&self) -> &'static StructSchema {
        (self.schema)()
    }

    /// Views an instance as its embedded parent.
    pub fn project<'a>(&self, owner: &'a dyn Reflect) -> Result<&'a dyn Reflect> {
        self.access.get(owner)
    }

    /// Mutably views an instance as its embedded parent.
    pub fn project_mut<'a>(&self, owner: &'a mut dyn Reflect) -> Result<&'a mut dyn Reflect> {
        self.access.get_mut(owner)
    }
}

/// The registered schema of a struct type.
pub struct StructSchema {
    name: &'static str,
    parent: Option<ParentDef>,
    fields: Vec<FieldDef>,
    make: fn() -> Box<dyn Reflect>,
}

fn make_default<S: Reflect + Default>() -> Box<dyn Reflect> {
    Box::new(S::default())
}

impl StructSchema {
    /// Starts a schema for `S`, which must be default-constructible so that
    /// object reconstruction has an instance to populate.
    #[must_use]
    pub fn new<S: Reflect + Default>(name: &'static str) -> Self {
        StructSchema {
            name,
            parent: None,
            fields: Vec::new(),
            make: make_default::<S>,
        }
    }

    /// Declares the embedded parent of `S`. Parent fields serialize before
    /// `S`'s own fields and are searched last during field lookup.
    ///
    /// The embedded field itself must not also be listed with
    /// [`StructSchema::field`].
    #[must_use]
    pub fn parent<S, P>(mut self, get: fn(&S) -> &P, get_mut: fn(&mut S) -> &mut P) -> Self
    where
        S: Reflect,
        P: Describe,
    {
        self.parent = Some(ParentDef {
            schema: P::schema,
            access: Box::new(ParentAccessor { get, get_mut }),
        });
        self
    }

    /// Appends a field. Declaration order is emission order.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// The type's name, used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The embedded-parent link, if any.
    #[must_use]
    pub fn parent_def(&self) -> Option<&ParentDef> {
        self.parent.as_ref()
    }

    /// The schema's own fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Default-constructs an instance for object reconstruction.
    #[must_use]
    pub fn make_instance(&self) -> Box<dyn Reflect> {
        (self.make)()
    }

    /// Resolves a JSON member name against this schema's own fields:
    /// first by rename override, then by literal field name. The parent
    /// chain is not consulted here; [`find_field`] drives the full search.
    #[must_use]
    pub fn find_own(&self, json_name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|f| f.rename() == Some(json_name))
            .or_else(|| self.fields.iter().find(|f| f.name() == json_name))
    }
}

/// Resolves a JSON member name against a schema and its parent chain.
///
/// The declaring schema wins over its parents; within one schema the rename
/// pass wins over the literal-name pass. Exhausting the chain is a structure
/// error.
pub fn find_field<'a>(schema: &'a StructSchema, json_name: &str) -> Result<&'a FieldDef> {
    if let Some(field) = schema.find_own(json_name) {
        return Ok(field);
    }
    match schema.parent_def() {
        Some(parent) => find_field(parent.schema(), json_name),
        None => Err(Error::structure(format!(
            "no field in {} matches key {:?}",
            schema.name(),
            json_name
        ))),
    }
}

/// The registered schema of an enum type: its variant names and
/// constructors.
pub struct EnumSchema {
    name: &'static str,
    variants: Vec<(&'static str, fn() -> Box<dyn Reflect>)>,
}

impl EnumSchema {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        EnumSchema {
            name,
            variants: Vec::new(),
        }
    }

    /// Appends a variant with its symbolic name and constructor.
    #[must_use]
    pub fn variant(mut self, name: &'static str, make: fn() -> Box<dyn Reflect>) -> Self {
        self.variants.push((name, make));
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Constructs the variant whose symbolic name matches exactly.
    #[must_use]
    pub fn from_name(&self, name: &str) -> Option<Box<dyn Reflect>> {
        self.variants
            .iter()
            .find(|(variant, _)| *variant == name)
            .map(|(_, make)| make())
    }

    /// The variant names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.variants.iter().map(|(name, _)| *name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shape;

    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        plain: i32,
        aliased: i32,
    }

    impl Describe for Sample {
        fn schema() -> &'static StructSchema {
            static SCHEMA: std::sync::OnceLock<StructSchema> = std::sync::OnceLock::new();
            SCHEMA.get_or_init(|| {
                StructSchema::new::<Sample>("Sample")
                    .field(FieldDef::new::<Sample, i32>(
                        "plain",
                        |s| &s.plain,
                        |s, v| s.plain = v,
                    ))
                    .field(
                        FieldDef::new::<Sample, i32>("aliased", |s| &s.aliased, |s, v| {
                            s.aliased = v
                        })
                        .renamed("alias"),
                    )
            })
        }
    }

    impl Reflect for Sample {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(Self::schema())
        }

        fn type_desc() -> TypeDesc {
            TypeDesc::structure(Self::schema())
        }
    }

    #[test]
    fn rename_pass_wins_over_name_pass() {
        let schema = Sample::schema();
        assert_eq!(schema.find_own("alias").unwrap().name(), "aliased");
        // the literal name still resolves in the second pass
        assert_eq!(schema.find_own("aliased").unwrap().name(), "aliased");
        assert!(schema.find_own("missing").is_none());
    }

    #[test]
    fn find_field_reports_missing_keys() {
        let err = find_field(Sample::schema(), "nope").unwrap_err();
        assert!(err.to_string().contains("Sample"));
    }

    #[test]
    fn getter_and_setter_round_trip() {
        let schema = Sample::schema();
        let mut value = Sample::default();
        let field = schema.find_own("plain").unwrap();
        field.set(&mut value, Box::new(41i32)).unwrap();
        assert_eq!(value.plain, 41);
        let read = field.get(&value).unwrap();
        assert_eq!(read.as_any().downcast_ref::<i32>(), Some(&41));
    }

    #[test]
    fn setter_rejects_foreign_owner() {
        let schema = Sample::schema();
        let field = schema.find_own("plain").unwrap();
        let mut wrong = 0i32;
        assert!(field.set(&mut wrong, Box::new(1i32)).is_err());
    }
}
