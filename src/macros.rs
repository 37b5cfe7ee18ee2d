//! Construction macros.
//!
//! [`json!`](crate::json) builds [`JsonValue`](crate::JsonValue) trees from
//! literal syntax. [`json_schema!`](crate::json_schema) and
//! [`json_enum!`](crate::json_enum) generate the
//! [`Describe`](crate::Describe)/[`Reflect`](crate::Reflect) implementations
//! for ordinary structs and fieldless enums — the registration step that
//! replaces runtime field discovery. Types with an embedded parent, or any
//! other unusual schema, implement the traits by hand with the builder API
//! in [`schema`](crate::schema).

/// Builds a [`JsonValue`](crate::JsonValue) from literal syntax.
///
/// # Examples
///
/// ```rust
/// use json_auto::{json, JsonValue};
///
/// let value = json!({
///     "name": "Alice",
///     "age": 30,
///     "tags": ["admin", "user"]
/// });
///
/// let obj = value.as_object().unwrap();
/// assert_eq!(obj.get("age"), Some(&JsonValue::Int(30)));
/// ```
#[macro_export]
macro_rules! json {
    (null) => {
        $crate::JsonValue::Null
    };

    (true) => {
        $crate::JsonValue::Bool(true)
    };

    (false) => {
        $crate::JsonValue::Bool(false)
    };

    ([]) => {
        $crate::JsonValue::Array(::std::vec::Vec::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::JsonValue::Array(::std::vec![$($crate::json!($elem)),*])
    };

    ({}) => {
        $crate::JsonValue::Object($crate::JsonMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::JsonMap::new();
        $(
            object.insert($key.to_string(), $crate::json!($value));
        )*
        $crate::JsonValue::Object(object)
    }};

    ($other:expr) => {
        $crate::JsonValue::from($other)
    };
}

/// Registers the schema of a struct and implements
/// [`Reflect`](crate::Reflect) for it.
///
/// Each field is listed with its type; flags in brackets adjust the JSON
/// mapping: `[rename = "name"]` overrides the member name, `[ignore]`
/// excludes the field in both directions, `[always]` emits an explicit null
/// for an absent optional instead of omitting the member.
///
/// The struct must implement `Default` (object reconstruction populates a
/// default instance). A `[hooked]` marker after the type name wires the
/// custom-conversion protocol to inherent `to_json`/`from_json` methods.
///
/// # Examples
///
/// ```rust
/// use json_auto::{from_json, json, json_schema, to_json};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// json_schema! {
///     User {
///         id: i64,
///         name: String,
///     }
/// }
///
/// let json = to_json(&User { id: 7, name: "Ada".into() }).unwrap();
/// assert_eq!(json, json!({"id": 7i64, "name": "Ada"}));
/// let back: User = from_json(&json).unwrap();
/// assert_eq!(back.id, 7);
/// ```
#[macro_export]
macro_rules! json_schema {
    ($ty:ident [hooked] { $($fname:ident $([$($flag:tt)*])? : $fty:ty),* $(,)? }) => {
        impl $crate::Describe for $ty {
            fn schema() -> &'static $crate::StructSchema {
                static SCHEMA: ::std::sync::OnceLock<$crate::StructSchema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::StructSchema::new::<$ty>(stringify!($ty))
                        $(.field($crate::schema_field!($ty, $fname $([$($flag)*])? : $fty)))*
                })
            }
        }

        impl $crate::Reflect for $ty {
            fn shape(&self) -> $crate::Shape<'_> {
                $crate::Shape::Struct(<$ty as $crate::Describe>::schema())
            }

            fn type_desc() -> $crate::TypeDesc {
                $crate::TypeDesc::structure(<$ty as $crate::Describe>::schema()).with_from_json(
                    |json| {
                        $ty::from_json(json)
                            .map(|value| ::std::boxed::Box::new(value) as _)
                    },
                )
            }

            fn to_json_hook(&self) -> ::std::option::Option<$crate::Result<$crate::JsonValue>> {
                ::std::option::Option::Some(self.to_json())
            }
        }
    };

    ($ty:ident { $($fname:ident $([$($flag:tt)*])? : $fty:ty),* $(,)? }) => {
        impl $crate::Describe for $ty {
            fn schema() -> &'static $crate::StructSchema {
                static SCHEMA: ::std::sync::OnceLock<$crate::StructSchema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::StructSchema::new::<$ty>(stringify!($ty))
                        $(.field($crate::schema_field!($ty, $fname $([$($flag)*])? : $fty)))*
                })
            }
        }

        impl $crate::Reflect for $ty {
            fn shape(&self) -> $crate::Shape<'_> {
                $crate::Shape::Struct(<$ty as $crate::Describe>::schema())
            }

            fn type_desc() -> $crate::TypeDesc {
                $crate::TypeDesc::structure(<$ty as $crate::Describe>::schema())
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! schema_field {
    ($owner:ty, $fname:ident [rename = $json:literal, always] : $fty:ty) => {
        $crate::schema_field!($owner, $fname : $fty).renamed($json).always()
    };
    ($owner:ty, $fname:ident [always, rename = $json:literal] : $fty:ty) => {
        $crate::schema_field!($owner, $fname : $fty).renamed($json).always()
    };
    ($owner:ty, $fname:ident [rename = $json:literal] : $fty:ty) => {
        $crate::schema_field!($owner, $fname : $fty).renamed($json)
    };
    ($owner:ty, $fname:ident [ignore] : $fty:ty) => {
        $crate::schema_field!($owner, $fname : $fty).ignored()
    };
    ($owner:ty, $fname:ident [always] : $fty:ty) => {
        $crate::schema_field!($owner, $fname : $fty).always()
    };
    ($owner:ty, $fname:ident : $fty:ty) => {
        $crate::FieldDef::new::<$owner, $fty>(
            stringify!($fname),
            |owner: &$owner| &owner.$fname,
            |owner: &mut $owner, value: $fty| owner.$fname = value,
        )
    };
}

/// Registers the schema of a fieldless enum and implements
/// [`Reflect`](crate::Reflect) for it. Values convert with the symbolic
/// variant name; deserialization matches it exactly.
///
/// # Examples
///
/// ```rust
/// use json_auto::{from_json, json_enum, to_json, JsonValue};
///
/// #[derive(Debug, PartialEq)]
/// enum Color {
///     Red,
///     Green,
///     Blue,
/// }
///
/// json_enum! {
///     Color { Red, Green, Blue }
/// }
///
/// assert_eq!(to_json(&Color::Green).unwrap(), JsonValue::from("Green"));
/// assert_eq!(from_json::<Color>(&JsonValue::from("Blue")).unwrap(), Color::Blue);
/// ```
#[macro_export]
macro_rules! json_enum {
    ($ty:ident { $($variant:ident),* $(,)? }) => {
        impl $ty {
            #[doc(hidden)]
            fn __json_auto_enum_schema() -> &'static $crate::EnumSchema {
                static SCHEMA: ::std::sync::OnceLock<$crate::EnumSchema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::EnumSchema::new(stringify!($ty))
                        $(.variant(stringify!($variant), || {
                            ::std::boxed::Box::new($ty::$variant)
                        }))*
                })
            }
        }

        impl $crate::Reflect for $ty {
            fn shape(&self) -> $crate::Shape<'_> {
                match self {
                    $($ty::$variant => $crate::Shape::Enum(stringify!($variant)),)*
                }
            }

            fn type_desc() -> $crate::TypeDesc {
                $crate::TypeDesc::enumeration($ty::__json_auto_enum_schema())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{JsonMap, JsonValue};

    #[test]
    fn json_macro_primitives() {
        assert_eq!(json!(null), JsonValue::Null);
        assert_eq!(json!(true), JsonValue::Bool(true));
        assert_eq!(json!(false), JsonValue::Bool(false));
        assert_eq!(json!(42), JsonValue::Int(42));
        assert_eq!(json!(3.5), JsonValue::Double(3.5));
        assert_eq!(json!("hello"), JsonValue::String("hello".to_string()));
    }

    #[test]
    fn json_macro_arrays() {
        assert_eq!(json!([]), JsonValue::Array(vec![]));

        let arr = json!([1, 2, 3]);
        assert_eq!(
            arr,
            JsonValue::Array(vec![
                JsonValue::Int(1),
                JsonValue::Int(2),
                JsonValue::Int(3),
            ])
        );
    }

    #[test]
    fn json_macro_objects() {
        assert_eq!(json!({}), JsonValue::Object(JsonMap::new()));

        let obj = json!({
            "name": "Alice",
            "age": 30
        });

        match obj {
            JsonValue::Object(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(
                    map.get("name"),
                    Some(&JsonValue::String("Alice".to_string()))
                );
                assert_eq!(map.get("age"), Some(&JsonValue::Int(30)));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn json_macro_nests() {
        let value = json!({
            "items": [1, {"inner": true}, null]
        });
        let items = value.as_object().unwrap().get("items").unwrap();
        let items = items.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2], JsonValue::Null);
    }
}
