mod common;

use std::collections::{BTreeMap, HashMap, HashSet};

use fixedbitset::FixedBitSet;
use json_auto::{json, to_json, CharArray, JsonValue};
use uuid::Uuid;

use common::{
    AlwaysNamed, Amount, Base, Color, DecHex, MaybeNamed, Nested, PartlyHidden, Renamed, Simple,
    Sub, Tag,
};

#[test]
fn strings_serialize_directly() {
    assert_eq!(
        to_json(&"test1".to_string()).unwrap(),
        JsonValue::String("test1".to_string())
    );
    assert_eq!(to_json(&String::new()).unwrap(), JsonValue::from(""));
}

#[test]
fn string_like_value_holders_serialize_as_strings() {
    let tag = Tag("abc".to_string());
    assert_eq!(to_json(&tag).unwrap(), JsonValue::from("abc"));
}

#[test]
fn booleans() {
    assert_eq!(to_json(&true).unwrap(), JsonValue::Bool(true));
    assert_eq!(to_json(&false).unwrap(), JsonValue::Bool(false));
}

#[test]
fn narrow_integrals_become_integers() {
    assert_eq!(to_json(&123i32).unwrap(), JsonValue::Int(123));
    assert_eq!(to_json(&-567i32).unwrap(), JsonValue::Int(-567));
    assert_eq!(to_json(&0i32).unwrap(), JsonValue::Int(0));
    assert_eq!(to_json(&i32::MAX).unwrap(), JsonValue::Int(i32::MAX));
    assert_eq!(to_json(&i32::MIN).unwrap(), JsonValue::Int(i32::MIN));
    assert_eq!(to_json(&2345i16).unwrap(), JsonValue::Int(2345));
    assert_eq!(to_json(&i16::MIN).unwrap(), JsonValue::Int(-32768));
    assert_eq!(to_json(&123i8).unwrap(), JsonValue::Int(123));
    assert_eq!(to_json(&255u8).unwrap(), JsonValue::Int(255));
    assert_eq!(to_json(&65535u16).unwrap(), JsonValue::Int(65535));
}

#[test]
fn wide_integrals_become_longs() {
    assert_eq!(to_json(&57i64).unwrap(), JsonValue::Long(57));
    assert_eq!(
        to_json(&-112_233_445_566_778_899i64).unwrap(),
        JsonValue::Long(-112_233_445_566_778_899)
    );
    assert_eq!(to_json(&i64::MAX).unwrap(), JsonValue::Long(i64::MAX));
    assert_eq!(to_json(&i64::MIN).unwrap(), JsonValue::Long(i64::MIN));
    assert_eq!(
        to_json(&4_294_967_295u32).unwrap(),
        JsonValue::Long(4_294_967_295)
    );
    assert_eq!(to_json(&12u64).unwrap(), JsonValue::Long(12));
}

#[test]
fn floats_keep_their_width() {
    assert_eq!(to_json(&1234.567f64).unwrap(), JsonValue::Double(1234.567));
    assert_eq!(to_json(&0.0f64).unwrap(), JsonValue::Double(0.0));
    assert_eq!(to_json(&1234.567f32).unwrap(), JsonValue::Float(1234.567));
    assert_eq!(to_json(&-1234e-40f32).unwrap(), JsonValue::Float(-1234e-40));
}

#[test]
fn characters_become_single_character_strings() {
    assert_eq!(to_json(&'A').unwrap(), JsonValue::from("A"));
    assert_eq!(to_json(&'€').unwrap(), JsonValue::from("€"));
}

#[test]
fn char_arrays_concatenate() {
    let chars = CharArray::from("abc");
    assert_eq!(to_json(&chars).unwrap(), JsonValue::from("abc"));
}

#[test]
fn fixed_arrays_serialize_elementwise() {
    let array = [1i32, 2, 3];
    assert_eq!(
        to_json(&array).unwrap(),
        json!([1, 2, 3])
    );
}

#[test]
fn json_values_pass_through_unchanged() {
    let original = json!({"k": [1, true, null]});
    assert_eq!(to_json(&original).unwrap(), original);
}

#[test]
fn enums_serialize_as_variant_names() {
    assert_eq!(to_json(&Color::Red).unwrap(), JsonValue::from("Red"));
    assert_eq!(to_json(&Color::Green).unwrap(), JsonValue::from("Green"));
}

#[test]
fn lists_preserve_order() {
    let list = vec!["ABC".to_string(), "def".to_string(), "!".to_string()];
    assert_eq!(to_json(&list).unwrap(), json!(["ABC", "def", "!"]));
}

#[test]
fn sets_contain_every_element() {
    let mut set = HashSet::new();
    set.insert("ABC".to_string());
    set.insert("def".to_string());
    set.insert("!".to_string());

    let json = to_json(&set).unwrap();
    let array = json.as_array().unwrap();
    assert_eq!(array.len(), 3);
    for expected in ["ABC", "def", "!"] {
        assert!(array.contains(&JsonValue::from(expected)));
    }
}

#[test]
fn maps_stringify_keys() {
    let mut map = HashMap::new();
    map.insert("alpha".to_string(), 1i32);
    let json = to_json(&map).unwrap();
    assert_eq!(json, json!({"alpha": 1}));

    let mut numbered = BTreeMap::new();
    numbered.insert(1i32, "one".to_string());
    numbered.insert(2i32, "two".to_string());
    let json = to_json(&numbered).unwrap();
    assert_eq!(json, json!({"1": "one", "2": "two"}));
}

#[test]
fn structs_map_field_by_field_in_declaration_order() {
    let value = Simple {
        string1: "abc".to_string(),
        int1: 27,
    };
    let json = to_json(&value).unwrap();
    assert_eq!(json, json!({"string1": "abc", "int1": 27}));
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["string1", "int1"]);
}

#[test]
fn parent_fields_precede_own_fields() {
    let value = Sub {
        base: Base { a: 1 },
        b: 2,
    };
    let json = to_json(&value).unwrap();
    assert_eq!(json, json!({"a": 1, "b": 2}));
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn renamed_fields_use_the_override_only() {
    let json = to_json(&Renamed { int1: 27 }).unwrap();
    assert_eq!(json, json!({"fred": 27}));
    assert!(json.as_object().unwrap().get("int1").is_none());
}

#[test]
fn ignored_fields_never_appear() {
    let value = PartlyHidden {
        kept: 5,
        secret: "hidden".to_string(),
    };
    let json = to_json(&value).unwrap();
    assert_eq!(json, json!({"kept": 5}));
}

#[test]
fn absent_optionals_are_omitted_by_default() {
    let json = to_json(&MaybeNamed { value1: None }).unwrap();
    assert_eq!(json, json!({}));

    let json = to_json(&MaybeNamed {
        value1: Some("x".to_string()),
    })
    .unwrap();
    assert_eq!(json, json!({"value1": "x"}));
}

#[test]
fn always_emit_writes_an_explicit_null() {
    let json = to_json(&AlwaysNamed { value1: None }).unwrap();
    assert_eq!(json, json!({"value1": null}));
}

#[test]
fn top_level_optionals_serialize_to_null_or_inner() {
    assert_eq!(to_json(&None::<i32>).unwrap(), JsonValue::Null);
    assert_eq!(to_json(&Some(5i32)).unwrap(), JsonValue::Int(5));
}

#[test]
fn custom_hook_owns_the_conversion() {
    let json = to_json(&DecHex { int1: 17 }).unwrap();
    assert_eq!(json, json!({"dec": "17", "hex": "11"}));
}

#[test]
fn unclassified_numbers_use_the_best_fit_rule() {
    assert_eq!(to_json(&Amount(5.0)).unwrap(), JsonValue::Int(5));
    assert_eq!(to_json(&Amount(0.0)).unwrap(), JsonValue::ZERO);
    assert_eq!(to_json(&Amount(5.5)).unwrap(), JsonValue::Double(5.5));
    assert_eq!(
        to_json(&Amount(4_000_000_000.0)).unwrap(),
        JsonValue::Long(4_000_000_000)
    );
}

#[test]
fn uuids_serialize_to_their_hyphenated_form() {
    let uuid = Uuid::parse_str("12ce3730-2d5a-4588-8c69-9aa4d29b1248").unwrap();
    assert_eq!(
        to_json(&uuid).unwrap(),
        JsonValue::from("12ce3730-2d5a-4588-8c69-9aa4d29b1248")
    );
}

#[test]
fn bit_sets_serialize_as_ascending_indices() {
    let mut bits = FixedBitSet::with_capacity(16);
    for i in [3, 7, 13, 14] {
        bits.insert(i);
    }
    assert_eq!(to_json(&bits).unwrap(), json!([3, 7, 13, 14]));
}

#[test]
fn nested_structs_recurse() {
    let value = Nested {
        string1: "outer".to_string(),
        integer1: Some(8),
        inner1: Some(Simple {
            string1: "inner".to_string(),
            int1: 1,
        }),
        array1: vec![0, 1, 2],
    };
    let json = to_json(&value).unwrap();
    assert_eq!(
        json,
        json!({
            "string1": "outer",
            "integer1": 8,
            "inner1": {"string1": "inner", "int1": 1},
            "array1": [0, 1, 2]
        })
    );
}
