//! Property-based round-trip tests over generated inputs.

use std::collections::HashMap;

use json_auto::{from_json, to_json, Reflect};
use proptest::prelude::*;

fn round_trips<T>(value: &T) -> bool
where
    T: Reflect + PartialEq + std::fmt::Debug,
{
    match to_json(value) {
        Ok(json) => match from_json::<T>(&json) {
            Ok(back) => back == *value,
            Err(e) => {
                eprintln!("deserialize failed: {}", e);
                eprintln!("json was: {}", json);
                false
            }
        },
        Err(e) => {
            eprintln!("serialize failed: {}", e);
            false
        }
    }
}

proptest! {
    #[test]
    fn prop_i32(n in any::<i32>()) {
        prop_assert!(round_trips(&n));
    }

    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(round_trips(&n));
    }

    #[test]
    fn prop_u32(n in any::<u32>()) {
        prop_assert!(round_trips(&n));
    }

    #[test]
    fn prop_i8(n in any::<i8>()) {
        prop_assert!(round_trips(&n));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(round_trips(&b));
    }

    #[test]
    fn prop_char(c in any::<char>()) {
        prop_assert!(round_trips(&c));
    }

    #[test]
    fn prop_finite_f64(x in -1.0e15..1.0e15f64) {
        prop_assert!(round_trips(&x));
    }

    #[test]
    fn prop_string(s in ".*") {
        prop_assert!(round_trips(&s));
    }

    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        prop_assert!(round_trips(&v));
    }

    #[test]
    fn prop_option_i32(opt in proptest::option::of(any::<i32>())) {
        prop_assert!(round_trips(&opt));
    }

    #[test]
    fn prop_string_map(m in prop::collection::hash_map("[a-z]{1,8}", any::<i32>(), 0..10)) {
        let m: HashMap<String, i32> = m;
        prop_assert!(round_trips(&m));
    }
}
