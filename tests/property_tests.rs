//! Property-based tests for the conversion guarantees: serde round trips,
//! narrowest inference, and leak-free conversions over generated inputs.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_gbln::{
    from_str, infer, native_to_serialized, parse_to_native, parse_to_native_with,
    roundtrip as reformat_compact, to_string, Allocator, Converter, FloatKind, HintPolicy, IntKind,
    NativeValue, RenderOptions, StrTier, TypeHint,
};

fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    match to_string(value) {
        Ok(serialized) => match from_str::<T>(&serialized) {
            Ok(deserialized) => *value == deserialized,
            Err(e) => {
                eprintln!("Deserialize failed: {}", e);
                eprintln!("Serialized was: {}", serialized);
                false
            }
        },
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            false
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Record {
    id: u64,
    delta: i32,
    label: String,
    enabled: bool,
    weights: Vec<i16>,
    parent: Option<u32>,
}

fn record() -> impl Strategy<Value = Record> {
    (
        any::<u64>(),
        any::<i32>(),
        "[a-zA-Z0-9 ()\\\\]{0,40}",
        any::<bool>(),
        prop::collection::vec(any::<i16>(), 0..8),
        proptest::option::of(any::<u32>()),
    )
        .prop_map(|(id, delta, label, enabled, weights, parent)| Record {
            id,
            delta,
            label,
            enabled,
            weights,
            parent,
        })
}

fn finite_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |f| f.is_finite())
}

/// Native trees whose leaves all survive a round trip exactly. Floats are
/// written with the shortest text that reads back to the same bits, and
/// integral floats come back as equal integers.
fn native_tree() -> impl Strategy<Value = NativeValue> {
    let leaf = prop_oneof![
        Just(NativeValue::Null),
        any::<bool>().prop_map(NativeValue::from),
        any::<i64>().prop_map(NativeValue::from),
        any::<u64>().prop_map(NativeValue::from),
        finite_f64().prop_map(NativeValue::from),
        (-1_000_000i32..1_000_000).prop_map(|n| NativeValue::from(f64::from(n))),
        "\\PC{0,20}".prop_map(NativeValue::from),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(NativeValue::from),
            prop::collection::vec(("[a-z_][a-z0-9_.-]{0,8}", inner), 0..6).prop_map(|entries| {
                let mut map = serde_gbln::NativeMap::new();
                for (key, value) in entries {
                    map.insert(key, value);
                }
                NativeValue::from(map)
            }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u64(n in any::<u64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(roundtrip(&b));
    }

    #[test]
    fn prop_f64(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        prop_assert!(roundtrip(&f));
    }

    #[test]
    fn prop_f32(f in any::<f32>().prop_filter("finite", |f| f.is_finite())) {
        prop_assert!(roundtrip(&f));
    }

    #[test]
    fn prop_string(s in "\\PC{0,200}") {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_option_i32(opt in proptest::option::of(any::<i32>())) {
        prop_assert!(roundtrip(&opt));
    }

    #[test]
    fn prop_record(r in record()) {
        prop_assert!(roundtrip(&r));
    }

    #[test]
    fn prop_inferred_integer_is_narrowest(n in any::<i64>()) {
        let hint = infer(&NativeValue::from(n)).unwrap();
        let TypeHint::Int(kind) = hint else {
            return Err(TestCaseError::fail(format!("{n} inferred as {hint}")));
        };
        prop_assert!(kind.contains(i128::from(n)));
        let position = IntKind::ASCENDING.iter().position(|k| *k == kind).unwrap();
        for narrower in &IntKind::ASCENDING[..position] {
            prop_assert!((n < 0 && !narrower.is_signed()) || !narrower.contains(i128::from(n)));
        }
    }

    #[test]
    fn prop_inferred_tier_is_smallest(s in "\\PC{0,256}") {
        let hint = infer(&NativeValue::from(s.as_str())).unwrap();
        let TypeHint::Str(tier) = hint else {
            return Err(TestCaseError::fail(format!("string inferred as {hint}")));
        };
        prop_assert!(tier.fits(s.len()));
        if tier != StrTier::S2 {
            prop_assert!(s.len() > tier.limit() / 2);
        }
    }

    #[test]
    fn prop_native_round_trip(value in native_tree()) {
        let text = native_to_serialized(&value, &RenderOptions::new()).unwrap();
        let back = parse_to_native(&text).unwrap();
        prop_assert_eq!(&back, &value);

        let pretty = native_to_serialized(&value, &RenderOptions::pretty()).unwrap();
        prop_assert_eq!(reformat_compact(&pretty).unwrap(), text);
    }

    #[test]
    fn prop_integral_float_reads_back_as_integer(n in -1_000_000i32..1_000_000) {
        let value = NativeValue::from(f64::from(n));
        let text = native_to_serialized(&value, &RenderOptions::new()).unwrap();
        prop_assert!(text.starts_with("<i"), "{}", text);
        prop_assert_eq!(parse_to_native(&text).unwrap().as_i64(), Some(i64::from(n)));
    }

    #[test]
    fn prop_preserved_f32_keeps_single_precision(
        x in any::<f32>().prop_filter("finite", |f| f.is_finite())
    ) {
        let text = format!("v<f32>({})", x);
        let value = parse_to_native_with(&text, HintPolicy::Preserve).unwrap();
        let v = value.get("v").unwrap();
        prop_assert!(matches!(v, NativeValue::Hinted(TypeHint::Float(FloatKind::F32), _)));

        let read = v.as_f64().unwrap();
        let tolerance = f64::from(f32::EPSILON) * f64::from(x).abs();
        prop_assert!((read - f64::from(x)).abs() <= tolerance, "{} read back as {}", x, read);
        prop_assert_eq!(native_to_serialized(&value, &RenderOptions::new()).unwrap(), text);
    }

    #[test]
    fn prop_conversions_do_not_leak(value in native_tree()) {
        let alloc = Allocator::new();
        let converter = Converter::new(&alloc);
        let tree = converter.native_to_tree(&value).unwrap();
        converter.tree_to_native(tree).unwrap();
        let stats = alloc.stats();
        prop_assert_eq!(stats.allocated, stats.freed);
    }
}
