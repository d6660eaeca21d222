use serde::{Deserialize, Serialize};
use serde_gbln::{
    from_str, gbln, native_to_serialized, parse_to_native, parse_to_native_with, roundtrip,
    to_native, to_string, to_string_pretty, Error, ErrorCode, HintPolicy, IntKind, NativeValue,
    Number, RenderOptions, TypeHint,
};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
enum Status {
    Active,
    Suspended { reason: String, days: u16 },
    Renamed(String),
}

const USER_DOC: &str = "user{id<u32>(12345)name<s64>(Alice Johnson)age<i8>(25)}";

fn alice() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    }
}

#[test]
fn test_simple_struct() {
    let gbln = to_string(&alice()).unwrap();
    println!("User GBLN: {}", gbln);
    assert_eq!(
        gbln,
        "id<i8>(123)name<s8>(Alice)active<b>(t)tags[<s8>(admin)<s16>(developer)]"
    );

    let user_back: User = from_str(&gbln).unwrap();
    assert_eq!(alice(), user_back);
}

#[test]
fn test_nested_struct() {
    let order = Order {
        order_id: 12345,
        customer: alice(),
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-042".to_string(),
                price: 5.0,
                quantity: 300,
            },
        ],
        total: 64.98,
    };

    let gbln = to_string(&order).unwrap();
    assert!(gbln.contains("customer{id<i8>(123)"));
    assert!(gbln.contains("price<f64>(29.99)"));
    assert!(gbln.contains("quantity<i16>(300)"));

    let order_back: Order = from_str(&gbln).unwrap();
    assert_eq!(order, order_back);

    let pretty = to_string_pretty(&order).unwrap();
    let order_back: Order = from_str(&pretty).unwrap();
    assert_eq!(order, order_back);
}

#[test]
fn test_enums() {
    let statuses = vec![
        Status::Active,
        Status::Suspended {
            reason: "abuse".to_string(),
            days: 30,
        },
        Status::Renamed("bob".to_string()),
    ];
    let gbln = to_string(&statuses).unwrap();
    assert!(gbln.starts_with("[<s8>(Active)"));
    let back: Vec<Status> = from_str(&gbln).unwrap();
    assert_eq!(statuses, back);
}

#[test]
fn test_maps() {
    let mut limits = BTreeMap::new();
    limits.insert("cpu".to_string(), 4u8);
    limits.insert("memory".to_string(), 16u8);
    let gbln = to_string(&limits).unwrap();
    assert_eq!(gbln, "cpu<i8>(4)memory<i8>(16)");
    let back: BTreeMap<String, u8> = from_str(&gbln).unwrap();
    assert_eq!(limits, back);
}

#[test]
fn test_parse_user_document() {
    let value = parse_to_native(USER_DOC).unwrap();
    assert_eq!(
        value,
        gbln!({ "user": { "id": 12345, "name": "Alice Johnson", "age": 25 } })
    );
    let user = value.get("user").unwrap();
    assert_eq!(user.get("age").and_then(|a| a.as_i64()), Some(25));
    assert_eq!(user.len(), Some(3));
}

#[test]
fn test_reinfer_policy_narrows_hints() {
    let value = parse_to_native_with(USER_DOC, HintPolicy::Reinfer).unwrap();
    let text = native_to_serialized(&value, &RenderOptions::new()).unwrap();
    assert_eq!(
        text,
        "user{id<i16>(12345)name<s16>(Alice Johnson)age<i8>(25)}"
    );
}

#[test]
fn test_preserve_policy_keeps_hints() {
    let value = parse_to_native_with(USER_DOC, HintPolicy::Preserve).unwrap();
    let id = value.get("user").and_then(|u| u.get("id")).unwrap();
    assert!(matches!(id, NativeValue::Hinted(TypeHint::Int(IntKind::U32), _)));

    let text = native_to_serialized(&value, &RenderOptions::new()).unwrap();
    assert_eq!(text, USER_DOC);
}

#[test]
fn test_roundtrip_keeps_written_hints() {
    assert_eq!(roundtrip(USER_DOC).unwrap(), USER_DOC);
    let pretty = native_to_serialized(
        &parse_to_native_with(USER_DOC, HintPolicy::Preserve).unwrap(),
        &RenderOptions::pretty(),
    )
    .unwrap();
    assert_eq!(roundtrip(&pretty).unwrap(), USER_DOC);
}

#[test]
fn test_out_of_range_integer_cites_bounds() {
    let err = parse_to_native("age<i8>(999)").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::IntOutOfRange));
    match err {
        Error::Parse(e) => {
            assert_eq!((e.line, e.column), (1, 4));
            assert!(e.message.contains("[-128, 127]"), "{}", e.message);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_explicit_hint_is_validated() {
    let value = gbln!({ "port": 70000 });
    value.set(
        "port",
        NativeValue::hinted(TypeHint::Int(IntKind::U16), NativeValue::from(70000)),
    );
    let err = native_to_serialized(&value, &RenderOptions::new()).unwrap_err();
    assert_eq!(err.path(), Some("port"));
    assert!(matches!(err.without_path(), Error::Range { hint, .. } if hint == "u16"));

    value.set(
        "port",
        NativeValue::hinted(TypeHint::Int(IntKind::U16), NativeValue::from(8080)),
    );
    assert_eq!(
        native_to_serialized(&value, &RenderOptions::new()).unwrap(),
        "port<u16>(8080)"
    );
}

#[test]
fn test_long_string_is_rejected() {
    let value = NativeValue::from("x".repeat(1025));
    let err = native_to_serialized(&value, &RenderOptions::new()).unwrap_err();
    assert_eq!(err, Error::Length { len: 1025, limit: 1024 });

    let value = NativeValue::from("x".repeat(1024));
    let text = native_to_serialized(&value, &RenderOptions::new()).unwrap();
    assert!(text.starts_with("<s1024>("));
}

#[test]
fn test_oversized_string_reports_its_path() {
    let value = gbln!({
        "user": { "tags": ["a", "b", ("x".repeat(2000))] }
    });
    let err = native_to_serialized(&value, &RenderOptions::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "user.tags[2]: string of 2000 bytes exceeds 1024-byte limit"
    );
    assert_eq!(err.code(), Some(ErrorCode::StringTooLong));
    assert!(err.is_validation());
}

fn nested_arrays(levels: usize) -> NativeValue {
    let mut value = NativeValue::from(true);
    for _ in 0..levels {
        value = NativeValue::array([value]);
    }
    value
}

#[test]
fn test_nesting_limit_applies_both_ways() {
    let value = nested_arrays(128);
    let text = native_to_serialized(&value, &RenderOptions::new()).unwrap();
    assert_eq!(parse_to_native(&text).unwrap(), value);

    let err = native_to_serialized(&nested_arrays(129), &RenderOptions::new()).unwrap_err();
    assert!(matches!(err, Error::Serialize(ref msg) if msg.contains("nesting deeper than 128 levels")));

    let text = format!("{}<b>(t){}", "[".repeat(129), "]".repeat(129));
    let err = parse_to_native(&text).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidSyntax));
}

#[test]
fn test_circular_reference() {
    let a = gbln!({ "name": "a" });
    a.set("self", a.clone());
    let err = native_to_serialized(&a, &RenderOptions::new()).unwrap_err();
    assert_eq!(err, Error::Serialize("self: circular reference".to_string()));
}

#[test]
fn test_opaque_value_reports_path() {
    let user = gbln!({ "tags": ["a", "b"] });
    user.get("tags")
        .unwrap()
        .push(NativeValue::Opaque("function".to_string()));
    let err = native_to_serialized(&user, &RenderOptions::new()).unwrap_err();
    match err {
        Error::Serialize(msg) => assert!(msg.starts_with("tags[2]: "), "{msg}"),
        other => panic!("expected serialize error, got {other:?}"),
    }
}

#[test]
fn test_undefined_becomes_null() {
    let value = NativeValue::object([("gone", NativeValue::Undefined)]);
    let text = native_to_serialized(&value, &RenderOptions::new()).unwrap();
    assert_eq!(text, "gone<n>()");
    assert_eq!(parse_to_native(&text).unwrap().get("gone"), Some(NativeValue::Null));
}

#[test]
fn test_integral_floats_become_integers() {
    let value = NativeValue::array([
        NativeValue::from(2.0),
        NativeValue::from(-0.5),
        NativeValue::from(1e17),
    ]);
    let text = native_to_serialized(&value, &RenderOptions::new()).unwrap();
    assert_eq!(text, "[<i8>(2)<f64>(-0.5)<f64>(100000000000000000)]");
}

#[test]
fn test_u64_range() {
    let value = NativeValue::from(u64::MAX);
    let text = native_to_serialized(&value, &RenderOptions::new()).unwrap();
    assert_eq!(text, "<u64>(18446744073709551615)");
    assert_eq!(
        parse_to_native(&text).unwrap(),
        NativeValue::Number(Number::UInt(u64::MAX))
    );
}

#[test]
fn test_serde_json_interop() {
    let json: serde_json::Value = serde_json::json!({
        "service": "api",
        "replicas": 3,
        "ratio": 0.75,
        "labels": ["blue", "green"],
        "owner": null
    });
    let gbln = to_string(&json).unwrap();
    assert_eq!(
        gbln,
        "service<s4>(api)replicas<i8>(3)ratio<f64>(0.75)labels[<s4>(blue)<s8>(green)]owner<n>()"
    );

    let back: serde_json::Value = from_str(&gbln).unwrap();
    assert_eq!(json, back);

    let native = to_native(&json).unwrap();
    assert_eq!(native.get("replicas"), Some(NativeValue::from(3)));
}

#[test]
fn test_error_positions_across_lines() {
    let text = "a<i8>(1)\nb<i8>(2)\nc<q9>(3)";
    match parse_to_native(text).unwrap_err() {
        Error::Parse(e) => {
            assert_eq!(e.code, ErrorCode::InvalidTypeHint);
            assert_eq!((e.line, e.column), (3, 2));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_duplicate_key_in_document() {
    let err = parse_to_native("a<i8>(1)a<i8>(2)").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::DuplicateKey));
}
