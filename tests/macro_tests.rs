use serde_gbln::{gbln, native_to_serialized, NativeMap, NativeValue, Number, RenderOptions};

#[test]
fn test_gbln_macro_null() {
    let value = gbln!(null);
    assert_eq!(value, NativeValue::Null);
    assert!(value.is_null());
}

#[test]
fn test_gbln_macro_booleans() {
    assert_eq!(gbln!(true), NativeValue::Bool(true));
    assert_eq!(gbln!(false), NativeValue::Bool(false));
    assert_eq!(gbln!(true).as_bool(), Some(true));
}

#[test]
fn test_gbln_macro_numbers() {
    assert_eq!(gbln!(42), NativeValue::Number(Number::Int(42)));
    assert_eq!(gbln!(3.5), NativeValue::Number(Number::Float(3.5)));
    assert_eq!(gbln!(-123), NativeValue::Number(Number::Int(-123)));
    assert_eq!(gbln!(u64::MAX), NativeValue::Number(Number::UInt(u64::MAX)));
}

#[test]
fn test_gbln_macro_strings() {
    assert_eq!(gbln!("hello world"), NativeValue::String("hello world".to_string()));
    assert_eq!(gbln!("").as_str(), Some(""));
}

#[test]
fn test_gbln_macro_arrays() {
    let empty_array = gbln!([]);
    assert!(empty_array.is_array());
    assert_eq!(empty_array.len(), Some(0));

    let number_array = gbln!([1, 2, 3]);
    assert_eq!(
        number_array,
        NativeValue::array([
            NativeValue::from(1),
            NativeValue::from(2),
            NativeValue::from(3),
        ])
    );

    let mixed_array = gbln!([1, "hello", true, null]);
    assert_eq!(
        mixed_array,
        NativeValue::array([
            NativeValue::from(1),
            NativeValue::from("hello"),
            NativeValue::Bool(true),
            NativeValue::Null,
        ])
    );
}

#[test]
fn test_gbln_macro_objects() {
    assert_eq!(gbln!({}), NativeValue::from(NativeMap::new()));

    let simple_object = gbln!({
        "name": "Alice",
        "age": 30
    });
    assert!(simple_object.is_object());
    assert_eq!(simple_object.len(), Some(2));
    assert_eq!(simple_object.get("name"), Some(NativeValue::from("Alice")));
    assert_eq!(simple_object.get("age").and_then(|a| a.as_i64()), Some(30));
}

#[test]
fn test_gbln_macro_nested() {
    let nested = gbln!({
        "user": {
            "id": 123,
            "name": "Bob",
            "active": true
        },
        "tags": ["admin", "developer"],
        "count": 42
    });

    assert_eq!(nested.len(), Some(3));
    let user = nested.get("user").unwrap();
    assert_eq!(user.get("id"), Some(NativeValue::from(123)));
    assert_eq!(user.get("name").unwrap().as_str(), Some("Bob"));
    assert_eq!(user.get("active"), Some(NativeValue::Bool(true)));

    let tags = nested.get("tags").unwrap();
    assert_eq!(tags.len(), Some(2));
    assert_eq!(tags.at(1), Some(NativeValue::from("developer")));

    assert_eq!(nested.get("count").and_then(|c| c.as_i64()), Some(42));
}

#[test]
fn test_gbln_macro_keeps_key_order() {
    let value = gbln!({ "z": 1, "a": 2, "m": 3 });
    let text = native_to_serialized(&value, &RenderOptions::new()).unwrap();
    assert_eq!(text, "z<i8>(1)a<i8>(2)m<i8>(3)");

    // order matters for equality
    assert_ne!(value, gbln!({ "a": 2, "z": 1, "m": 3 }));
}

#[test]
fn test_gbln_macro_expressions() {
    let name = String::from("carol");
    let scores = vec![10u8, 20];
    let value = gbln!({ "name": name, "scores": scores, "bonus": (-5) });
    assert_eq!(value.get("name").unwrap().as_str(), Some("carol"));
    assert_eq!(value.get("scores").and_then(|s| s.len()), Some(2));
    assert_eq!(value.get("bonus"), Some(NativeValue::from(-5)));
}
