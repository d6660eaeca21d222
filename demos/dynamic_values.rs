//! Working with native values, type hints and inference.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use serde_gbln::{
    from_native, gbln, infer, native_to_serialized, parse_to_native_with, to_native, HintPolicy,
    IntKind, NativeValue, RenderOptions, TypeHint,
};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let compact = RenderOptions::new();

    // Inference picks the narrowest hint
    for value in [
        gbln!(25),
        gbln!(200),
        gbln!(12345),
        gbln!(3.25),
        gbln!("Alice Johnson"),
    ] {
        println!("{:<20} -> {}", format!("{:?}", value), infer(&value)?);
    }
    println!();

    // An explicit hint overrides inference and is still validated
    let port = NativeValue::hinted(TypeHint::Int(IntKind::U16), gbln!(8080));
    let config = gbln!({ "host": "localhost" });
    config.set("port", port);
    println!("Config: {}", native_to_serialized(&config, &compact)?);

    config.set(
        "port",
        NativeValue::hinted(TypeHint::Int(IntKind::U16), gbln!(70000)),
    );
    if let Err(err) = native_to_serialized(&config, &compact) {
        println!("Rejected: {}\n", err);
    }

    // Hint policies decide what survives a parse
    let text = "user{id<u32>(12345)name<s64>(Alice Johnson)age<i8>(25)}";
    for policy in [HintPolicy::Reinfer, HintPolicy::Preserve] {
        let value = parse_to_native_with(text, policy)?;
        println!("{:?}: {}", policy, native_to_serialized(&value, &compact)?);
    }
    println!();

    // Structs convert to native values and back
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };
    let value = to_native(&user)?;
    println!("User as native value:");
    println!("  type:  {}", value.type_name());
    println!("  roles: {:?}", value.get("roles").and_then(|r| r.len()));
    value.set("id", gbln!(124));
    let user: User = from_native(value)?;
    println!("  back:  {:?}", user);

    Ok(())
}
