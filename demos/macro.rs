//! Using the gbln! macro for dynamic value construction.
//!
//! Run with: cargo run --example macro

use serde_gbln::{gbln, native_to_serialized, NativeValue, RenderOptions};
use std::error::Error;

fn render(value: &NativeValue) -> Result<String, serde_gbln::Error> {
    native_to_serialized(value, &RenderOptions::new())
}

fn main() -> Result<(), Box<dyn Error>> {
    let null_val = gbln!(null);
    let bool_val = gbln!(true);
    let number = gbln!(42);
    let text = gbln!("Hello, GBLN!");

    println!("Primitives:");
    println!("  null:   {}", render(&null_val)?);
    println!("  bool:   {}", render(&bool_val)?);
    println!("  number: {}", render(&number)?);
    println!("  text:   {}\n", render(&text)?);

    let numbers = gbln!([1, 200, 40000, (-5)]);
    let mixed = gbln!([1, "two", true, null]);

    println!("Arrays:");
    println!("  Numbers: {}", render(&numbers)?);
    println!("  Mixed:   {}\n", render(&mixed)?);

    let config = gbln!({
        "app": {
            "name": "MyApp",
            "version": "1.0.0"
        },
        "database": {
            "host": "localhost",
            "port": 5432,
            "name": "mydb"
        },
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    println!("Nested structures:");
    println!("{}", native_to_serialized(&config, &RenderOptions::pretty())?);

    let items = gbln!([
        {"id": 1, "status": "active"},
        {"id": 2, "status": "pending"}
    ]);
    items.push(gbln!({"id": 3, "status": "completed"}));

    let summary = gbln!({ "total": 3 });
    summary.set("items", items);

    println!("Dynamic construction:");
    println!("{}", native_to_serialized(&summary, &RenderOptions::pretty())?);

    println!("Accessing values:");
    if let Some(name) = config.get("app").and_then(|app| app.get("name")) {
        println!("  App name: {}", name.as_str().unwrap_or_default());
    }
    if let Some(len) = config.get("features").and_then(|f| f.len()) {
        println!("  Features: {}", len);
    }

    Ok(())
}
