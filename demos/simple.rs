//! Basic GBLN serialization and deserialization.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_gbln::{from_str, to_string, to_string_pretty};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    email: String,
    age: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let users = vec![
        User {
            id: 42,
            name: "Alice Johnson".to_string(),
            email: "alice@example.com".to_string(),
            age: 25,
        },
        User {
            id: 70000,
            name: "Bob Smith".to_string(),
            email: "bob@example.com".to_string(),
            age: 31,
        },
    ];

    // Serialize to GBLN; every leaf gets the narrowest hint that fits
    let gbln = to_string(&users)?;
    println!("GBLN output:\n{}\n", gbln);

    println!("Pretty:\n{}", to_string_pretty(&users)?);

    // Deserialize back to struct
    let users_back: Vec<User> = from_str(&gbln)?;
    assert_eq!(users, users_back);
    println!("✓ Round-trip successful\n");

    // Hints are enforced when parsing
    match from_str::<User>("id<u32>(1)name<s8>(Eve)email<s4>(eve@example.com)age<u8>(20)") {
        Ok(user) => println!("unexpected: {:?}", user),
        Err(err) => println!("Rejected: {}", err),
    }

    Ok(())
}
