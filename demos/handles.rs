//! Building and inspecting value trees through allocator handles.
//!
//! Run with: cargo run --example handles

use serde_gbln::{
    parse, Allocator, Converter, IntKind, RenderOptions, Renderer, StrTier, ValueType,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let alloc = Allocator::new();

    // Every constructor validates; the guard owns the node until it is moved
    let user = alloc.new_object();
    user.insert("id", alloc.new_integer(IntKind::U32, 12345)?)?;
    user.insert("name", alloc.new_string("Alice Johnson", Some(StrTier::S64))?)?;
    user.insert("age", alloc.new_integer(IntKind::I8, 25)?)?;

    let tags = alloc.new_array();
    tags.push(alloc.new_string("admin", None)?)?;
    tags.push(alloc.new_bool(true))?;
    user.insert("tags", tags)?;

    let text = Renderer::new(&alloc, RenderOptions::new()).render(user.handle(), &[])?;
    println!("Built by hand: {}", text);
    println!("Live nodes: {}\n", alloc.stats().live);

    // Validation failures allocate nothing
    if let Err(err) = alloc.new_integer(IntKind::I8, 999) {
        println!("Rejected: {}", err);
    }
    if let Err(err) = user.insert("id", alloc.new_null()) {
        println!("Rejected: {}", err);
    }

    // Reading never transfers ownership
    for key in alloc.object_keys(user.handle())? {
        let child = alloc.object_get(user.handle(), &key)?;
        let kind = alloc.type_of(child)?;
        match kind {
            ValueType::Integer => println!("  {} = {}", key, alloc.as_integer(child)?),
            ValueType::String => println!("  {} = {:?}", key, alloc.as_str(child)?.as_str()),
            other => println!("  {} is {}", key, other),
        }
    }

    // Releasing the root tears down the whole tree
    user.release()?;
    let stats = alloc.stats();
    println!(
        "\nAfter release: allocated {}, freed {}, live {}",
        stats.allocated, stats.freed, stats.live
    );

    // Parsed documents live in the same kind of allocator
    let doc = parse(&alloc, "point{x<i16>(-3)y<i16>(7)}")?;
    let value = Converter::new(&alloc).tree_to_native(doc.into_root())?;
    println!("Parsed to native: {:?}", value.get("point").and_then(|p| p.get("y")));
    println!("Live nodes after conversion: {}", alloc.stats().live);

    Ok(())
}
