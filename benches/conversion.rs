use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_gbln::{
    from_str, native_to_serialized, parse_to_native, roundtrip, to_native, to_string, Allocator,
    Converter, NativeValue, RenderOptions,
};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

fn user() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    }
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

fn benchmark_serialize_simple(c: &mut Criterion) {
    let user = user();

    c.bench_function("serialize_simple_struct", |b| {
        b.iter(|| to_string(black_box(&user)))
    });
}

fn benchmark_deserialize_simple(c: &mut Criterion) {
    let gbln = "id<u32>(123)name<s8>(Alice)email<s32>(alice@example.com)active<b>(t)";

    c.bench_function("deserialize_simple_struct", |b| {
        b.iter(|| from_str::<User>(black_box(gbln)))
    });
}

fn benchmark_serialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_array");

    for size in [10, 50, 100, 500].iter() {
        let products = products(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(&products)))
        });
    }
    group.finish();
}

fn benchmark_deserialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_array");

    for size in [10, 50, 100, 500].iter() {
        let gbln = to_string(&products(*size)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &gbln, |b, gbln| {
            b.iter(|| from_str::<Vec<Product>>(black_box(gbln)))
        });
    }
    group.finish();
}

fn benchmark_tree_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_conversion");
    let native = to_native(&products(100)).unwrap();

    group.bench_function("native_to_tree", |b| {
        b.iter(|| {
            let alloc = Allocator::new();
            let tree = Converter::new(&alloc).native_to_tree(black_box(&native)).unwrap();
            tree.release().unwrap();
        })
    });

    group.bench_function("native_to_tree_to_native", |b| {
        b.iter(|| {
            let alloc = Allocator::new();
            let converter = Converter::new(&alloc);
            let tree = converter.native_to_tree(black_box(&native)).unwrap();
            converter.tree_to_native(tree).unwrap()
        })
    });

    group.finish();
}

fn benchmark_render_layouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let native = to_native(&products(100)).unwrap();
    let compact = RenderOptions::new();
    let pretty = RenderOptions::pretty();

    group.bench_function("compact", |b| {
        b.iter(|| native_to_serialized(black_box(&native), &compact))
    });

    group.bench_function("pretty", |b| {
        b.iter(|| native_to_serialized(black_box(&native), &pretty))
    });

    group.finish();
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let text = to_string(&products(100)).unwrap();

    group.bench_function("parse_to_native", |b| {
        b.iter(|| parse_to_native(black_box(&text)))
    });

    group.bench_function("roundtrip", |b| b.iter(|| roundtrip(black_box(&text))));

    group.finish();
}

fn benchmark_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_strings");

    let short = "short";
    let medium = "This is a medium length string with (some) content";
    let long = "x".repeat(1000);

    group.bench_function("short_string", |b| b.iter(|| to_string(black_box(&short))));

    group.bench_function("medium_string", |b| {
        b.iter(|| to_string(black_box(&medium)))
    });

    group.bench_function("long_string", |b| b.iter(|| to_string(black_box(&long))));

    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let user = user();

    let mut group = c.benchmark_group("comparison");

    group.bench_function("gbln_serialize", |b| {
        b.iter(|| serde_gbln::to_string(black_box(&user)))
    });

    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(&user)))
    });

    let gbln_str = serde_gbln::to_string(&user).unwrap();
    let json_str = serde_json::to_string(&user).unwrap();

    group.bench_function("gbln_deserialize", |b| {
        b.iter(|| serde_gbln::from_str::<User>(black_box(&gbln_str)))
    });

    group.bench_function("json_deserialize", |b| {
        b.iter(|| serde_json::from_str::<User>(black_box(&json_str)))
    });

    group.finish();
}

fn benchmark_inference(c: &mut Criterion) {
    let values: Vec<NativeValue> = (0..100)
        .map(|i| match i % 3 {
            0 => NativeValue::from(i64::from(i) * 1_000_003),
            1 => NativeValue::from(format!("value {}", i)),
            _ => NativeValue::from(f64::from(i) / 7.0),
        })
        .collect();

    c.bench_function("infer_mixed_leaves", |b| {
        b.iter(|| {
            for value in &values {
                let _ = serde_gbln::infer(black_box(value));
            }
        })
    });
}

criterion_group!(
    benches,
    benchmark_serialize_simple,
    benchmark_deserialize_simple,
    benchmark_serialize_array,
    benchmark_deserialize_array,
    benchmark_tree_conversion,
    benchmark_render_layouts,
    benchmark_parse,
    benchmark_strings,
    benchmark_comparison_with_json,
    benchmark_inference
);
criterion_main!(benches);
