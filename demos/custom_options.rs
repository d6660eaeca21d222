//! Customizing GBLN output with RenderOptions.
//!
//! Run with: cargo run --example custom_options

use serde::{Deserialize, Serialize};
use serde_gbln::{reformat, roundtrip, to_string_with_options, to_writer_with_options, RenderOptions};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Config {
    name: String,
    version: String,
    debug: bool,
    limits: Limits,
}

#[derive(Debug, Serialize, Deserialize)]
struct Limits {
    connections: u16,
    timeouts: Vec<u32>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config {
        name: "MyApp".to_string(),
        version: "1.0.0".to_string(),
        debug: true,
        limits: Limits {
            connections: 512,
            timeouts: vec![30, 300, 3000],
        },
    };

    println!("Default (compact):");
    println!("{}\n", serde_gbln::to_string(&config)?);

    println!("Pretty, 2-space indent:");
    println!("{}", to_string_with_options(&config, &RenderOptions::pretty())?);

    println!("Pretty, 4-space indent:");
    let wide = RenderOptions::pretty().with_indent(4);
    println!("{}", to_string_with_options(&config, &wide)?);

    // Comments in a parsed document are hoisted and kept on request
    let text = "\
:| service settings
server {
  host<s16>(localhost)
  port<u16>(8080)   :| default port
}
";
    println!("roundtrip (comments stripped):");
    println!("{}\n", roundtrip(text)?);

    println!("reformat keeping comments:");
    let keep = RenderOptions::pretty().with_strip_comments(false);
    println!("{}", reformat(text, &keep)?);

    println!("Writing to stdout:");
    to_writer_with_options(std::io::stdout(), &config.limits, &RenderOptions::new())?;
    println!();

    Ok(())
}
