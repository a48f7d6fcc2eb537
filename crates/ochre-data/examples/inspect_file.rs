//! Simple tool to inspect a saved OCHRE API response.
//!
//! Usage: cargo run --example inspect_file -- <response.json> [language]
//!
//! Set `RUST_LOG=ochre_data=debug` to trace assembly.

use std::fs;

use ochre_data::{parse_response, Item, ParseOptions};
use tracing_subscriber::EnvFilter;

fn summarize(item: &Item) -> String {
    match item {
        Item::Resource(r) => format!(
            "resource \"{}\" ({} properties, {} links, {} child resources)",
            r.nested.identification.label,
            r.nested.properties.len(),
            r.nested.links.len(),
            r.nested.resources.len()
        ),
        Item::SpatialUnit(s) => format!(
            "spatial unit \"{}\" ({} observations)",
            s.base.identification.label,
            s.observations.len()
        ),
        Item::Concept(c) => format!("concept \"{}\"", c.nested.identification.label),
        Item::Set(s) => format!("set \"{}\"", s.nested.identification.label),
        Item::Tree(t) => format!("tree \"{}\"", t.nested.identification.label),
        Item::Bibliography(b) => format!("bibliography {}", b.nested.uuid),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <response.json> [language]", args[0]);
        std::process::exit(1);
    }

    let json = match fs::read_to_string(&args[1]) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args[1], e);
            std::process::exit(1);
        }
    };
    let options = match args.get(2) {
        Some(language) => ParseOptions::with_language(language),
        None => ParseOptions::default(),
    };

    match parse_response(&json, &options) {
        Ok(fetched) => {
            println!("=== {} ===", summarize(&fetched.item));
            if let Some(project) = &fetched.belongs_to {
                println!("Project: {} ({})", project.abbreviation, project.uuid);
            }
            match serde_json::to_string_pretty(&fetched) {
                Ok(pretty) => println!("{}", pretty),
                Err(e) => eprintln!("Failed to serialize: {}", e),
            }
        }
        Err(e) => {
            eprintln!("{}: {}", e.kind().name(), e);
            std::process::exit(1);
        }
    }
}
