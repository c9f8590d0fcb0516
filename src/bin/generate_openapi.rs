//! Writes the service's OpenAPI document.
//!
//! Usage:
//!   cargo run --bin generate_openapi > openapi.json
//!   cargo run --bin generate_openapi -- --output openapi.json

use std::{
    env, fs,
    io::{self, Write},
    path::PathBuf,
    process,
};

use room_monitor_service::api::handlers::ApiDoc;
use utoipa::OpenApi;

fn main() {
    let json = match ApiDoc::openapi().to_pretty_json() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to serialise OpenAPI document: {e}");
            process::exit(1);
        }
    };

    let output_path = flag_value(env::args(), "--output").map(PathBuf::from);

    let written = match &output_path {
        Some(path) => fs::write(path, &json),
        None => io::stdout().write_all(json.as_bytes()),
    };

    match (written, output_path) {
        (Ok(()), Some(path)) => eprintln!("OpenAPI document written to {}", path.display()),
        (Ok(()), None) => {}
        (Err(e), _) => {
            eprintln!("Error writing OpenAPI document: {e}");
            process::exit(1);
        }
    }
}

fn flag_value(args: impl Iterator<Item = String>, flag: &str) -> Option<String> {
    let args: Vec<String> = args.collect();
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}
