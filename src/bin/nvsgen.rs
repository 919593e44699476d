//! nvsgen CLI
//!
//! Encodes a declaration table into an NVS partition image file.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use nvsgen::config::parse_size;
use nvsgen::{generate_file, Config};
use tracing_subscriber::{fmt, EnvFilter};

/// NVS partition generator
#[derive(Parser, Debug)]
#[command(name = "nvsgen")]
#[command(about = "Generate an NVS partition image from a CSV declaration table")]
#[command(version)]
struct Args {
    /// Declaration table (key,type,encoding,value)
    input: PathBuf,

    /// Output image path
    output: PathBuf,

    /// Partition size in bytes, decimal or 0x-prefixed hex
    #[arg(short, long, default_value = "0x6000", value_parser = parse_size_arg)]
    size: usize,

    /// Override the value of a key (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    overrides: Vec<(String, String)>,
}

fn parse_size_arg(text: &str) -> Result<usize, String> {
    parse_size(text).map_err(|e| e.to_string())
}

fn parse_override(text: &str) -> Result<(String, String), String> {
    text.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", text))
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nvsgen=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    tracing::info!("nvsgen v{}", nvsgen::VERSION);
    tracing::info!("Input: {}", args.input.display());
    tracing::info!("Partition size: 0x{:x}", args.size);

    let config = Config::builder().partition_size(args.size).build();
    let overrides: HashMap<String, String> = args.overrides.into_iter().collect();

    let image = match generate_file(&args.input, &overrides, &config) {
        Ok(image) => image,
        Err(e) => {
            tracing::error!("Failed to generate partition: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::write(&args.output, &image) {
        tracing::error!("Failed to write {}: {}", args.output.display(), e);
        std::process::exit(1);
    }

    tracing::info!("Wrote {} bytes to {}", image.len(), args.output.display());
}
