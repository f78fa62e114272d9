//! LinkML OpenAPI Generator - Command-line tool for generating OpenAPI documents.
//!
//! This binary provides a command-line interface for generating OpenAPI 3.1
//! documents from LinkML schema files. It reads the schema, resolves resource
//! annotations, and emits a complete OpenAPI document in YAML or JSON.
//!
//! # Usage
//!
//! ```bash
//! linkml-openapi [OPTIONS] <SCHEMA>
//! ```
//!
//! # Examples
//!
//! Generate a YAML document:
//! ```bash
//! linkml-openapi person.yaml -o openapi.yaml
//! ```
//!
//! Generate a JSON document:
//! ```bash
//! linkml-openapi person.yaml -f json -o openapi.json
//! ```
//!
//! Limit generation to specific classes:
//! ```bash
//! linkml-openapi person.yaml --classes Person,Address
//! ```

use anyhow::Result;
use clap::Parser;
use linkml_openapi::cli;
use log::info;

fn main() -> Result<()> {
    // Parse args first so the verbose flag can drive logger initialization
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("LinkML OpenAPI Generator starting...");

    // Full validation after the logger is up
    let args = cli::parse_args_from_parsed(args)?;

    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
