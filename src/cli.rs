use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// LinkML OpenAPI Generator - Generate OpenAPI 3.1 documents from LinkML schemas
#[derive(Parser, Debug)]
#[command(name = "linkml-openapi")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the LinkML schema YAML file
    #[arg(value_name = "SCHEMA")]
    pub schema_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// API title (default: schema name)
    #[arg(long = "title")]
    pub title: Option<String>,

    /// API version
    #[arg(long = "api-version", default_value = "1.0.0")]
    pub api_version: String,

    /// Server base URL
    #[arg(long = "server-url", default_value = "http://localhost:8000")]
    pub server_url: String,

    /// Only generate endpoints for these classes (comma-separated)
    #[arg(long = "classes", value_delimiter = ',')]
    pub classes: Option<Vec<String>>,

    /// Treat colliding resource paths as an error
    #[arg(long = "strict")]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    // Validate schema path exists
    if !args.schema_path.exists() {
        anyhow::bail!("Schema file does not exist: {}", args.schema_path.display());
    }

    // Validate schema path is a file
    if !args.schema_path.is_file() {
        anyhow::bail!("Schema path is not a file: {}", args.schema_path.display());
    }

    info!("Schema file: {}", args.schema_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if let Some(ref classes) = args.classes {
        info!("Resource filter: {:?}", classes);
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::loader::SchemaLoader;
    use crate::openapi_builder::{GeneratorOptions, OpenApiBuilder};
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};

    info!("Starting OpenAPI document generation...");

    // Step 1: Load and resolve the schema
    info!("Loading schema from {}", args.schema_path.display());
    let view = SchemaLoader::load_file(&args.schema_path)?;
    info!(
        "Loaded schema {} with {} classes and {} enums",
        view.schema().name,
        view.schema().classes.len(),
        view.schema().enums.len()
    );

    // Step 2: Build the OpenAPI document
    info!("Building OpenAPI document...");
    let options = GeneratorOptions {
        api_title: args.title.clone(),
        api_version: args.api_version.clone(),
        server_url: args.server_url.clone(),
        resource_filter: args.classes.clone(),
        strict_paths: args.strict,
    };
    let document = OpenApiBuilder::new(&view, options).build()?;
    info!("OpenAPI document built successfully");

    // Step 3: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    // Step 4: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!(
            "Successfully wrote OpenAPI document to {}",
            output_path.display()
        );
    } else {
        println!("{}", content);
    }

    // Step 5: Display summary
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Paths generated: {}", document.paths.len());
    info!(
        "  - Component schemas: {}",
        document
            .components
            .as_ref()
            .and_then(|c| c.schemas.as_ref())
            .map_or(0, |s| s.len())
    );

    Ok(())
}
