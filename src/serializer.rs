//! Serialization module for converting OpenAPI documents to YAML or JSON format.
//!
//! Both formats represent the same document losslessly; map ordering is
//! preserved, so serializing the same document twice yields identical bytes.

use crate::openapi_builder::OpenApiDocument;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes an OpenAPI document to YAML format.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```no_run
/// use linkml_openapi::loader::SchemaLoader;
/// use linkml_openapi::openapi_builder::{GeneratorOptions, OpenApiBuilder};
/// use linkml_openapi::serializer::serialize_yaml;
/// use std::path::Path;
///
/// let view = SchemaLoader::load_file(Path::new("schema.yaml")).unwrap();
/// let document = OpenApiBuilder::new(&view, GeneratorOptions::default())
///     .build()
///     .unwrap();
/// let yaml = serialize_yaml(&document).unwrap();
/// println!("{}", yaml);
/// ```
pub fn serialize_yaml(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize OpenAPI document to YAML")
}

/// Serializes an OpenAPI document to JSON format with pretty printing.
///
/// The output is indented for readability, making it suitable for human
/// review and version control.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}

/// Writes string content to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!(
        "Successfully wrote {} bytes to {}",
        content.len(),
        path.display()
    );
    Ok(())
}
