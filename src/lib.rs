//! LinkML OpenAPI Generator - OpenAPI 3.1 documents from LinkML schemas.
//!
//! This library translates a declarative LinkML data-modeling schema
//! (classes, slots, enums, inheritance and constraints) into an OpenAPI 3.1
//! document with JSON Schema components and CRUD path definitions. Classes
//! annotated with `openapi.resource: true` (or, for unannotated schemas,
//! every concrete class with slots) receive collection and item endpoints,
//! with path and query parameters inferred from slot annotations.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`loader`] - Parses a schema YAML file into the in-memory model
//! 2. [`model`] - Schema model types (classes, slots, enums, annotations)
//! 3. [`schema_view`] - Read-only resolved view: lookups, inherited slots
//! 4. [`schema_generator`] - Converts classes, enums and slot ranges to JSON Schema
//! 5. [`resource`] - Resolves per-class annotations into endpoint configuration
//! 6. [`selector`] - Determines which classes receive endpoints
//! 7. [`endpoints`] - Synthesizes collection/item path items per resource
//! 8. [`openapi_builder`] - Assembles the complete OpenAPI document
//! 9. [`serializer`] - Serializes the document to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use linkml_openapi::loader::SchemaLoader;
//! use linkml_openapi::openapi_builder::{GeneratorOptions, OpenApiBuilder};
//! use linkml_openapi::serializer::serialize_yaml;
//! use std::path::Path;
//!
//! // Load and resolve the schema
//! let view = SchemaLoader::load_file(Path::new("person.yaml")).unwrap();
//!
//! // Build the OpenAPI document
//! let options = GeneratorOptions {
//!     api_title: Some("People API".to_string()),
//!     ..Default::default()
//! };
//! let document = OpenApiBuilder::new(&view, options).build().unwrap();
//!
//! // Serialize to YAML
//! let yaml = serialize_yaml(&document).unwrap();
//! println!("{}", yaml);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete
//! CLI application.

pub mod cli;
pub mod endpoints;
pub mod error;
pub mod loader;
pub mod model;
pub mod openapi_builder;
pub mod resource;
pub mod schema_generator;
pub mod schema_view;
pub mod selector;
pub mod serializer;
