use crate::endpoints::EndpointSynthesizer;
use crate::error::{Error, Result};
use crate::resource::AnnotationResolver;
use crate::schema_generator::{Schema, SchemaGenerator};
use crate::schema_view::SchemaView;
use crate::selector::ResourceSelector;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// OpenAPI document builder - drives resource selection, annotation
/// resolution and endpoint synthesis, and assembles the final document
pub struct OpenApiBuilder<'a> {
    /// Resolved schema view
    view: &'a SchemaView,
    /// Generation options supplied by the embedding layer
    options: GeneratorOptions,
}

/// Options controlling document assembly
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// API title; defaults to the schema name
    pub api_title: Option<String>,
    /// API version string
    pub api_version: String,
    /// Base URL of the documented server
    pub server_url: String,
    /// Optional allow-list of class names to generate endpoints for
    pub resource_filter: Option<Vec<String>>,
    /// Treat colliding path strings as a configuration error instead of
    /// keeping the last definition
    pub strict_paths: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            api_title: None,
            api_version: "1.0.0".to_string(),
            server_url: "http://localhost:8000".to_string(),
            resource_filter: None,
            strict_paths: false,
        }
    }
}

/// OpenAPI Info object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI Server object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Server {
    /// Base URL of the server
    pub url: String,
}

/// OpenAPI PathItem object - all operations for a single path
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PathItem {
    /// Parameters shared by every operation on this path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    /// GET operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// POST operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// DELETE operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
}

/// OpenAPI Operation object - a single API operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Operation {
    /// Operation summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operation description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Operation ID
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Tags grouping operations by resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Parameters (path, query)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    /// Request body
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code
    pub responses: IndexMap<String, Response>,
}

/// OpenAPI Parameter object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter location (path, query)
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter is required
    pub required: bool,
    /// Parameter schema
    pub schema: Schema,
    /// Parameter description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI RequestBody object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestBody {
    /// Request body description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the request body is required
    pub required: bool,
    /// Content types and their schemas
    pub content: IndexMap<String, MediaType>,
}

/// OpenAPI MediaType object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaType {
    /// Schema for this media type
    pub schema: Schema,
}

/// OpenAPI Response object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    /// Response description
    pub description: String,
    /// Response content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
}

/// OpenAPI Components object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Components {
    /// Schema definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<IndexMap<String, Schema>>,
}

/// Complete OpenAPI document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenApiDocument {
    /// OpenAPI version
    pub openapi: String,
    /// API info
    pub info: Info,
    /// Documented servers
    pub servers: Vec<Server>,
    /// API paths, in resource declaration order
    pub paths: IndexMap<String, PathItem>,
    /// Components (schemas)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

impl<'a> OpenApiBuilder<'a> {
    /// Create a new OpenApiBuilder over a schema view
    pub fn new(view: &'a SchemaView, options: GeneratorOptions) -> Self {
        debug!("Initializing OpenApiBuilder");
        Self { view, options }
    }

    /// Build the complete OpenAPI document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathCollision`] when two resources synthesize the
    /// same path string and `strict_paths` is set; otherwise the last
    /// registered definition wins.
    pub fn build(&self) -> Result<OpenApiDocument> {
        let selected =
            ResourceSelector::select(self.view, self.options.resource_filter.as_deref());
        let resolver = AnnotationResolver::new(self.view);
        let synthesizer = EndpointSynthesizer::new(self.view);
        let generator = SchemaGenerator::new(self.view);

        let mut paths: IndexMap<String, PathItem> = IndexMap::new();
        for class_name in &selected {
            let Some(class) = self.view.get_class(class_name) else {
                continue;
            };
            let config = resolver.resolve(class);
            let endpoints = synthesizer.synthesize(&config);

            self.insert_path(
                &mut paths,
                endpoints.collection_path,
                endpoints.collection,
                class_name,
            )?;
            if let Some((item_path, item)) = endpoints.item {
                self.insert_path(&mut paths, item_path, item, class_name)?;
            }
        }

        let schemas = self.component_schemas(&selected, &generator);
        let components = if schemas.is_empty() {
            None
        } else {
            Some(Components {
                schemas: Some(schemas),
            })
        };

        Ok(OpenApiDocument {
            openapi: "3.1.0".to_string(),
            info: self.info(),
            servers: vec![Server {
                url: self.options.server_url.clone(),
            }],
            paths,
            components,
        })
    }

    fn info(&self) -> Info {
        let schema = self.view.schema();
        let title = match &self.options.api_title {
            Some(title) => title.clone(),
            None if !schema.name.is_empty() => schema.name.clone(),
            None => "API".to_string(),
        };
        Info {
            title,
            version: self.options.api_version.clone(),
            description: schema.description.clone(),
        }
    }

    fn insert_path(
        &self,
        paths: &mut IndexMap<String, PathItem>,
        path: String,
        item: PathItem,
        class_name: &str,
    ) -> Result<()> {
        if paths.contains_key(&path) {
            if self.options.strict_paths {
                return Err(Error::PathCollision {
                    path,
                    class: class_name.to_string(),
                });
            }
            warn!(
                "path {} synthesized more than once; keeping the definition from {}",
                path, class_name
            );
        }
        paths.insert(path, item);
        Ok(())
    }

    /// Component schemas for every class reachable from the selected
    /// resources: the resources themselves, their ancestor chains, and
    /// transitively every class or enum referenced as a slot range. Emitted
    /// in schema declaration order, classes before enums.
    fn component_schemas(
        &self,
        selected: &[String],
        generator: &SchemaGenerator,
    ) -> IndexMap<String, Schema> {
        let mut reachable_classes: HashSet<String> = HashSet::new();
        let mut reachable_enums: HashSet<String> = HashSet::new();

        let mut pending: Vec<String> = selected.to_vec();
        while let Some(class_name) = pending.pop() {
            if !reachable_classes.insert(class_name.clone()) {
                continue;
            }
            for ancestor in self.view.ancestors(&class_name) {
                if !reachable_classes.contains(&ancestor.name) {
                    pending.push(ancestor.name.clone());
                }
            }
            for slot in self.view.induced_slots(&class_name) {
                let range = slot.range_name();
                if self.view.get_class(range).is_some() {
                    if !reachable_classes.contains(range) {
                        pending.push(range.to_string());
                    }
                } else if self.view.get_enum(range).is_some() {
                    reachable_enums.insert(range.to_string());
                }
            }
        }

        let mut schemas = IndexMap::new();
        for name in self.view.class_names() {
            if reachable_classes.contains(name) {
                if let Some(class) = self.view.get_class(name) {
                    schemas.insert(name.to_string(), generator.class_schema(class));
                }
            }
        }
        for name in self.view.enum_names() {
            if reachable_enums.contains(name) {
                if let Some(enum_def) = self.view.get_enum(name) {
                    schemas.insert(name.to_string(), generator.enum_schema(enum_def));
                }
            }
        }
        schemas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SchemaLoader;
    use pretty_assertions::assert_eq;

    const SCHEMA: &str = r#"
name: person_schema
description: A schema about people
classes:
  NamedThing:
    abstract: true
    attributes:
      id:
        identifier: true
        required: true
        range: string
      name:
        range: string
  Person:
    is_a: NamedThing
    annotations:
      openapi.resource: true
      openapi.path: people
    attributes:
      status:
        range: PersonStatus
      addresses:
        range: Address
        multivalued: true
  Address:
    annotations:
      openapi.resource: true
    attributes:
      id:
        identifier: true
        required: true
        range: string
      street:
        range: string
  Organization:
    attributes:
      org_name:
        range: string
enums:
  PersonStatus:
    permissible_values:
      ALIVE:
      DEAD:
  UnusedEnum:
    permissible_values:
      A:
"#;

    fn build(options: GeneratorOptions) -> OpenApiDocument {
        let view = SchemaLoader::load_str(SCHEMA).unwrap();
        OpenApiBuilder::new(&view, options).build().unwrap()
    }

    #[test]
    fn test_document_skeleton() {
        let document = build(GeneratorOptions::default());
        assert_eq!(document.openapi, "3.1.0");
        assert_eq!(document.info.title, "person_schema");
        assert_eq!(document.info.version, "1.0.0");
        assert_eq!(
            document.info.description.as_deref(),
            Some("A schema about people")
        );
        assert_eq!(document.servers[0].url, "http://localhost:8000");
    }

    #[test]
    fn test_option_overrides() {
        let document = build(GeneratorOptions {
            api_title: Some("People API".to_string()),
            api_version: "2.0.0".to_string(),
            server_url: "https://api.example.com".to_string(),
            ..Default::default()
        });
        assert_eq!(document.info.title, "People API");
        assert_eq!(document.info.version, "2.0.0");
        assert_eq!(document.servers[0].url, "https://api.example.com");
    }

    #[test]
    fn test_paths_for_selected_resources_only() {
        let document = build(GeneratorOptions::default());
        let paths: Vec<&str> = document.paths.keys().map(String::as_str).collect();
        assert_eq!(
            paths,
            vec!["/people", "/people/{id}", "/addresses", "/addresses/{id}"]
        );
    }

    #[test]
    fn test_component_schemas_follow_reachability() {
        let document = build(GeneratorOptions::default());
        let schemas = document.components.unwrap().schemas.unwrap();
        let names: Vec<&str> = schemas.keys().map(String::as_str).collect();
        // NamedThing is pulled in as Person's ancestor, PersonStatus and
        // Address as slot ranges; Organization and UnusedEnum are not
        // reachable from any selected resource
        assert_eq!(names, vec!["NamedThing", "Person", "Address", "PersonStatus"]);
    }

    #[test]
    fn test_ancestor_emitted_even_when_not_selected() {
        let document = build(GeneratorOptions::default());
        let schemas = document.components.unwrap().schemas.unwrap();
        let person = &schemas["Person"];
        assert_eq!(
            person.all_of.as_ref().unwrap()[0].reference.as_deref(),
            Some("#/components/schemas/NamedThing")
        );
        assert!(schemas.contains_key("NamedThing"));
    }

    #[test]
    fn test_resource_filter() {
        let document = build(GeneratorOptions {
            resource_filter: Some(vec!["Address".to_string()]),
            ..Default::default()
        });
        let paths: Vec<&str> = document.paths.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["/addresses", "/addresses/{id}"]);

        let schemas = document.components.unwrap().schemas.unwrap();
        assert!(!schemas.contains_key("Person"));
        assert!(schemas.contains_key("Address"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let first = build(GeneratorOptions::default());
        let second = build(GeneratorOptions::default());
        assert_eq!(first, second);
    }

    const COLLIDING_SCHEMA: &str = r#"
name: colliding
classes:
  Person:
    annotations:
      openapi.resource: true
      openapi.path: people
    attributes:
      id:
        identifier: true
        range: string
  Human:
    annotations:
      openapi.resource: true
      openapi.path: people
    attributes:
      id:
        identifier: true
        range: string
"#;

    #[test]
    fn test_path_collision_last_wins_by_default() {
        let view = SchemaLoader::load_str(COLLIDING_SCHEMA).unwrap();
        let document = OpenApiBuilder::new(&view, GeneratorOptions::default())
            .build()
            .unwrap();

        assert_eq!(document.paths.len(), 2);
        let list = document.paths["/people"].get.as_ref().unwrap();
        assert_eq!(list.tags, Some(vec!["Human".to_string()]));
    }

    #[test]
    fn test_path_collision_strict_mode_errors() {
        let view = SchemaLoader::load_str(COLLIDING_SCHEMA).unwrap();
        let result = OpenApiBuilder::new(
            &view,
            GeneratorOptions {
                strict_paths: true,
                ..Default::default()
            },
        )
        .build();

        match result {
            Err(Error::PathCollision { path, class }) => {
                assert_eq!(path, "/people");
                assert_eq!(class, "Human");
            }
            other => panic!("expected PathCollision, got {:?}", other.map(|_| ())),
        }
    }
}
