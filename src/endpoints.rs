use crate::openapi_builder::{MediaType, Operation, Parameter, PathItem, RequestBody, Response};
use crate::resource::{to_path_segment, to_snake_case, CrudOperation, ResourceConfig};
use crate::schema_generator::{Schema, SchemaGenerator};
use crate::schema_view::SchemaView;
use indexmap::IndexMap;
use log::debug;
use serde_json::json;

/// Endpoint synthesizer - emits the collection and item path items for a
/// resource from its resolved configuration
pub struct EndpointSynthesizer<'a> {
    generator: SchemaGenerator<'a>,
}

/// The path items synthesized for one resource
pub struct ResourceEndpoints {
    /// URL of the collection endpoint
    pub collection_path: String,
    /// Operations on the collection (list, create)
    pub collection: PathItem,
    /// Item URL and operations (read, update, delete); absent when the
    /// resource has no resolvable path variable
    pub item: Option<(String, PathItem)>,
}

impl<'a> EndpointSynthesizer<'a> {
    /// Create a new EndpointSynthesizer over a schema view
    pub fn new(view: &'a SchemaView) -> Self {
        Self {
            generator: SchemaGenerator::new(view),
        }
    }

    /// Synthesize the path items for a resource.
    ///
    /// Item-level operations requested without a resolvable path variable
    /// are dropped silently: a read/update/delete endpoint cannot exist
    /// without an item URL.
    pub fn synthesize(&self, config: &ResourceConfig) -> ResourceEndpoints {
        debug!(
            "Synthesizing endpoints for {} at /{}",
            config.class_name, config.path_segment
        );

        let collection_path = format!("/{}", config.path_segment);

        let mut collection = PathItem::default();
        if config.has_operation(CrudOperation::List) {
            collection.get = Some(self.list_operation(config));
        }
        if config.has_operation(CrudOperation::Create) {
            collection.post = Some(self.create_operation(config));
        }

        let item = if config.path_variables.is_empty() {
            None
        } else {
            let suffix: Vec<String> = config
                .path_variables
                .iter()
                .map(|slot| format!("{{{}}}", slot.name))
                .collect();
            let item_path = format!("{}/{}", collection_path, suffix.join("/"));

            let mut item = PathItem {
                parameters: Some(
                    config
                        .path_variables
                        .iter()
                        .map(|slot| Parameter {
                            name: slot.name.clone(),
                            location: "path".to_string(),
                            required: true,
                            schema: self.generator.param_schema(slot),
                            description: None,
                        })
                        .collect(),
                ),
                ..Default::default()
            };
            if config.has_operation(CrudOperation::Read) {
                item.get = Some(self.read_operation(config));
            }
            if config.has_operation(CrudOperation::Update) {
                item.put = Some(self.update_operation(config));
            }
            if config.has_operation(CrudOperation::Delete) {
                item.delete = Some(self.delete_operation(config));
            }
            Some((item_path, item))
        };

        ResourceEndpoints {
            collection_path,
            collection,
            item,
        }
    }

    fn list_operation(&self, config: &ResourceConfig) -> Operation {
        let class_name = &config.class_name;
        let mut parameters: Vec<Parameter> = config
            .query_params
            .iter()
            .map(|slot| Parameter {
                name: slot.name.clone(),
                location: "query".to_string(),
                required: false,
                schema: self.generator.param_schema(slot),
                description: None,
            })
            .collect();
        parameters.push(pagination_param("limit", 100));
        parameters.push(pagination_param("offset", 0));

        let mut responses = IndexMap::new();
        responses.insert(
            "200".to_string(),
            Response {
                description: format!("List of {} objects", class_name),
                content: Some(json_content(Schema::array(Schema::component_ref(
                    class_name,
                )))),
            },
        );

        Operation {
            summary: Some(format!(
                "List {}",
                to_path_segment(class_name).replace('_', " ")
            )),
            description: None,
            operation_id: Some(format!("list_{}", to_path_segment(class_name))),
            tags: Some(vec![class_name.clone()]),
            parameters: Some(parameters),
            request_body: None,
            responses,
        }
    }

    fn create_operation(&self, config: &ResourceConfig) -> Operation {
        let class_name = &config.class_name;
        let mut responses = IndexMap::new();
        responses.insert(
            "201".to_string(),
            Response {
                description: format!("{} created", class_name),
                content: Some(json_content(Schema::component_ref(class_name))),
            },
        );
        responses.insert(
            "422".to_string(),
            Response {
                description: "Validation error".to_string(),
                content: None,
            },
        );

        Operation {
            summary: Some(format!("Create a {}", class_name)),
            description: None,
            operation_id: Some(format!("create_{}", to_snake_case(class_name))),
            tags: Some(vec![class_name.clone()]),
            parameters: None,
            request_body: Some(RequestBody {
                description: None,
                required: true,
                content: json_content(Schema::component_ref(class_name)),
            }),
            responses,
        }
    }

    fn read_operation(&self, config: &ResourceConfig) -> Operation {
        let class_name = &config.class_name;
        let mut responses = IndexMap::new();
        responses.insert(
            "200".to_string(),
            Response {
                description: format!("{} details", class_name),
                content: Some(json_content(Schema::component_ref(class_name))),
            },
        );
        responses.insert(
            "404".to_string(),
            Response {
                description: "Not found".to_string(),
                content: None,
            },
        );

        Operation {
            summary: Some(format!("Get a {}", class_name)),
            description: None,
            operation_id: Some(format!("get_{}", to_snake_case(class_name))),
            tags: Some(vec![class_name.clone()]),
            parameters: None,
            request_body: None,
            responses,
        }
    }

    fn update_operation(&self, config: &ResourceConfig) -> Operation {
        let class_name = &config.class_name;
        let mut responses = IndexMap::new();
        responses.insert(
            "200".to_string(),
            Response {
                description: format!("{} updated", class_name),
                content: Some(json_content(Schema::component_ref(class_name))),
            },
        );
        responses.insert(
            "404".to_string(),
            Response {
                description: "Not found".to_string(),
                content: None,
            },
        );
        responses.insert(
            "422".to_string(),
            Response {
                description: "Validation error".to_string(),
                content: None,
            },
        );

        Operation {
            summary: Some(format!("Update a {}", class_name)),
            description: None,
            operation_id: Some(format!("update_{}", to_snake_case(class_name))),
            tags: Some(vec![class_name.clone()]),
            parameters: None,
            request_body: Some(RequestBody {
                description: None,
                required: true,
                content: json_content(Schema::component_ref(class_name)),
            }),
            responses,
        }
    }

    fn delete_operation(&self, config: &ResourceConfig) -> Operation {
        let class_name = &config.class_name;
        let mut responses = IndexMap::new();
        responses.insert(
            "204".to_string(),
            Response {
                description: format!("{} deleted", class_name),
                content: None,
            },
        );
        responses.insert(
            "404".to_string(),
            Response {
                description: "Not found".to_string(),
                content: None,
            },
        );

        Operation {
            summary: Some(format!("Delete a {}", class_name)),
            description: None,
            operation_id: Some(format!("delete_{}", to_snake_case(class_name))),
            tags: Some(vec![class_name.clone()]),
            parameters: None,
            request_body: None,
            responses,
        }
    }
}

/// One media-type content map with an `application/json` entry
fn json_content(schema: Schema) -> IndexMap<String, MediaType> {
    let mut content = IndexMap::new();
    content.insert("application/json".to_string(), MediaType { schema });
    content
}

/// Optional integer query parameter used for list pagination
fn pagination_param(name: &str, default: i64) -> Parameter {
    let mut schema = Schema::typed("integer");
    schema.default = Some(json!(default));
    Parameter {
        name: name.to_string(),
        location: "query".to_string(),
        required: false,
        schema,
        description: None,
    }
}
