use crate::model::{ClassDefinition, SlotDefinition};
use crate::schema_view::SchemaView;
use log::debug;

/// Class-level annotation marking a class as a REST resource (`"true"`/`"false"`)
pub const RESOURCE_ANNOTATION: &str = "openapi.resource";
/// Class-level annotation overriding the URL path segment
pub const PATH_ANNOTATION: &str = "openapi.path";
/// Class-level annotation restricting the CRUD operation set
pub const OPERATIONS_ANNOTATION: &str = "openapi.operations";
/// Slot-level annotation marking a slot as an item path variable
pub const PATH_VARIABLE_ANNOTATION: &str = "openapi.path_variable";
/// Slot-level annotation marking a slot as a list query parameter
pub const QUERY_PARAM_ANNOTATION: &str = "openapi.query_param";

/// The CRUD operations a resource can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudOperation {
    List,
    Create,
    Read,
    Update,
    Delete,
}

impl CrudOperation {
    /// All operations, in canonical order
    pub const ALL: [CrudOperation; 5] = [
        CrudOperation::List,
        CrudOperation::Create,
        CrudOperation::Read,
        CrudOperation::Update,
        CrudOperation::Delete,
    ];

    /// Parse an `openapi.operations` token. Unknown tokens yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "list" => Some(CrudOperation::List),
            "create" => Some(CrudOperation::Create),
            "read" => Some(CrudOperation::Read),
            "update" => Some(CrudOperation::Update),
            "delete" => Some(CrudOperation::Delete),
            _ => None,
        }
    }
}

/// Resolved per-class endpoint configuration.
///
/// Produced once per class by the [`AnnotationResolver`]; downstream stages
/// read this struct instead of probing the annotation mapping ad hoc.
#[derive(Debug, Clone)]
pub struct ResourceConfig {
    /// Name of the class this configuration belongs to
    pub class_name: String,
    /// The raw `openapi.resource` flag; `None` when the class is unannotated
    pub resource: Option<bool>,
    /// URL path segment for the collection endpoint
    pub path_segment: String,
    /// Operations to expose, in canonical order; never empty
    pub operations: Vec<CrudOperation>,
    /// Slots embedded in the item URL path, in declaration order
    pub path_variables: Vec<SlotDefinition>,
    /// Slots exposed as list query parameters, in declaration order
    pub query_params: Vec<SlotDefinition>,
}

impl ResourceConfig {
    pub fn has_operation(&self, op: CrudOperation) -> bool {
        self.operations.contains(&op)
    }
}

/// Annotation resolver - turns the free-form annotation mapping of a class
/// into a [`ResourceConfig`]
pub struct AnnotationResolver<'a> {
    view: &'a SchemaView,
}

fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

impl<'a> AnnotationResolver<'a> {
    /// Create a new AnnotationResolver over a schema view
    pub fn new(view: &'a SchemaView) -> Self {
        Self { view }
    }

    /// Resolve the endpoint configuration for a class.
    pub fn resolve(&self, class: &ClassDefinition) -> ResourceConfig {
        debug!("Resolving resource configuration for class {}", class.name);

        let induced = self.view.induced_slots(&class.name);

        ResourceConfig {
            class_name: class.name.clone(),
            resource: class
                .annotation(RESOURCE_ANNOTATION)
                .map(|value| is_true(&value)),
            path_segment: self.path_segment(class),
            operations: self.operations(class),
            path_variables: self.path_variables(&induced),
            query_params: self.query_params(&induced),
        }
    }

    /// The URL path segment: the `openapi.path` annotation verbatim (leading
    /// slashes trimmed), or the snake-cased, pluralized class name.
    fn path_segment(&self, class: &ClassDefinition) -> String {
        match class.annotation(PATH_ANNOTATION) {
            Some(path) => path.trim_start_matches('/').to_string(),
            None => to_path_segment(&class.name),
        }
    }

    /// The operation set: `openapi.operations` parsed as a comma-separated
    /// list, unknown tokens ignored. Absent, empty, or entirely unrecognized
    /// values yield the full CRUD set.
    fn operations(&self, class: &ClassDefinition) -> Vec<CrudOperation> {
        let Some(value) = class.annotation(OPERATIONS_ANNOTATION) else {
            return CrudOperation::ALL.to_vec();
        };

        let mut requested = Vec::new();
        for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match CrudOperation::parse(token) {
                Some(op) if !requested.contains(&op) => requested.push(op),
                Some(_) => {}
                None => debug!(
                    "Ignoring unknown operation token {} on class {}",
                    token, class.name
                ),
            }
        }

        if requested.is_empty() {
            return CrudOperation::ALL.to_vec();
        }
        // Canonical order, independent of annotation order
        CrudOperation::ALL
            .into_iter()
            .filter(|op| requested.contains(op))
            .collect()
    }

    /// Path variable slots: those annotated `openapi.path_variable: true`
    /// for this class, in declaration order. Falls back to the identifier
    /// slot, then to a slot literally named `id`. An empty result means the
    /// resource has no item endpoints.
    fn path_variables(&self, induced: &[SlotDefinition]) -> Vec<SlotDefinition> {
        let annotated: Vec<SlotDefinition> = induced
            .iter()
            .filter(|slot| {
                slot.annotation(PATH_VARIABLE_ANNOTATION)
                    .is_some_and(|v| is_true(&v))
            })
            .cloned()
            .collect();
        if !annotated.is_empty() {
            return annotated;
        }

        if let Some(identifier) = induced.iter().find(|slot| slot.is_identifier()) {
            return vec![identifier.clone()];
        }
        if let Some(id_slot) = induced.iter().find(|slot| slot.name == "id") {
            return vec![id_slot.clone()];
        }
        Vec::new()
    }

    /// Query parameter slots: those annotated `openapi.query_param: true`
    /// for this class, in declaration order. With no annotations, every
    /// non-multivalued, non-identifier slot with a filterable range (string,
    /// integer, boolean, or an enum) is inferred.
    fn query_params(&self, induced: &[SlotDefinition]) -> Vec<SlotDefinition> {
        let annotated: Vec<SlotDefinition> = induced
            .iter()
            .filter(|slot| {
                slot.annotation(QUERY_PARAM_ANNOTATION)
                    .is_some_and(|v| is_true(&v))
            })
            .cloned()
            .collect();
        if !annotated.is_empty() {
            return annotated;
        }

        induced
            .iter()
            .filter(|slot| !slot.is_multivalued() && !slot.is_identifier())
            .filter(|slot| {
                let range = slot.range_name();
                matches!(range, "string" | "integer" | "boolean")
                    || self.view.get_enum(range).is_some()
            })
            .cloned()
            .collect()
    }
}

/// Convert CamelCase to snake_case.
pub fn to_snake_case(name: &str) -> String {
    let mut snake = String::with_capacity(name.len());
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() && prev_lower {
            snake.push('_');
        }
        prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        snake.push(ch.to_ascii_lowercase());
    }
    snake
}

/// Simple English pluralization for URL paths.
pub fn pluralize(name: &str) -> String {
    if name.ends_with('s') || name.ends_with('x') || name.ends_with('z') {
        return format!("{}es", name);
    }
    if name.ends_with('y') {
        let bytes = name.as_bytes();
        if bytes.len() < 2 || !matches!(bytes[bytes.len() - 2], b'a' | b'e' | b'o' | b'u') {
            return format!("{}ies", &name[..name.len() - 1]);
        }
    }
    format!("{}s", name)
}

/// Convert a class name to a URL path segment: CamelCase -> snake_case -> plural.
pub fn to_path_segment(name: &str) -> String {
    pluralize(&to_snake_case(name))
}
