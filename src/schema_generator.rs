use crate::model::{ClassDefinition, EnumDefinition, SlotDefinition};
use crate::schema_view::SchemaView;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema generator - converts schema classes, enums and slot ranges to
/// OpenAPI component schemas
pub struct SchemaGenerator<'a> {
    /// Schema view for resolving ranges and slots
    view: &'a SchemaView,
}

/// OpenAPI Schema definition (a JSON Schema fragment)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Schema {
    /// The type of the schema (string, integer, object, array, etc.)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Format for primitive types (e.g., "date-time", "uri", "double")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Properties for object types, in declaration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    /// Required property names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Enum values for enum types
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Reference to another schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Composition of subschemas (parent reference plus own properties)
    #[serde(rename = "allOf", skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,
    /// Pattern constraint for string values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Minimum value constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Value>,
    /// Maximum value constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Value>,
    /// Default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Schema {
    /// A schema with only a `type`.
    pub fn typed(schema_type: &str) -> Self {
        Schema {
            schema_type: Some(schema_type.to_string()),
            ..Default::default()
        }
    }

    /// A `$ref` to a named component schema.
    pub fn component_ref(name: &str) -> Self {
        Schema {
            reference: Some(format!("#/components/schemas/{}", name)),
            ..Default::default()
        }
    }

    /// An array schema wrapping the given items schema.
    pub fn array(items: Schema) -> Self {
        Schema {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self.schema_type.as_deref(), Some("integer") | Some("number"))
    }
}

/// Map a primitive range name to its type/format pair. Unknown names fall
/// back to a plain string rather than failing the run.
fn primitive_schema(range: &str) -> Schema {
    let (schema_type, format) = match range {
        "string" => ("string", None),
        "integer" => ("integer", None),
        "float" => ("number", Some("float")),
        "double" => ("number", Some("double")),
        "boolean" => ("boolean", None),
        "date" => ("string", Some("date")),
        "datetime" => ("string", Some("date-time")),
        "uri" | "uriorcurie" => ("string", Some("uri")),
        "decimal" => ("number", None),
        "ncname" => ("string", None),
        "nodeidentifier" => ("string", Some("uri")),
        other => {
            debug!("Unknown range {}, falling back to string", other);
            ("string", None)
        }
    };

    Schema {
        schema_type: Some(schema_type.to_string()),
        format: format.map(|f| f.to_string()),
        ..Default::default()
    }
}

impl<'a> SchemaGenerator<'a> {
    /// Create a new SchemaGenerator over a schema view
    pub fn new(view: &'a SchemaView) -> Self {
        debug!("Initializing SchemaGenerator");
        Self { view }
    }

    /// Map a slot range to a schema fragment.
    ///
    /// A range naming a class or enum declared in the schema becomes a
    /// `$ref`; anything else is treated as a primitive. Multivalued ranges
    /// are wrapped in an array schema.
    pub fn range_schema(&self, range: &str, multivalued: bool) -> Schema {
        let base = if self.view.is_class_or_enum(range) {
            Schema::component_ref(range)
        } else {
            primitive_schema(range)
        };

        if multivalued {
            Schema::array(base)
        } else {
            base
        }
    }

    /// Apply slot-level constraints onto a schema fragment, returning a new
    /// fragment. The input is never mutated.
    ///
    /// `minimum`/`maximum` only apply to numeric fragments; `required` and
    /// `identifier` never alter the fragment (they are consumed by the
    /// owning object schema and the annotation resolver respectively).
    pub fn apply_constraints(slot: &SlotDefinition, schema: &Schema) -> Schema {
        let mut constrained = schema.clone();
        if let Some(description) = &slot.description {
            constrained.description = Some(description.clone());
        }
        if let Some(pattern) = &slot.pattern {
            constrained.pattern = Some(pattern.clone());
        }
        if constrained.is_numeric() {
            if let Some(minimum) = &slot.minimum_value {
                constrained.minimum = Some(minimum.clone());
            }
            if let Some(maximum) = &slot.maximum_value {
                constrained.maximum = Some(maximum.clone());
            }
        }
        constrained
    }

    /// The schema for a slot as an object property: range fragment, array
    /// wrapping for multivalued slots, constraints applied.
    pub fn slot_schema(&self, slot: &SlotDefinition) -> Schema {
        let base = self.range_schema(slot.range_name(), slot.is_multivalued());
        Self::apply_constraints(slot, &base)
    }

    /// The schema for a slot used as a path or query parameter: always the
    /// scalar fragment, even for multivalued slots.
    pub fn param_schema(&self, slot: &SlotDefinition) -> Schema {
        let base = self.range_schema(slot.range_name(), false);
        Self::apply_constraints(slot, &base)
    }

    /// Build the component schema for a class.
    ///
    /// The object lists only slots declared directly on the class, in
    /// declaration order; a class with a parent composes the parent by
    /// reference through `allOf`, so inherited slots live in the parent
    /// schema.
    pub fn class_schema(&self, class: &ClassDefinition) -> Schema {
        debug!("Generating component schema for class {}", class.name);

        let mut properties = IndexMap::new();
        let mut required = Vec::new();
        for slot in self.view.own_slots(&class.name) {
            properties.insert(slot.name.clone(), self.slot_schema(&slot));
            if slot.is_required() {
                required.push(slot.name.clone());
            }
        }

        let mut own_object = Schema::typed("object");
        if !properties.is_empty() {
            own_object.properties = Some(properties);
        }
        if !required.is_empty() {
            own_object.required = Some(required);
        }

        match &class.is_a {
            Some(parent) => Schema {
                description: class.description.clone(),
                all_of: Some(vec![Schema::component_ref(parent), own_object]),
                ..Default::default()
            },
            None => Schema {
                description: class.description.clone(),
                ..own_object
            },
        }
    }

    /// Build the component schema for an enum: a string constrained to the
    /// permissible value names in declaration order.
    pub fn enum_schema(&self, enum_def: &EnumDefinition) -> Schema {
        debug!("Generating component schema for enum {}", enum_def.name);

        let mut schema = Schema::typed("string");
        schema.description = enum_def.description.clone();
        let values = enum_def.value_names();
        if !values.is_empty() {
            schema.enum_values = Some(values);
        }
        schema
    }
}
