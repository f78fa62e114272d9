use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Annotation mapping: free-form string tag -> YAML value.
///
/// Schema authors write annotation values as plain YAML scalars, so a value
/// may arrive as a boolean, number or string. Use [`annotation_text`] to
/// normalize a value to its textual form.
pub type Annotations = IndexMap<String, Value>;

/// Normalize an annotation value to text.
///
/// Booleans become `"true"`/`"false"`, numbers their decimal form. The
/// structured LinkML form `{tag: ..., value: ...}` is unwrapped to its
/// `value` entry. Other shapes (arrays, null) yield `None`.
pub fn annotation_text(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("value").and_then(annotation_text),
        _ => None,
    }
}

/// Look up an annotation by tag and normalize it to text.
fn lookup(annotations: &Option<Annotations>, tag: &str) -> Option<String> {
    annotations
        .as_ref()
        .and_then(|a| a.get(tag))
        .and_then(annotation_text)
}

/// Schema definition - the root of a LinkML schema
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemaDefinition {
    /// Unique identifier (URI) for the schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Name of the schema
    #[serde(default)]
    pub name: String,

    /// Description of the schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Class definitions, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub classes: IndexMap<String, ClassDefinition>,

    /// Top-level reusable slot definitions
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub slots: IndexMap<String, SlotDefinition>,

    /// Enum definitions, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub enums: IndexMap<String, EnumDefinition>,
}

/// Class definition
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClassDefinition {
    /// Name of the class (filled from the map key after loading)
    #[serde(default)]
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Is this class abstract?
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_: Option<bool>,

    /// Is this a mixin?
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixin: Option<bool>,

    /// Parent class (single inheritance)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_a: Option<String>,

    /// Names of top-level slots used by this class
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<String>,

    /// Per-class slot overrides, keyed by slot name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub slot_usage: IndexMap<String, SlotDefinition>,

    /// Attributes (slots declared inline on this class)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, SlotDefinition>,

    /// Annotations for the class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

impl ClassDefinition {
    pub fn is_abstract(&self) -> bool {
        self.abstract_.unwrap_or(false)
    }

    pub fn is_mixin(&self) -> bool {
        self.mixin.unwrap_or(false)
    }

    /// Read a class annotation by tag, normalized to text.
    pub fn annotation(&self, tag: &str) -> Option<String> {
        lookup(&self.annotations, tag)
    }
}

/// Slot definition
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SlotDefinition {
    /// Name of the slot (filled from the map key after loading)
    #[serde(default)]
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Range (type) of the slot: a primitive, enum or class name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,

    /// Is this slot required?
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Is this slot multivalued?
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multivalued: Option<bool>,

    /// Is this slot an identifier?
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<bool>,

    /// Pattern for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Minimum value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_value: Option<Value>,

    /// Maximum value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_value: Option<Value>,

    /// Annotations for the slot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

impl SlotDefinition {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    pub fn is_multivalued(&self) -> bool {
        self.multivalued.unwrap_or(false)
    }

    pub fn is_identifier(&self) -> bool {
        self.identifier.unwrap_or(false)
    }

    /// The declared range, defaulting to `string` when absent.
    pub fn range_name(&self) -> &str {
        self.range.as_deref().unwrap_or("string")
    }

    /// Read a slot annotation by tag, normalized to text.
    pub fn annotation(&self, tag: &str) -> Option<String> {
        lookup(&self.annotations, tag)
    }

    /// Apply a `slot_usage` override on top of this slot.
    ///
    /// Fields set on the override win; annotations merge per tag with the
    /// override taking precedence. The base slot's name is kept.
    pub fn with_usage(&self, usage: &SlotDefinition) -> SlotDefinition {
        let mut merged = self.clone();
        if usage.description.is_some() {
            merged.description = usage.description.clone();
        }
        if usage.range.is_some() {
            merged.range = usage.range.clone();
        }
        if usage.required.is_some() {
            merged.required = usage.required;
        }
        if usage.multivalued.is_some() {
            merged.multivalued = usage.multivalued;
        }
        if usage.identifier.is_some() {
            merged.identifier = usage.identifier;
        }
        if usage.pattern.is_some() {
            merged.pattern = usage.pattern.clone();
        }
        if usage.minimum_value.is_some() {
            merged.minimum_value = usage.minimum_value.clone();
        }
        if usage.maximum_value.is_some() {
            merged.maximum_value = usage.maximum_value.clone();
        }
        if let Some(overrides) = &usage.annotations {
            let annotations = merged.annotations.get_or_insert_with(IndexMap::new);
            for (tag, value) in overrides {
                annotations.insert(tag.clone(), value.clone());
            }
        }
        merged
    }
}

/// Enum definition
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnumDefinition {
    /// Name of the enum (filled from the map key after loading)
    #[serde(default)]
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Permissible values, in declaration order; metadata is optional
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub permissible_values: IndexMap<String, Option<PermissibleValue>>,
}

impl EnumDefinition {
    /// Permissible value names in declaration order.
    pub fn value_names(&self) -> Vec<String> {
        self.permissible_values.keys().cloned().collect()
    }
}

/// Metadata attached to a permissible value
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PermissibleValue {
    /// Description of this permissible value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Meaning URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_annotation_text_scalars() {
        assert_eq!(annotation_text(&json!(true)), Some("true".to_string()));
        assert_eq!(annotation_text(&json!(false)), Some("false".to_string()));
        assert_eq!(annotation_text(&json!(42)), Some("42".to_string()));
        assert_eq!(annotation_text(&json!("people")), Some("people".to_string()));
        assert_eq!(annotation_text(&json!(null)), None);
    }

    #[test]
    fn test_annotation_text_structured_form() {
        let value = json!({"tag": "openapi.resource", "value": true});
        assert_eq!(annotation_text(&value), Some("true".to_string()));
    }

    #[test]
    fn test_class_annotation_lookup() {
        let mut annotations = Annotations::new();
        annotations.insert("openapi.path".to_string(), json!("people"));
        let class = ClassDefinition {
            name: "Person".to_string(),
            annotations: Some(annotations),
            ..Default::default()
        };

        assert_eq!(class.annotation("openapi.path"), Some("people".to_string()));
        assert_eq!(class.annotation("openapi.resource"), None);
    }

    #[test]
    fn test_slot_defaults() {
        let slot = SlotDefinition::default();
        assert!(!slot.is_required());
        assert!(!slot.is_multivalued());
        assert!(!slot.is_identifier());
        assert_eq!(slot.range_name(), "string");
    }

    #[test]
    fn test_with_usage_overrides_fields() {
        let base = SlotDefinition {
            name: "id".to_string(),
            range: Some("string".to_string()),
            required: Some(true),
            ..Default::default()
        };
        let usage = SlotDefinition {
            range: Some("integer".to_string()),
            ..Default::default()
        };

        let merged = base.with_usage(&usage);
        assert_eq!(merged.name, "id");
        assert_eq!(merged.range_name(), "integer");
        assert!(merged.is_required());
    }

    #[test]
    fn test_with_usage_merges_annotations() {
        let mut base_annotations = Annotations::new();
        base_annotations.insert("openapi.query_param".to_string(), json!(true));
        let base = SlotDefinition {
            name: "name".to_string(),
            annotations: Some(base_annotations),
            ..Default::default()
        };

        let mut usage_annotations = Annotations::new();
        usage_annotations.insert("openapi.path_variable".to_string(), json!(true));
        let usage = SlotDefinition {
            annotations: Some(usage_annotations),
            ..Default::default()
        };

        let merged = base.with_usage(&usage);
        assert_eq!(
            merged.annotation("openapi.query_param"),
            Some("true".to_string())
        );
        assert_eq!(
            merged.annotation("openapi.path_variable"),
            Some("true".to_string())
        );
    }

    #[test]
    fn test_enum_value_names_preserve_order() {
        let mut values = IndexMap::new();
        values.insert("ALIVE".to_string(), None);
        values.insert("DEAD".to_string(), None);
        values.insert("UNKNOWN".to_string(), None);
        let enum_def = EnumDefinition {
            name: "PersonStatus".to_string(),
            permissible_values: values,
            ..Default::default()
        };

        assert_eq!(enum_def.value_names(), vec!["ALIVE", "DEAD", "UNKNOWN"]);
    }
}
