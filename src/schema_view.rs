use crate::model::{ClassDefinition, EnumDefinition, SchemaDefinition, SlotDefinition};
use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::HashSet;

/// Read-only resolved view over a schema definition.
///
/// The view is the single lookup interface the generator uses: class and enum
/// lookup by name, slot resolution per class (own and inherited), and
/// annotation lookup per (class, slot) pair. It never mutates the schema, so
/// a view can be shared freely and repeated lookups always return the same
/// answer.
pub struct SchemaView {
    schema: SchemaDefinition,
}

impl SchemaView {
    /// Create a view over a schema, filling in the `name` field of classes,
    /// slots and enums from their map keys.
    pub fn new(mut schema: SchemaDefinition) -> Self {
        debug!(
            "Initializing SchemaView with {} classes, {} enums",
            schema.classes.len(),
            schema.enums.len()
        );

        for (name, class) in schema.classes.iter_mut() {
            class.name = name.clone();
            for (slot_name, slot) in class.attributes.iter_mut() {
                slot.name = slot_name.clone();
            }
            for (slot_name, slot) in class.slot_usage.iter_mut() {
                slot.name = slot_name.clone();
            }
        }
        for (name, slot) in schema.slots.iter_mut() {
            slot.name = name.clone();
        }
        for (name, enum_def) in schema.enums.iter_mut() {
            enum_def.name = name.clone();
        }

        Self { schema }
    }

    /// The underlying schema definition.
    pub fn schema(&self) -> &SchemaDefinition {
        &self.schema
    }

    /// All class names in declaration order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.schema.classes.keys().map(String::as_str)
    }

    /// All enum names in declaration order.
    pub fn enum_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.schema.enums.keys().map(String::as_str)
    }

    /// Look up a class definition by name.
    pub fn get_class(&self, name: &str) -> Option<&ClassDefinition> {
        self.schema.classes.get(name)
    }

    /// Look up an enum definition by name.
    pub fn get_enum(&self, name: &str) -> Option<&EnumDefinition> {
        self.schema.enums.get(name)
    }

    /// Whether a range name refers to a class or enum declared in the schema.
    pub fn is_class_or_enum(&self, name: &str) -> bool {
        self.schema.classes.contains_key(name) || self.schema.enums.contains_key(name)
    }

    /// The `is_a` ancestor chain of a class, root first, excluding the class
    /// itself. Tolerates inheritance cycles and dangling parent references.
    pub fn ancestors(&self, class_name: &str) -> Vec<&ClassDefinition> {
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(class_name);

        let mut chain = Vec::new();
        let mut current = self.get_class(class_name).and_then(|c| c.is_a.as_deref());
        while let Some(parent_name) = current {
            if !seen.insert(parent_name) {
                warn!("inheritance cycle detected at class {}", parent_name);
                break;
            }
            match self.get_class(parent_name) {
                Some(parent) => {
                    chain.push(parent);
                    current = parent.is_a.as_deref();
                }
                None => {
                    warn!("class {} names unknown parent {}", class_name, parent_name);
                    break;
                }
            }
        }
        chain.reverse();
        chain
    }

    /// Slots declared directly on a class, in declaration order: named slot
    /// references first (resolved against the schema's top-level slots), then
    /// inline attributes. The class's own `slot_usage` overrides are applied.
    pub fn own_slots(&self, class_name: &str) -> Vec<SlotDefinition> {
        let Some(class) = self.get_class(class_name) else {
            return Vec::new();
        };

        let mut slots: IndexMap<String, SlotDefinition> = IndexMap::new();
        for slot_name in &class.slots {
            match self.schema.slots.get(slot_name) {
                Some(slot) => {
                    slots.insert(slot_name.clone(), slot.clone());
                }
                None => warn!(
                    "class {} references unknown slot {}",
                    class_name, slot_name
                ),
            }
        }
        for (slot_name, slot) in &class.attributes {
            slots.insert(slot_name.clone(), slot.clone());
        }

        for (slot_name, usage) in &class.slot_usage {
            if let Some(slot) = slots.get_mut(slot_name) {
                *slot = slot.with_usage(usage);
            }
        }

        slots.into_values().collect()
    }

    /// All slots of a class including inherited ones: the ancestor chain's
    /// declarations root first, then the class's own. A slot redeclared lower
    /// in the chain replaces the inherited declaration, and `slot_usage`
    /// overrides are applied root first so the nearest class wins.
    pub fn induced_slots(&self, class_name: &str) -> Vec<SlotDefinition> {
        let mut lineage: Vec<&ClassDefinition> = self.ancestors(class_name);
        if let Some(class) = self.get_class(class_name) {
            lineage.push(class);
        }

        let mut slots: IndexMap<String, SlotDefinition> = IndexMap::new();
        for class in &lineage {
            for slot in self.own_slots(&class.name) {
                slots.insert(slot.name.clone(), slot);
            }
        }

        for class in &lineage {
            for (slot_name, usage) in &class.slot_usage {
                if let Some(slot) = slots.get_mut(slot_name) {
                    *slot = slot.with_usage(usage);
                }
            }
        }

        slots.into_values().collect()
    }

    /// Read an annotation for a (class, slot) pair, honoring the class's
    /// `slot_usage` overrides before the slot's own annotations.
    pub fn slot_annotation(&self, class_name: &str, slot_name: &str, tag: &str) -> Option<String> {
        self.induced_slots(class_name)
            .iter()
            .find(|s| s.name == slot_name)
            .and_then(|s| s.annotation(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn attribute(range: &str) -> SlotDefinition {
        SlotDefinition {
            range: Some(range.to_string()),
            ..Default::default()
        }
    }

    fn sample_view() -> SchemaView {
        let mut named_thing_attrs = IndexMap::new();
        named_thing_attrs.insert(
            "id".to_string(),
            SlotDefinition {
                identifier: Some(true),
                required: Some(true),
                ..attribute("string")
            },
        );
        named_thing_attrs.insert("name".to_string(), attribute("string"));

        let mut person_attrs = IndexMap::new();
        person_attrs.insert("age".to_string(), attribute("integer"));

        let mut person_usage = IndexMap::new();
        let mut usage_annotations = IndexMap::new();
        usage_annotations.insert("openapi.path_variable".to_string(), json!(true));
        person_usage.insert(
            "id".to_string(),
            SlotDefinition {
                annotations: Some(usage_annotations),
                ..Default::default()
            },
        );

        let mut classes = IndexMap::new();
        classes.insert(
            "NamedThing".to_string(),
            ClassDefinition {
                abstract_: Some(true),
                attributes: named_thing_attrs,
                ..Default::default()
            },
        );
        classes.insert(
            "Person".to_string(),
            ClassDefinition {
                is_a: Some("NamedThing".to_string()),
                attributes: person_attrs,
                slot_usage: person_usage,
                ..Default::default()
            },
        );

        SchemaView::new(SchemaDefinition {
            name: "person_schema".to_string(),
            classes,
            ..Default::default()
        })
    }

    #[test]
    fn test_names_filled_from_keys() {
        let view = sample_view();
        let person = view.get_class("Person").unwrap();
        assert_eq!(person.name, "Person");

        let slots = view.own_slots("NamedThing");
        assert_eq!(slots[0].name, "id");
    }

    #[test]
    fn test_ancestors_root_first() {
        let view = sample_view();
        let chain: Vec<&str> = view
            .ancestors("Person")
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(chain, vec!["NamedThing"]);
        assert!(view.ancestors("NamedThing").is_empty());
    }

    #[test]
    fn test_own_slots_exclude_inherited() {
        let view = sample_view();
        let names: Vec<String> = view
            .own_slots("Person")
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, vec!["age"]);
    }

    #[test]
    fn test_induced_slots_parent_first() {
        let view = sample_view();
        let names: Vec<String> = view
            .induced_slots("Person")
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, vec!["id", "name", "age"]);
    }

    #[test]
    fn test_slot_usage_annotation_applies_to_inherited_slot() {
        let view = sample_view();
        assert_eq!(
            view.slot_annotation("Person", "id", "openapi.path_variable"),
            Some("true".to_string())
        );
        // The override is scoped to Person, not the declaring class
        assert_eq!(
            view.slot_annotation("NamedThing", "id", "openapi.path_variable"),
            None
        );
    }

    #[test]
    fn test_named_slot_references_resolved() {
        let mut slots = IndexMap::new();
        slots.insert("title".to_string(), attribute("string"));

        let mut classes = IndexMap::new();
        classes.insert(
            "Book".to_string(),
            ClassDefinition {
                slots: vec!["title".to_string(), "missing".to_string()],
                ..Default::default()
            },
        );

        let view = SchemaView::new(SchemaDefinition {
            name: "library".to_string(),
            classes,
            slots,
            ..Default::default()
        });

        let names: Vec<String> = view
            .own_slots("Book")
            .iter()
            .map(|s| s.name.clone())
            .collect();
        // The dangling reference is skipped rather than failing the run
        assert_eq!(names, vec!["title"]);
    }

    #[test]
    fn test_inheritance_cycle_is_tolerated() {
        let mut classes = IndexMap::new();
        classes.insert(
            "A".to_string(),
            ClassDefinition {
                is_a: Some("B".to_string()),
                ..Default::default()
            },
        );
        classes.insert(
            "B".to_string(),
            ClassDefinition {
                is_a: Some("A".to_string()),
                ..Default::default()
            },
        );

        let view = SchemaView::new(SchemaDefinition {
            name: "cyclic".to_string(),
            classes,
            ..Default::default()
        });

        let chain: Vec<&str> = view.ancestors("A").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(chain, vec!["B"]);
    }
}
