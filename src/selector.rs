use crate::resource::RESOURCE_ANNOTATION;
use crate::schema_view::SchemaView;
use log::debug;

/// Resource selector - determines which classes receive REST endpoints.
///
/// Selection runs in two phases. The first pass scans every class for the
/// presence of the `openapi.resource` annotation to pick the mode: when no
/// class anywhere carries it, the schema predates annotations and every
/// concrete class with at least one slot is selected; when at least one class
/// carries it, only classes annotated `"true"` are selected. Mixins never
/// receive endpoints in either mode.
pub struct ResourceSelector;

impl ResourceSelector {
    /// Select the classes that receive endpoints, in schema declaration
    /// order. An optional allow-list narrows the result without reordering
    /// it; filter names absent from the schema are silently ignored.
    pub fn select(view: &SchemaView, filter: Option<&[String]>) -> Vec<String> {
        let annotated_mode = Self::uses_resource_annotations(view);
        debug!(
            "Selecting resources ({} mode)",
            if annotated_mode { "annotated" } else { "legacy" }
        );

        let mut selected: Vec<String> = view
            .class_names()
            .filter(|name| {
                view.get_class(name).is_some_and(|class| {
                    if class.is_mixin() {
                        return false;
                    }
                    if annotated_mode {
                        class
                            .annotation(RESOURCE_ANNOTATION)
                            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
                    } else {
                        !class.is_abstract() && !view.induced_slots(name).is_empty()
                    }
                })
            })
            .map(String::from)
            .collect();

        if let Some(allowed) = filter {
            selected.retain(|name| allowed.contains(name));
        }

        debug!("Selected {} resource classes: {:?}", selected.len(), selected);
        selected
    }

    /// First phase: does any class in the schema carry `openapi.resource`?
    fn uses_resource_annotations(view: &SchemaView) -> bool {
        view.class_names().any(|name| {
            view.get_class(name)
                .and_then(|class| class.annotation(RESOURCE_ANNOTATION))
                .is_some()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SchemaLoader;
    use pretty_assertions::assert_eq;

    const LEGACY_SCHEMA: &str = r#"
name: legacy
classes:
  NamedThing:
    abstract: true
    attributes:
      id:
        range: string
  Person:
    is_a: NamedThing
    attributes:
      age:
        range: integer
  Mixin1:
    mixin: true
    attributes:
      extra:
        range: string
  Empty: {}
"#;

    const ANNOTATED_SCHEMA: &str = r#"
name: annotated
classes:
  Person:
    annotations:
      openapi.resource: true
    attributes:
      id:
        range: string
  Address:
    annotations:
      openapi.resource: true
    attributes:
      street:
        range: string
  Organization:
    attributes:
      name:
        range: string
  Hidden:
    annotations:
      openapi.resource: "false"
    attributes:
      id:
        range: string
  Tagged:
    mixin: true
    annotations:
      openapi.resource: true
    attributes:
      tag:
        range: string
"#;

    #[test]
    fn test_legacy_mode_selects_concrete_classes_with_slots() {
        let view = SchemaLoader::load_str(LEGACY_SCHEMA).unwrap();
        let selected = ResourceSelector::select(&view, None);
        // Abstract, mixin and slot-less classes are skipped
        assert_eq!(selected, vec!["Person"]);
    }

    #[test]
    fn test_annotated_mode_selects_only_true_annotations() {
        let view = SchemaLoader::load_str(ANNOTATED_SCHEMA).unwrap();
        let selected = ResourceSelector::select(&view, None);
        // Organization is unannotated, Hidden opts out, Tagged is a mixin
        assert_eq!(selected, vec!["Person", "Address"]);
    }

    #[test]
    fn test_filter_intersects_preserving_schema_order() {
        let view = SchemaLoader::load_str(ANNOTATED_SCHEMA).unwrap();
        let filter = vec!["Address".to_string(), "Person".to_string()];
        let selected = ResourceSelector::select(&view, Some(&filter));
        // Schema declaration order wins over filter order
        assert_eq!(selected, vec!["Person", "Address"]);
    }

    #[test]
    fn test_filter_cannot_resurrect_unselected_classes() {
        let view = SchemaLoader::load_str(ANNOTATED_SCHEMA).unwrap();
        let filter = vec!["Organization".to_string(), "Address".to_string()];
        let selected = ResourceSelector::select(&view, Some(&filter));
        assert_eq!(selected, vec!["Address"]);
    }

    #[test]
    fn test_unknown_filter_names_ignored() {
        let view = SchemaLoader::load_str(LEGACY_SCHEMA).unwrap();
        let filter = vec!["Person".to_string(), "Nonexistent".to_string()];
        let selected = ResourceSelector::select(&view, Some(&filter));
        assert_eq!(selected, vec!["Person"]);
    }
}
