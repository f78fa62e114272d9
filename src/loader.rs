use crate::error::{Error, Result};
use crate::model::SchemaDefinition;
use crate::schema_view::SchemaView;
use log::debug;
use std::fs;
use std::path::Path;

/// Loader for LinkML schema YAML files.
///
/// The loader turns a schema file into a resolved [`SchemaView`]; everything
/// downstream of it works on the view and never touches the filesystem.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Loads a schema from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaLoad`] if the file cannot be read or does not
    /// parse as a schema document.
    pub fn load_file(path: &Path) -> Result<SchemaView> {
        debug!("Loading schema file: {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| Error::SchemaLoad {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let view = Self::load_str(&content).map_err(|e| Error::SchemaLoad {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        debug!(
            "Loaded schema {} from {}",
            view.schema().name,
            path.display()
        );
        Ok(view)
    }

    /// Parses a schema from YAML text.
    pub fn load_str(content: &str) -> std::result::Result<SchemaView, serde_yaml::Error> {
        let schema: SchemaDefinition = serde_yaml::from_str(content)?;
        Ok(SchemaView::new(schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    const MINIMAL_SCHEMA: &str = r#"
id: https://example.org/library
name: library
description: A small library schema
classes:
  Book:
    attributes:
      id:
        identifier: true
        range: string
      title:
        range: string
enums:
  Format:
    permissible_values:
      HARDCOVER:
      PAPERBACK:
"#;

    #[test]
    fn test_load_str_minimal_schema() {
        let view = SchemaLoader::load_str(MINIMAL_SCHEMA).unwrap();
        assert_eq!(view.schema().name, "library");
        assert!(view.get_class("Book").is_some());
        assert!(view.get_enum("Format").is_some());
        assert_eq!(
            view.get_enum("Format").unwrap().value_names(),
            vec!["HARDCOVER", "PAPERBACK"]
        );
    }

    #[test]
    fn test_load_str_rejects_malformed_yaml() {
        let result = SchemaLoader::load_str("classes: [not: {valid");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("schema.yaml");
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(MINIMAL_SCHEMA.as_bytes()).unwrap();

        let view = SchemaLoader::load_file(&file_path).unwrap();
        assert_eq!(view.schema().name, "library");
    }

    #[test]
    fn test_load_file_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let result = SchemaLoader::load_file(&temp_dir.path().join("absent.yaml"));
        match result {
            Err(Error::SchemaLoad { file, .. }) => {
                assert!(file.ends_with("absent.yaml"));
            }
            other => panic!("expected SchemaLoad error, got {:?}", other.map(|_| ())),
        }
    }
}
