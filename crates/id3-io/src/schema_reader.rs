//! JSON attribute schema reader.

use std::path::{Path, PathBuf};

use id3_tree::AttributeSchema;
use tracing::{info, instrument};

use crate::IoError;

/// Reads an [`AttributeSchema`] from a JSON file.
///
/// ```json
/// {
///   "attributes": [
///     {"name": "color", "kind": "categorical", "categories": ["red", "green"]},
///     {"name": "weight", "kind": "continuous"}
///   ],
///   "labels": ["yes", "no"]
/// }
/// ```
///
/// Schema validation (duplicate names, empty category lists, empty label
/// alphabet) runs during deserialization and surfaces as
/// [`IoError::SchemaParse`].
pub struct SchemaReader {
    path: PathBuf,
}

impl SchemaReader {
    /// Create a new reader for the given JSON file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the schema.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<AttributeSchema, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        let schema: AttributeSchema =
            serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| {
                IoError::SchemaParse {
                    path: self.path.clone(),
                    source: e,
                }
            })?;

        info!(
            n_attributes = schema.n_attributes(),
            n_labels = schema.labels().len(),
            "schema loaded"
        );
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn read_valid_schema() {
        let f = write_json(
            r#"{
                "attributes": [
                    {"name": "outlook", "kind": "categorical", "categories": ["sunny", "rain"]},
                    {"name": "humidity", "kind": "continuous"}
                ],
                "labels": ["play", "stay"]
            }"#,
        );
        let schema = SchemaReader::new(f.path()).read().unwrap();
        assert_eq!(schema.n_attributes(), 2);
        assert!(schema.attributes()[1].is_continuous());
        assert_eq!(schema.labels()[0].as_str(), "play");
    }

    #[test]
    fn invalid_schema_is_rejected() {
        let f = write_json(
            r#"{
                "attributes": [
                    {"name": "outlook", "kind": "categorical", "categories": []}
                ],
                "labels": ["play"]
            }"#,
        );
        let err = SchemaReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::SchemaParse { .. }));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let f = write_json("{ not json");
        let err = SchemaReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::SchemaParse { .. }));
    }

    #[test]
    fn missing_schema_file() {
        let err = SchemaReader::new(Path::new("/nonexistent/schema.json"))
            .read()
            .unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}
