//! Database schema provider.

use std::path::PathBuf;

/// Placeholder text served when no schema file exists.
pub const SCHEMA_NOT_FOUND: &str = "schema file not found";

/// Supplies the text of the `app://schema` resource.
///
/// Implementations must not fail: when no schema is available they return a
/// placeholder instead.
pub trait SchemaProvider: Send + Sync {
    /// Returns the schema text, or a placeholder if none is available.
    fn read(&self) -> String;
}

/// Reads the schema from a file under the project root.
#[derive(Debug, Clone)]
pub struct FileSchemaProvider {
    path: PathBuf,
}

impl FileSchemaProvider {
    /// Creates a provider reading from the given file.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SchemaProvider for FileSchemaProvider {
    fn read(&self) -> String {
        std::fs::read_to_string(&self.path).unwrap_or_else(|_| SCHEMA_NOT_FOUND.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_existing_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.sql");
        std::fs::write(&path, "CREATE TABLE users (id INTEGER);").unwrap();

        let provider = FileSchemaProvider::new(path);
        assert_eq!(provider.read(), "CREATE TABLE users (id INTEGER);");
    }

    #[test]
    fn missing_schema_yields_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileSchemaProvider::new(dir.path().join("absent.sql"));
        assert_eq!(provider.read(), SCHEMA_NOT_FOUND);
    }
}
