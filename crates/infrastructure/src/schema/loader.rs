//! Schema document loading.
//!
//! Schemas live as `*.json` files on disk. A single file is loaded with
//! [`SchemaLoader::load`]; a whole directory becomes a [`SchemaRegistry`]
//! keyed by file stem, so `schemas/pokemon.schema.json` is reachable as
//! `pokemon.schema`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use apiprobe_application::ports::{FileSystem, FileSystemError};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::persistence::classify;
use crate::serialization::{SerializationError, from_json};

/// Error loading or looking up a schema.
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    /// The schema file could not be read.
    #[error("failed to read schema {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: FileSystemError,
    },

    /// The file is not valid JSON.
    #[error("failed to parse schema {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: SerializationError,
    },

    /// No schema at the dotted path.
    #[error("schema not found: {0}")]
    NotFound(String),
}

/// Parses schema text. Shared by the async and blocking loaders.
fn parse_schema(path: &Path, content: &str) -> Result<Value, SchemaLoadError> {
    from_json(content).map_err(|source| SchemaLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads schema documents through a [`FileSystem`].
pub struct SchemaLoader<F: FileSystem> {
    fs: Arc<F>,
}

impl<F: FileSystem> SchemaLoader<F> {
    /// Creates a loader over the given file system.
    pub const fn new(fs: Arc<F>) -> Self {
        Self { fs }
    }

    /// Reads and parses one schema file.
    ///
    /// # Errors
    ///
    /// Returns `Read` if the file cannot be read and `Parse` if it is not
    /// JSON.
    pub async fn load(&self, path: &Path) -> Result<Value, SchemaLoadError> {
        let content = self
            .fs
            .read_file_string(path)
            .await
            .map_err(|source| SchemaLoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), "loaded schema");
        parse_schema(path, &content)
    }

    /// Synchronous variant of [`SchemaLoader::load`] for callers outside a
    /// runtime. Reads from the real file system.
    ///
    /// # Errors
    ///
    /// Same as [`SchemaLoader::load`].
    pub fn load_blocking(path: &Path) -> Result<Value, SchemaLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| SchemaLoadError::Read {
            path: path.to_path_buf(),
            source: classify(path, e),
        })?;
        parse_schema(path, &content)
    }

    /// Loads every `*.json` file in `dir`, keyed by file stem.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be read or parsed.
    pub async fn load_all(&self, dir: &Path) -> Result<SchemaRegistry, SchemaLoadError> {
        let entries = self
            .fs
            .read_dir(dir)
            .await
            .map_err(|source| SchemaLoadError::Read {
                path: dir.to_path_buf(),
                source,
            })?;

        let mut registry = SchemaRegistry::default();
        for path in entries
            .iter()
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let schema = self.load(path).await?;
            registry.insert(stem, schema);
        }

        info!(dir = %dir.display(), count = registry.len(), "schemas loaded");
        Ok(registry)
    }

    /// Returns whether a schema file exists.
    pub async fn schema_exists(&self, path: &Path) -> bool {
        self.fs.exists(path).await
    }
}

/// Loaded schemas keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Value>,
}

impl SchemaRegistry {
    /// Adds or replaces a schema.
    pub fn insert(&mut self, name: impl Into<String>, schema: Value) {
        self.schemas.insert(name.into(), schema);
    }

    /// Looks up a schema by dotted path.
    ///
    /// The longest prefix naming a loaded schema wins; remaining segments
    /// descend into that document. `pokemon.schema.properties.id` resolves
    /// to the `id` property of the `pokemon.schema` file.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no prefix names a schema or a later segment
    /// is missing.
    pub fn get_by_path(&self, path: &str) -> Result<&Value, SchemaLoadError> {
        let segments: Vec<&str> = path.split('.').collect();
        let not_found = || SchemaLoadError::NotFound(path.to_string());

        (1..=segments.len())
            .rev()
            .find_map(|split| {
                let root = self.schemas.get(&segments[..split].join("."))?;
                segments[split..]
                    .iter()
                    .try_fold(root, |value, segment| value.get(*segment))
            })
            .ok_or_else(not_found)
    }

    /// Schema names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Number of loaded schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if nothing is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::TokioFileSystem;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).expect("write schema");
        path
    }

    fn loader() -> SchemaLoader<TokioFileSystem> {
        SchemaLoader::new(Arc::new(TokioFileSystem::new()))
    }

    #[tokio::test]
    async fn test_load_single_schema() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, "pokemon.schema.json", r#"{"type": "object"}"#);

        let schema = loader().load(&path).await.expect("loads");
        assert_eq!(schema, json!({"type": "object"}));
    }

    #[tokio::test]
    async fn test_blocking_matches_async() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, "user.json", r#"{"required": ["id"]}"#);

        let blocking = SchemaLoader::<TokioFileSystem>::load_blocking(&path).expect("loads");
        let async_loaded = loader().load(&path).await.expect("loads");
        assert_eq!(blocking, async_loaded);
    }

    #[tokio::test]
    async fn test_parse_error_names_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, "broken.json", "{not json");

        let err = loader().load(&path).await.expect_err("must fail");
        assert!(matches!(&err, SchemaLoadError::Parse { path: p, .. } if *p == path));
        assert!(err.to_string().contains("broken.json"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().expect("temp dir");
        let err = loader()
            .load(&dir.path().join("nope.json"))
            .await
            .expect_err("must fail");
        assert!(matches!(
            err,
            SchemaLoadError::Read {
                source: FileSystemError::NotFound(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_load_all_keys_by_stem() {
        let dir = TempDir::new().expect("temp dir");
        write(
            &dir,
            "pokemon.schema.json",
            r#"{"type": "object", "properties": {"id": {"type": "integer"}}}"#,
        );
        write(&dir, "berry.json", r#"{"type": "object"}"#);
        write(&dir, "notes.txt", "ignored");

        let registry = loader().load_all(dir.path()).await.expect("loads");

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["berry", "pokemon.schema"]);
        assert_eq!(
            registry.get_by_path("pokemon.schema.properties.id").expect("found"),
            &json!({"type": "integer"})
        );
        assert_eq!(
            registry.get_by_path("berry").expect("found"),
            &json!({"type": "object"})
        );
        assert!(matches!(
            registry.get_by_path("pokemon.schema.properties.name"),
            Err(SchemaLoadError::NotFound(_))
        ));
        assert!(matches!(
            registry.get_by_path("missing"),
            Err(SchemaLoadError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_schema_exists() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, "a.json", "{}");

        assert!(loader().schema_exists(&path).await);
        assert!(!loader().schema_exists(&dir.path().join("b.json")).await);
    }
}
