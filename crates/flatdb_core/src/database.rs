//! Database namespace.

use crate::collection::{Collection, Document, ID_FILE};
use crate::config::{CollectionConfig, DatabaseConfig};
use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// The main database handle.
///
/// A database is a directory holding one subdirectory per collection. The
/// handle itself owns no open files; each [`Collection`] manages its own.
///
/// # Opening a Database
///
/// ```rust,ignore
/// use flatdb_core::{CollectionConfig, Database};
/// use std::path::Path;
///
/// let db = Database::open(Path::new("my_database"))?;
///
/// let users = db.collection_with::<User>("users", CollectionConfig::new().with_index("email"))?;
/// users.init()?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// Database name (last component of the path).
    name: String,
    /// Root directory.
    path: PathBuf,
    /// Configuration.
    config: DatabaseConfig,
}

impl Database {
    /// Opens a database rooted at `path`, creating the directory if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, or if `path`
    /// exists but is not a directory.
    pub fn open(path: &Path) -> CoreResult<Self> {
        Self::open_with_config(path, DatabaseConfig::default())
    }

    /// Opens a database rooted at `path` with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidOperation`] if the directory is missing
    /// and `create_if_missing` is false, or if `path` is not a directory.
    pub fn open_with_config(path: &Path, config: DatabaseConfig) -> CoreResult<Self> {
        if !path.exists() {
            if !config.create_if_missing {
                return Err(CoreError::invalid_operation(format!(
                    "database directory {} does not exist",
                    path.display()
                )));
            }
            fs::create_dir_all(path)?;
        } else if !path.is_dir() {
            return Err(CoreError::invalid_operation(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        info!(db = %name, path = %path.display(), "opened database");

        Ok(Self {
            name,
            path: path.to_path_buf(),
            config,
        })
    }

    /// Returns the database name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the root directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the database configuration.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Opens (or creates) the collection `name` with default configuration.
    ///
    /// # Errors
    ///
    /// See [`Database::collection_with`].
    pub fn collection<T: Document>(&self, name: &str) -> CoreResult<Collection<T>> {
        self.collection_with(name, CollectionConfig::default())
    }

    /// Opens (or creates) the collection `name`.
    ///
    /// The collection's indexes are empty until [`Collection::init`] is
    /// called.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidOperation`] for an empty name, `.`, `..`
    /// or a name containing a path separator, and
    /// [`CoreError::Initialization`] if the directory or ID counter cannot
    /// be set up.
    pub fn collection_with<T: Document>(
        &self,
        name: &str,
        config: CollectionConfig,
    ) -> CoreResult<Collection<T>> {
        validate_name(name)?;
        Collection::open(&self.path, name, config)
    }

    /// Lists the names of existing collections, sorted.
    ///
    /// A collection is any subdirectory holding an ID counter file.
    pub fn collection_names(&self) -> CoreResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() || !entry.path().join(ID_FILE).is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

fn validate_name(name: &str) -> CoreResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(CoreError::invalid_operation(format!(
            "invalid collection name {name:?}"
        )));
    }
    Ok(())
}
