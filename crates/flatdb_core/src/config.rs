//! Database and collection configuration.

use flatdb_codec::DocumentFormat;

/// Configuration for opening a database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Whether to create the database directory if it doesn't exist.
    pub create_if_missing: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            create_if_missing: true,
        }
    }
}

impl DatabaseConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the database directory if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }
}

/// How an insert holds the collection's write lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    /// Three short critical sections: allocate the ID, update indexes,
    /// write the document.
    ///
    /// A concurrent reader can observe an index entry whose document file
    /// is not written yet, and a crash between the last two sections leaves
    /// an index entry without a document until the next `init`. Indexed
    /// lookups skip such entries.
    #[default]
    Phased,
    /// One critical section spanning all insert steps. Readers never see a
    /// half-finished insert, at the cost of serializing all writers for the
    /// full duration of the document write.
    Atomic,
}

/// Configuration for a collection.
#[derive(Debug, Clone, Default)]
pub struct CollectionConfig {
    /// Fields with an unordered in-memory equality index.
    pub indexes: Vec<String>,

    /// Serialization format of document files.
    pub format: DocumentFormat,

    /// Locking discipline for inserts.
    pub insert_mode: InsertMode,

    /// Whether to fsync each document file and the ID counter on insert.
    pub sync_on_write: bool,
}

impl CollectionConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unordered equality index on `field`.
    ///
    /// Registering the same field twice has no further effect.
    #[must_use]
    pub fn with_index(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.indexes.contains(&field) {
            self.indexes.push(field);
        }
        self
    }

    /// Sets the document serialization format.
    #[must_use]
    pub fn format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the insert locking discipline.
    #[must_use]
    pub fn insert_mode(mut self, mode: InsertMode) -> Self {
        self.insert_mode = mode;
        self
    }

    /// Sets whether inserts fsync before returning.
    #[must_use]
    pub fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CollectionConfig::default();
        assert!(config.indexes.is_empty());
        assert_eq!(config.format, DocumentFormat::Json);
        assert_eq!(config.insert_mode, InsertMode::Phased);
        assert!(!config.sync_on_write);
        assert!(DatabaseConfig::default().create_if_missing);
    }

    #[test]
    fn builder_pattern() {
        let config = CollectionConfig::new()
            .with_index("name")
            .with_index("age")
            .with_index("name")
            .format(DocumentFormat::Cbor)
            .insert_mode(InsertMode::Atomic)
            .sync_on_write(true);

        assert_eq!(config.indexes, vec!["name".to_string(), "age".to_string()]);
        assert_eq!(config.format, DocumentFormat::Cbor);
        assert_eq!(config.insert_mode, InsertMode::Atomic);
        assert!(config.sync_on_write);

        let db = DatabaseConfig::new().create_if_missing(false);
        assert!(!db.create_if_missing);
    }
}
