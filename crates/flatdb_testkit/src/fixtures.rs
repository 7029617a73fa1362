//! Test fixtures and database helpers.
//!
//! Provides a temporary on-disk database, a sample payload type and
//! common pre-populated scenarios.

use flatdb_core::{Collection, CollectionConfig, Database, Document};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tempfile::TempDir;

/// Sample payload used throughout the testkit.
///
/// Serialized field names are `Foo`, `Bar` and `Rank`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    /// First string field.
    pub foo: String,
    /// Second string field.
    pub bar: String,
    /// Integer field, for ordering comparisons.
    pub rank: i64,
}

impl Record {
    /// Creates a record with rank 0.
    pub fn new(foo: impl Into<String>, bar: impl Into<String>) -> Self {
        Self {
            foo: foo.into(),
            bar: bar.into(),
            rank: 0,
        }
    }

    /// Sets the rank.
    #[must_use]
    pub fn with_rank(mut self, rank: i64) -> Self {
        self.rank = rank;
        self
    }
}

impl Document for Record {}

/// A database in a temporary directory, removed on drop.
pub struct TestDatabase {
    /// The database instance.
    pub db: Database,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl TestDatabase {
    /// Creates an empty database in a fresh temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db = Database::open(temp_dir.path()).expect("Failed to open database");
        Self { db, temp_dir }
    }

    /// Returns the database root directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Opens a `Record` collection and rebuilds its indexes.
    pub fn records(&self, name: &str, config: CollectionConfig) -> Collection<Record> {
        let collection = self
            .db
            .collection_with::<Record>(name, config)
            .expect("Failed to open collection");
        collection.init().expect("Failed to init collection");
        collection
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test with a temporary database.
///
/// # Example
///
/// ```rust,ignore
/// use flatdb_testkit::with_temp_db;
///
/// #[test]
/// fn my_test() {
///     with_temp_db(|db| {
///         let notes = db.collection::<Note>("notes").unwrap();
///         // ... test operations
///     });
/// }
/// ```
pub fn with_temp_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let test_db = TestDatabase::new();
    f(&test_db.db)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Creates a `records` collection indexed on `Foo` holding `count`
    /// records, with `Foo` cycling through `a`, `b`, `c` and `Rank` equal
    /// to the insertion index.
    pub fn populated(count: usize) -> (TestDatabase, Collection<Record>) {
        let test_db = TestDatabase::new();
        let collection = test_db.records("records", CollectionConfig::new().with_index("Foo"));

        for i in 0..count {
            let foo = ["a", "b", "c"][i % 3];
            let record = Record::new(foo, format!("bar-{i}")).with_rank(i as i64);
            collection.insert(&record).expect("Failed to insert record");
        }

        (test_db, collection)
    }

    /// Creates the three-record collection used by the AND/OR examples:
    /// `{hello, 5}`, `{hello, world}`, `{foo, world}`.
    pub fn hello_world() -> (TestDatabase, Collection<Record>) {
        let test_db = TestDatabase::new();
        let collection = test_db.records("models", CollectionConfig::new().with_index("Foo"));

        for (foo, bar) in [("hello", "5"), ("hello", "world"), ("foo", "world")] {
            collection
                .insert(&Record::new(foo, bar))
                .expect("Failed to insert record");
        }

        (test_db, collection)
    }
}
