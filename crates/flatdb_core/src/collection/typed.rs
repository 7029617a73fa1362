//! Typed collection implementation.

use crate::collection::document::Document;
use crate::config::{CollectionConfig, InsertMode};
use crate::error::{CoreError, CoreResult};
use crate::index::HashIndex;
use crate::query::{Operator, QueryBuilder};
use crate::types::InsertResult;
use flatdb_codec::{CodecError, Envelope, EnvelopeRef, Value};
use flatdb_storage::{DocumentStore, IdCounter, StorageError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;
use tracing::{debug, info, warn};

/// Name of the ID counter file inside a collection directory.
pub const ID_FILE: &str = "id.txt";

/// State guarded by the collection lock.
struct CollectionState {
    counter: IdCounter,
    indexes: HashMap<String, HashIndex>,
}

/// A typed collection of documents.
///
/// `Collection<T>` stores payloads of type `T` as one file per document in
/// its own directory, assigns each a strictly increasing `u64` ID, and keeps
/// optional in-memory equality indexes on payload fields.
///
/// # Concurrency
///
/// A collection is `Sync` and meant to be shared (e.g. behind an `Arc`).
/// One read-write lock guards the ID counter, the indexes and the act of
/// writing a new document file. Readers hold the read lock only while
/// touching that shared state or reading a single document file; decoding
/// and filtering happen outside the lock.
///
/// With the default [`InsertMode::Phased`], an insert takes the write lock
/// three times in sequence (allocate, index, write). Indexed lookups skip
/// entries whose document is not written yet.
///
/// # Example
///
/// ```rust,ignore
/// use flatdb_core::{CollectionConfig, Database, Value};
///
/// let db = Database::open(Path::new("data"))?;
/// let users = db.collection_with::<User>("users", CollectionConfig::new().with_index("name"))?;
/// users.init()?;
///
/// let inserted = users.insert(&User { name: "ada".into(), age: 36 })?;
/// let found = users.get_by_id(inserted.id)?;
/// let named = users.find_by("name", &Value::from("ada"))?;
/// ```
pub struct Collection<T: Document> {
    /// Collection name (also its directory name).
    name: String,
    /// Configuration the collection was opened with.
    config: CollectionConfig,
    /// Document files.
    store: DocumentStore,
    /// Counter and indexes, under the collection lock.
    state: RwLock<CollectionState>,
    /// Type marker.
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> Collection<T> {
    /// Opens the collection `name` under `parent`, creating its directory
    /// and a zeroed ID counter if absent.
    ///
    /// Indexes start empty; call [`Collection::init`] to populate them.
    pub(crate) fn open(parent: &Path, name: &str, config: CollectionConfig) -> CoreResult<Self> {
        let dir = parent.join(name);
        fs::create_dir_all(&dir).map_err(|e| CoreError::initialization(name, e.into()))?;

        let counter = IdCounter::open(&dir.join(ID_FILE))
            .map_err(|e| CoreError::initialization(name, e.into()))?;

        let indexes = config
            .indexes
            .iter()
            .map(|field| (field.clone(), HashIndex::new(field.clone())))
            .collect();

        debug!(collection = name, path = %dir.display(), "opened collection");

        Ok(Self {
            name: name.to_string(),
            store: DocumentStore::new(&dir, config.format.extension()),
            config,
            state: RwLock::new(CollectionState { counter, indexes }),
            _marker: PhantomData,
        })
    }

    /// Returns the collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the collection directory.
    pub fn path(&self) -> &Path {
        self.store.dir()
    }

    /// Returns the collection configuration.
    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Returns the indexed field names, sorted.
    pub fn indexed_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = self.state.read().indexes.keys().cloned().collect();
        fields.sort();
        fields
    }

    /// Rebuilds every configured index from the documents on disk.
    ///
    /// A no-op when no index is configured. Existing index contents are
    /// discarded first, so calling this again does not duplicate entries.
    /// Holds the write lock for the whole rebuild.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Initialization`] wrapping the first read or
    /// decode failure. Indexes are left as they were before the call.
    pub fn init(&self) -> CoreResult<()> {
        info!(collection = %self.name, "initializing collection");

        let mut state = self.state.write();
        if state.indexes.is_empty() {
            return Ok(());
        }

        let documents = self
            .scan(|id| self.load(id))
            .map_err(|e| CoreError::initialization(&self.name, e))?;

        for index in state.indexes.values_mut() {
            index.clear();
            index.build(&documents);
        }

        info!(
            collection = %self.name,
            documents = documents.len(),
            indexes = state.indexes.len(),
            "indexes rebuilt"
        );
        Ok(())
    }

    /// Inserts a payload under a newly allocated ID.
    ///
    /// Steps: allocate the ID, serialize `{ID, Data}`, update every index,
    /// write the document file. A failure after allocation leaves that ID
    /// permanently unused. Under [`InsertMode::Phased`], a failed document
    /// write leaves index entries pointing at a missing document until the
    /// next [`Collection::init`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Collection`] wrapping the failing step.
    pub fn insert(&self, payload: &T) -> CoreResult<InsertResult> {
        let result = match self.config.insert_mode {
            InsertMode::Phased => self.insert_phased(payload),
            InsertMode::Atomic => self.insert_atomic(payload),
        };
        result.map_err(|e| self.context("insert", e))
    }

    fn insert_phased(&self, payload: &T) -> CoreResult<InsertResult> {
        let id = self.allocate(&mut self.state.write())?;
        let bytes = self.encode(id, payload)?;
        Self::update_indexes(&mut self.state.write(), id, payload);
        {
            let _guard = self.state.write();
            self.write_document(id, &bytes)?;
        }
        Ok(InsertResult::new(id))
    }

    fn insert_atomic(&self, payload: &T) -> CoreResult<InsertResult> {
        let mut state = self.state.write();
        let id = self.allocate(&mut state)?;
        let bytes = self.encode(id, payload)?;
        Self::update_indexes(&mut state, id, payload);
        self.write_document(id, &bytes)?;
        Ok(InsertResult::new(id))
    }

    fn allocate(&self, state: &mut CollectionState) -> CoreResult<u64> {
        let id = state.counter.allocate()?;
        if self.config.sync_on_write {
            state.counter.sync()?;
        }
        Ok(id)
    }

    fn encode(&self, id: u64, payload: &T) -> CoreResult<Vec<u8>> {
        Ok(self.config.format.encode(&EnvelopeRef::new(id, payload))?)
    }

    fn update_indexes(state: &mut CollectionState, id: u64, payload: &T) {
        for index in state.indexes.values_mut() {
            index.update(id, payload);
        }
    }

    fn write_document(&self, id: u64, bytes: &[u8]) -> CoreResult<()> {
        self.store.write(id, bytes, self.config.sync_on_write)?;
        Ok(())
    }

    /// Reads the document with the given ID.
    ///
    /// # Errors
    ///
    /// Fails with a not-found error ([`CoreError::is_not_found`]) if no
    /// document exists, and with [`CoreError::Decode`] if the stored bytes
    /// are not an envelope of `T` carrying this ID.
    pub fn get_by_id(&self, id: u64) -> CoreResult<Envelope<T>> {
        self.load_shared(id)
            .map_err(|e| self.context("get_by_id", e))
    }

    /// Finds every document whose `field` equals `value`.
    ///
    /// Uses the index on `field` when one is configured (results in index
    /// bucket order), otherwise scans every document (results in ID order)
    /// and logs the scan.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::NoMatch`] when no document matches, on both
    /// the indexed and the scanning path.
    pub fn find_by(&self, field: &str, value: &Value) -> CoreResult<Vec<Envelope<T>>> {
        self.find_by_inner(field, value)
            .map_err(|e| self.context("find_by", e))
    }

    fn find_by_inner(&self, field: &str, value: &Value) -> CoreResult<Vec<Envelope<T>>> {
        let bucket = {
            let state = self.state.read();
            state
                .indexes
                .get(field)
                .map(|index| index.lookup(value).map(<[u64]>::to_vec))
        };

        let documents = match bucket {
            Some(Some(ids)) => self.load_indexed(&ids)?,
            Some(None) => Vec::new(),
            None => {
                info!(collection = %self.name, field, value = %value, "running full scan in find_by");
                self.scan(|id| self.load_shared(id))?
                    .into_iter()
                    .filter(|doc| doc.data.field(field).as_ref() == Some(value))
                    .collect()
            }
        };

        if documents.is_empty() {
            return Err(CoreError::NoMatch {
                field: field.to_string(),
                value: value.clone(),
            });
        }
        Ok(documents)
    }

    /// Finds every document whose `field` compares to `value` as
    /// `operator` requires.
    ///
    /// Equality goes through [`Collection::find_by`]. `<` and `>` always
    /// scan, since indexes are unordered; values of a different kind than
    /// `value` never match. An empty result is not an error here.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::UnsupportedOperator`] when `value` cannot be
    /// ordered (null, arrays, maps).
    pub fn find_where(
        &self,
        field: &str,
        operator: Operator,
        value: &Value,
    ) -> CoreResult<Vec<Envelope<T>>> {
        if operator == Operator::Equals {
            return self.find_by(field, value);
        }
        self.find_ordered(field, operator, value)
            .map_err(|e| self.context("find_where", e))
    }

    fn find_ordered(
        &self,
        field: &str,
        operator: Operator,
        value: &Value,
    ) -> CoreResult<Vec<Envelope<T>>> {
        if !value.is_orderable() {
            return Err(CoreError::UnsupportedOperator {
                operator,
                value_type: value.type_name(),
            });
        }

        info!(
            collection = %self.name,
            field,
            operator = %operator,
            value = %value,
            "running full scan in find_where"
        );
        Ok(self
            .scan(|id| self.load_shared(id))?
            .into_iter()
            .filter(|doc| {
                doc.data
                    .field(field)
                    .and_then(|v| v.compare(value))
                    .is_some_and(|ordering| operator.accepts(ordering))
            })
            .collect())
    }

    /// Returns every document, in ID order.
    ///
    /// **Warning**: This is a full scan and is logged as one.
    pub fn find_all(&self) -> CoreResult<Vec<Envelope<T>>> {
        info!(collection = %self.name, "running full scan");
        self.scan(|id| self.load_shared(id))
            .map_err(|e| self.context("find_all", e))
    }

    /// Returns the number of document files.
    pub fn count(&self) -> CoreResult<usize> {
        self.store
            .count()
            .map_err(|e| self.context("count", e.into()))
    }

    /// Returns the most recently allocated ID (0 if none yet).
    pub fn last_id(&self) -> CoreResult<u64> {
        self.state
            .write()
            .counter
            .current()
            .map_err(|e| self.context("last_id", e.into()))
    }

    /// Starts a query over this collection.
    pub fn query(&self) -> QueryBuilder<'_, T> {
        QueryBuilder::new(self)
    }

    /// Syncs the ID counter and releases the collection's file handles.
    ///
    /// Taking `self` by value guarantees no operation is still in flight.
    pub fn close(self) -> CoreResult<()> {
        let state = self.state.into_inner();
        if let Err(e) = state.counter.sync() {
            warn!(collection = %self.name, error = %e, "failed to sync ID counter on close");
            return Err(CoreError::collection(self.name, "close", e.into()));
        }
        info!(collection = %self.name, "collection closed");
        Ok(())
    }

    /// Lists all document IDs in ascending order and loads each.
    fn scan<F>(&self, load: F) -> CoreResult<Vec<Envelope<T>>>
    where
        F: Fn(u64) -> CoreResult<Envelope<T>>,
    {
        let mut ids = self.store.list()?;
        ids.sort_unstable();
        ids.into_iter().map(load).collect()
    }

    /// Loads documents named by an index bucket, skipping IDs whose file
    /// has not been written.
    fn load_indexed(&self, ids: &[u64]) -> CoreResult<Vec<Envelope<T>>> {
        let mut documents = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.load_shared(id) {
                Ok(doc) => documents.push(doc),
                Err(CoreError::DocumentNotFound { id }) => {
                    debug!(collection = %self.name, id, "skipping index entry without document");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(documents)
    }

    /// Reads one document under the read lock, decoding outside it.
    fn load_shared(&self, id: u64) -> CoreResult<Envelope<T>> {
        let bytes = {
            let _guard = self.state.read();
            self.read_bytes(id)?
        };
        self.decode(id, &bytes)
    }

    /// Reads one document without taking the lock.
    fn load(&self, id: u64) -> CoreResult<Envelope<T>> {
        let bytes = self.read_bytes(id)?;
        self.decode(id, &bytes)
    }

    fn read_bytes(&self, id: u64) -> CoreResult<Vec<u8>> {
        self.store.read(id).map_err(|e| match e {
            StorageError::NotFound { id, .. } => CoreError::DocumentNotFound { id },
            other => other.into(),
        })
    }

    fn decode(&self, id: u64, bytes: &[u8]) -> CoreResult<Envelope<T>> {
        let format = self.config.format;
        let envelope: Envelope<T> = format.decode(bytes).map_err(|source| CoreError::Decode {
            path: self.store.path_of(id),
            source,
        })?;

        if envelope.id != id {
            return Err(CoreError::Decode {
                path: self.store.path_of(id),
                source: CodecError::decoding_failed(
                    format.name(),
                    format!("envelope ID {} does not match file ID {}", envelope.id, id),
                ),
            });
        }
        Ok(envelope)
    }

    fn context(&self, operation: &'static str, source: CoreError) -> CoreError {
        CoreError::collection(&self.name, operation, source)
    }
}

impl<T: Document> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("path", &self.store.dir())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatdb_codec::DocumentFormat;
    use serde::{Deserialize, Serialize};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;
    use tempfile::{tempdir, TempDir};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        foo: String,
        bar: String,
        n: i64,
    }

    impl Document for Item {}

    fn item(foo: &str, bar: &str, n: i64) -> Item {
        Item {
            foo: foo.to_string(),
            bar: bar.to_string(),
            n,
        }
    }

    fn open(dir: &TempDir, config: CollectionConfig) -> Collection<Item> {
        Collection::open(dir.path(), "items", config).unwrap()
    }

    fn ids<T>(docs: &[Envelope<T>]) -> Vec<u64> {
        docs.iter().map(|d| d.id).collect()
    }

    #[test]
    fn open_creates_layout() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());

        assert!(dir.path().join("items").is_dir());
        assert_eq!(
            std::fs::read(dir.path().join("items").join(ID_FILE)).unwrap(),
            vec![0u8; 8]
        );
        assert_eq!(collection.name(), "items");
        assert_eq!(collection.last_id().unwrap(), 0);
    }

    #[test]
    fn inserts_get_sequential_ids() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());

        for expected in 1..=20 {
            let result = collection.insert(&item("a", "b", expected as i64)).unwrap();
            assert_eq!(result, InsertResult::new(expected));
        }
        assert_eq!(collection.last_id().unwrap(), 20);
        assert_eq!(collection.count().unwrap(), 20);
    }

    #[test]
    fn stored_file_is_json_envelope() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());

        collection.insert(&item("hello", "5", 1)).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("items").join("1.json")).unwrap();
        assert_eq!(raw, r#"{"ID":1,"Data":{"foo":"hello","bar":"5","n":1}}"#);
    }

    #[test]
    fn get_by_id_round_trip() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());

        let payload = item("hello world", "x", 7);
        let result = collection.insert(&payload).unwrap();

        let doc = collection.get_by_id(result.id).unwrap();
        assert_eq!(doc.id, 1);
        assert_eq!(doc.data, payload);
    }

    #[test]
    fn get_by_id_missing() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());

        let err = collection.get_by_id(9).unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(
            err.root_cause(),
            CoreError::DocumentNotFound { id: 9 }
        ));
        assert!(err.to_string().contains("collection items"));
    }

    #[test]
    fn get_by_id_decode_failures() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());
        let path = dir.path().join("items");

        std::fs::write(path.join("5.json"), b"not json").unwrap();
        std::fs::write(
            path.join("6.json"),
            br#"{"ID":7,"Data":{"foo":"a","bar":"b","n":1}}"#,
        )
        .unwrap();

        for id in [5, 6] {
            let err = collection.get_by_id(id).unwrap_err();
            assert!(matches!(err.root_cause(), CoreError::Decode { .. }));
            assert!(!err.is_not_found());
        }
    }

    #[test]
    fn find_by_indexed_and_scanned_agree() {
        let dir = tempdir().unwrap();
        let indexed = open(&dir, CollectionConfig::new().with_index("foo"));

        indexed.insert(&item("hello", "5", 1)).unwrap();
        indexed.insert(&item("other", "5", 2)).unwrap();
        indexed.insert(&item("hello", "world", 3)).unwrap();

        let scanned: Collection<Item> =
            Collection::open(dir.path(), "items", CollectionConfig::new()).unwrap();

        let value = Value::from("hello");
        let a: HashSet<u64> = ids(&indexed.find_by("foo", &value).unwrap()).into_iter().collect();
        let b: HashSet<u64> = ids(&scanned.find_by("foo", &value).unwrap()).into_iter().collect();

        assert_eq!(a, HashSet::from([1, 3]));
        assert_eq!(a, b);
    }

    #[test]
    fn find_by_no_match_on_both_paths() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new().with_index("foo"));
        collection.insert(&item("hello", "5", 1)).unwrap();

        let missing = Value::from("absent");
        let indexed_err = collection.find_by("foo", &missing).unwrap_err();
        let scan_err = collection.find_by("bar", &missing).unwrap_err();

        assert!(indexed_err.is_no_match());
        assert!(scan_err.is_no_match());
        assert!(indexed_err.is_not_found());
    }

    #[test]
    fn find_by_unknown_field_scans_to_no_match() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());
        collection.insert(&item("hello", "5", 1)).unwrap();

        let err = collection.find_by("missing", &Value::Null).unwrap_err();
        assert!(err.is_no_match());
    }

    #[test]
    fn find_all_is_id_ordered() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());

        for n in 0..12 {
            collection.insert(&item("x", "y", n)).unwrap();
        }

        let all = collection.find_all().unwrap();
        assert_eq!(ids(&all), (1..=12).collect::<Vec<_>>());
        assert_eq!(all[11].data.n, 11);
    }

    #[test]
    fn find_all_empty_collection() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());
        assert!(collection.find_all().unwrap().is_empty());
    }

    #[test]
    fn init_rebuilds_indexes_after_reopen() {
        let dir = tempdir().unwrap();
        {
            let collection = open(&dir, CollectionConfig::new().with_index("foo"));
            collection.insert(&item("same", "a", 1)).unwrap();
            collection.insert(&item("same", "b", 2)).unwrap();
            collection.close().unwrap();
        }

        let collection = open(&dir, CollectionConfig::new().with_index("foo"));
        assert!(collection.find_by("foo", &Value::from("same")).unwrap_err().is_no_match());

        collection.init().unwrap();
        let docs = collection.find_by("foo", &Value::from("same")).unwrap();
        assert_eq!(ids(&docs), vec![1, 2]);
        assert_eq!(docs[1].data.bar, "b");

        collection.init().unwrap();
        let docs = collection.find_by("foo", &Value::from("same")).unwrap();
        assert_eq!(ids(&docs), vec![1, 2]);
    }

    #[test]
    fn init_without_indexes_is_noop() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());
        std::fs::write(dir.path().join("items").join("1.json"), b"garbage").unwrap();

        collection.init().unwrap();
    }

    #[test]
    fn init_surfaces_decode_failure() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new().with_index("foo"));
        collection.insert(&item("a", "b", 1)).unwrap();
        std::fs::write(dir.path().join("items").join("2.json"), b"garbage").unwrap();

        let err = collection.init().unwrap_err();
        assert!(matches!(err, CoreError::Initialization { .. }));
        assert!(matches!(err.root_cause(), CoreError::Decode { .. }));
    }

    #[test]
    fn dangling_index_entries_are_skipped() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new().with_index("foo"));
        collection.insert(&item("x", "a", 1)).unwrap();

        collection
            .state
            .write()
            .indexes
            .get_mut("foo")
            .unwrap()
            .insert(Value::from("x"), 99);

        let docs = collection.find_by("foo", &Value::from("x")).unwrap();
        assert_eq!(ids(&docs), vec![1]);
    }

    #[test]
    fn find_where_orders() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new().with_index("n"));
        for n in [5, 1, 9, 3] {
            collection.insert(&item("x", "y", n)).unwrap();
        }

        let less = collection
            .find_where("n", Operator::Less, &Value::Integer(5))
            .unwrap();
        let greater = collection
            .find_where("n", Operator::Greater, &Value::Integer(5))
            .unwrap();
        let equal = collection
            .find_where("n", Operator::Equals, &Value::Integer(5))
            .unwrap();

        assert_eq!(ids(&less), vec![2, 4]);
        assert_eq!(ids(&greater), vec![3]);
        assert_eq!(ids(&equal), vec![1]);
        assert!(collection
            .find_where("n", Operator::Greater, &Value::Integer(100))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn find_where_mixed_kinds_never_match() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());
        collection.insert(&item("x", "y", 5)).unwrap();

        let docs = collection
            .find_where("n", Operator::Less, &Value::from("9"))
            .unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn find_where_rejects_unorderable_operand() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());

        let err = collection
            .find_where("n", Operator::Greater, &Value::Null)
            .unwrap_err();
        assert!(matches!(
            err.root_cause(),
            CoreError::UnsupportedOperator {
                operator: Operator::Greater,
                value_type: "null"
            }
        ));
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Priced {
        price: f64,
        big: u64,
    }

    impl Document for Priced {}

    #[test]
    fn float_and_wide_integer_fields_are_indexed() {
        let dir = tempdir().unwrap();
        let config = CollectionConfig::new().with_index("price").with_index("big");
        let collection: Collection<Priced> =
            Collection::open(dir.path(), "priced", config.clone()).unwrap();

        collection.insert(&Priced { price: 1.5, big: u64::MAX }).unwrap();
        collection.insert(&Priced { price: 2.0, big: 7 }).unwrap();
        collection.insert(&Priced { price: 1.5, big: 7 }).unwrap();

        let price = ids(&collection.find_by("price", &Value::from(1.5)).unwrap());
        let big = ids(&collection.find_by("big", &Value::from(u64::MAX)).unwrap());
        assert_eq!(price, vec![1, 3]);
        assert_eq!(big, vec![1]);
        assert!(collection
            .find_by("price", &Value::Integer(2))
            .unwrap_err()
            .is_no_match());

        let reopened: Collection<Priced> =
            Collection::open(dir.path(), "priced", config).unwrap();
        reopened.init().unwrap();
        assert_eq!(ids(&reopened.find_by("price", &Value::from(2.0)).unwrap()), vec![2]);
        assert_eq!(ids(&reopened.find_by("big", &Value::Integer(7)).unwrap()), vec![2, 3]);
    }

    #[test]
    fn find_where_orders_floats_and_wide_integers() {
        let dir = tempdir().unwrap();
        let collection: Collection<Priced> =
            Collection::open(dir.path(), "priced", CollectionConfig::new()).unwrap();

        collection.insert(&Priced { price: 1.5, big: u64::MAX }).unwrap();
        collection.insert(&Priced { price: -3.25, big: 7 }).unwrap();

        let cheap = collection
            .find_where("price", Operator::Less, &Value::from(0.0))
            .unwrap();
        let wide = collection
            .find_where("big", Operator::Greater, &Value::from(i64::MAX))
            .unwrap();

        assert_eq!(ids(&cheap), vec![2]);
        assert_eq!(ids(&wide), vec![1]);
    }

    #[test]
    fn find_all_ignores_non_canonical_file_names() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());
        collection.insert(&item("a", "b", 1)).unwrap();

        let items = dir.path().join("items");
        std::fs::copy(items.join("1.json"), items.join("01.json")).unwrap();
        std::fs::copy(items.join("1.json"), items.join("+2.json")).unwrap();

        assert_eq!(ids(&collection.find_all().unwrap()), vec![1]);
        assert_eq!(ids(&collection.find_by("bar", &Value::from("b")).unwrap()), vec![1]);
    }

    #[test]
    fn atomic_cbor_collection() {
        let dir = tempdir().unwrap();
        let config = CollectionConfig::new()
            .with_index("bar")
            .format(DocumentFormat::Cbor)
            .insert_mode(InsertMode::Atomic)
            .sync_on_write(true);
        let collection = open(&dir, config);

        collection.insert(&item("a", "k", 1)).unwrap();
        collection.insert(&item("b", "k", 2)).unwrap();

        assert!(dir.path().join("items").join("2.cbor").exists());
        let docs = collection.find_by("bar", &Value::from("k")).unwrap();
        assert_eq!(ids(&docs), vec![1, 2]);
        assert_eq!(collection.get_by_id(2).unwrap().data, item("b", "k", 2));
    }

    #[test]
    fn concurrent_inserts_get_unique_ids() {
        let dir = tempdir().unwrap();
        let collection = Arc::new(open(&dir, CollectionConfig::new().with_index("foo")));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let collection = Arc::clone(&collection);
                thread::spawn(move || {
                    (0..25)
                        .map(|i| {
                            let payload = item("shared", &format!("{t}-{i}"), i);
                            let id = collection.insert(&payload).unwrap().id;
                            assert_eq!(collection.get_by_id(id).unwrap().data, payload);
                            id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (1..=200).collect::<Vec<_>>());

        let docs = collection.find_by("foo", &Value::from("shared")).unwrap();
        assert_eq!(docs.len(), 200);
    }

    #[test]
    fn close_and_reopen_continues_ids() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());
        collection.insert(&item("a", "b", 1)).unwrap();
        collection.insert(&item("a", "b", 2)).unwrap();
        collection.close().unwrap();

        let collection = open(&dir, CollectionConfig::new());
        assert_eq!(collection.insert(&item("a", "b", 3)).unwrap().id, 3);
    }

    #[test]
    fn insert_fails_on_existing_file() {
        let dir = tempdir().unwrap();
        let collection = open(&dir, CollectionConfig::new());
        std::fs::write(dir.path().join("items").join("1.json"), b"{}").unwrap();

        let err = collection.insert(&item("a", "b", 1)).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            CoreError::Storage(StorageError::AlreadyExists { id: 1, .. })
        ));

        // The failed ID is skipped, never reused.
        assert_eq!(collection.insert(&item("a", "b", 2)).unwrap().id, 2);
    }
}
