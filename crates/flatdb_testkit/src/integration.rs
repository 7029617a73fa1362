//! Cross-crate integration test helpers.
//!
//! [`IntegrationHarness`] keeps an in-memory model of every record it
//! inserts, so collection reads and query results can be checked against
//! a straightforward reference evaluation.

use crate::fixtures::{Record, TestDatabase};
use flatdb_core::{Collection, CollectionConfig, Document, Envelope, Query};
use std::collections::{BTreeMap, BTreeSet};

/// A test harness pairing a collection with its expected contents.
pub struct IntegrationHarness {
    /// The database (kept alive for the collection's directory).
    pub db: TestDatabase,
    /// The collection under test.
    pub collection: Collection<Record>,
    /// Expected records by ID.
    expected: BTreeMap<u64, Record>,
}

impl IntegrationHarness {
    /// Creates a harness over a fresh `records` collection.
    pub fn new(config: CollectionConfig) -> Self {
        let db = TestDatabase::new();
        let collection = db.records("records", config);
        Self {
            db,
            collection,
            expected: BTreeMap::new(),
        }
    }

    /// Inserts a record and tracks it for later verification.
    pub fn insert(&mut self, record: Record) -> u64 {
        let id = self
            .collection
            .insert(&record)
            .expect("Failed to insert record")
            .id;
        self.expected.insert(id, record);
        id
    }

    /// Inserts every record in order, returning the assigned IDs.
    pub fn insert_all(&mut self, records: impl IntoIterator<Item = Record>) -> Vec<u64> {
        records.into_iter().map(|r| self.insert(r)).collect()
    }

    /// Returns the count of tracked records.
    pub fn tracked_count(&self) -> usize {
        self.expected.len()
    }

    /// Verifies every tracked record reads back by ID.
    pub fn verify_all(&self) {
        for (id, expected) in &self.expected {
            let doc = self
                .collection
                .get_by_id(*id)
                .expect("Failed to get record");
            assert_eq!(doc.id, *id);
            assert_eq!(&doc.data, expected, "Record mismatch for ID {id}");
        }
    }

    /// Closes the collection and opens it again with `config`, rebuilding
    /// its indexes.
    pub fn reopen(self, config: CollectionConfig) -> Self {
        let Self {
            db,
            collection,
            expected,
        } = self;
        collection.close().expect("Failed to close collection");
        let collection = db.records("records", config);
        Self {
            db,
            collection,
            expected,
        }
    }

    /// Executes `query` and returns the IDs of its results as a set.
    pub fn result_ids(&self, query: &Query) -> BTreeSet<u64> {
        ids(&query
            .execute(&self.collection)
            .expect("Failed to execute query"))
    }

    /// Evaluates `query` against the tracked records without touching the
    /// collection.
    ///
    /// `Limit` and `Offset` are order-dependent and evaluated over the
    /// ID-ordered result of their input.
    pub fn model_ids(&self, query: &Query) -> BTreeSet<u64> {
        match query {
            Query::Nop | Query::Invalid { .. } => BTreeSet::new(),
            Query::Select => self.expected.keys().copied().collect(),
            Query::Where {
                field,
                operator,
                value,
            } => self
                .expected
                .iter()
                .filter(|(_, record)| {
                    record
                        .field(field)
                        .and_then(|v| v.compare(value))
                        .is_some_and(|ordering| operator.accepts(ordering))
                })
                .map(|(id, _)| *id)
                .collect(),
            Query::And(left, right) => {
                let left = self.model_ids(left);
                let right = self.model_ids(right);
                left.intersection(&right).copied().collect()
            }
            Query::Or(left, right) => {
                let mut left = self.model_ids(left);
                left.extend(self.model_ids(right));
                left
            }
            Query::Limit { input, count } => {
                self.model_ids(input).into_iter().take(*count).collect()
            }
            Query::Offset { input, count } => {
                self.model_ids(input).into_iter().skip(*count).collect()
            }
        }
    }
}

/// Collects envelope IDs into a set.
pub fn ids<T>(docs: &[Envelope<T>]) -> BTreeSet<u64> {
    docs.iter().map(|doc| doc.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::scenarios;
    use crate::generators::{bar_strategy, foo_strategy, query_strategy, records_strategy};
    use flatdb_core::{Operator, Value};
    use proptest::prelude::*;

    fn indexed() -> CollectionConfig {
        CollectionConfig::new().with_index("Foo").with_index("Rank")
    }

    #[test]
    fn test_integration_harness() {
        let mut harness = IntegrationHarness::new(indexed());
        harness.insert(Record::new("a", "b"));
        harness.insert(Record::new("c", "d").with_rank(4));

        assert_eq!(harness.tracked_count(), 2);
        harness.verify_all();
    }

    #[test]
    fn test_hello_world_scenario() {
        let (_db, c) = scenarios::hello_world();

        let hello = Query::filter("Foo", Operator::Equals, "hello");
        let world = Query::filter("Bar", Operator::Equals, "world");

        let and = hello.clone().and(world.clone()).execute(&c).unwrap();
        assert_eq!(ids(&and), BTreeSet::from([2]));

        let or = hello.clone().or(world).execute(&c).unwrap();
        assert_eq!(or.len(), 3);

        assert_eq!(hello.execute(&c).unwrap().len(), 2);
    }

    #[test]
    fn test_index_persists_across_reopen() {
        let mut harness = IntegrationHarness::new(indexed());
        harness.insert(Record::new("same", "first"));
        harness.insert(Record::new("same", "second"));

        let harness = harness.reopen(indexed());
        let docs = harness
            .collection
            .find_by("Foo", &Value::from("same"))
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, 1);
        assert_eq!(docs[0].data.bar, "first");
        assert_eq!(docs[1].id, 2);
        assert_eq!(docs[1].data.bar, "second");
    }

    #[test]
    fn test_on_disk_layout() {
        let mut harness = IntegrationHarness::new(CollectionConfig::new());
        harness.insert(Record::new("hello", "5"));
        harness.insert(Record::new("hello", "world").with_rank(2));

        let dir = harness.db.path().join("records");
        assert_eq!(
            std::fs::read(dir.join(flatdb_core::ID_FILE)).unwrap(),
            [0, 0, 0, 0, 0, 0, 0, 2]
        );
        assert_eq!(
            flatdb_storage::IdCounter::peek(&dir.join(flatdb_core::ID_FILE)).unwrap(),
            2
        );

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.join("2.json")).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({"ID": 2, "Data": {"Foo": "hello", "Bar": "world", "Rank": 2}})
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn ids_are_dense_and_monotonic(records in records_strategy(40)) {
            let mut harness = IntegrationHarness::new(CollectionConfig::new());
            let assigned = harness.insert_all(records.clone());

            let expected: Vec<u64> = (1..=records.len() as u64).collect();
            prop_assert_eq!(assigned, expected);
            harness.verify_all();
        }

        #[test]
        fn index_and_scan_agree(
            records in records_strategy(30),
            foo in foo_strategy(),
            bar in bar_strategy(),
        ) {
            let mut harness = IntegrationHarness::new(CollectionConfig::new().with_index("Foo").with_index("Bar"));
            harness.insert_all(records);

            let scanning: Collection<Record> = harness
                .db
                .collection("records")
                .unwrap();

            for (field, value) in [("Foo", Value::from(foo)), ("Bar", Value::from(bar))] {
                let indexed = harness.collection.find_by(field, &value);
                let scanned = scanning.find_by(field, &value);
                match (indexed, scanned) {
                    (Ok(a), Ok(b)) => prop_assert_eq!(ids(&a), ids(&b)),
                    (Err(a), Err(b)) => {
                        prop_assert!(a.is_no_match());
                        prop_assert!(b.is_no_match());
                    }
                    (a, b) => prop_assert!(false, "indexed {:?} vs scanned {:?}", a.is_ok(), b.is_ok()),
                }
            }
        }

        #[test]
        fn queries_match_model(records in records_strategy(25), query in query_strategy()) {
            let mut harness = IntegrationHarness::new(indexed());
            harness.insert_all(records);

            prop_assert_eq!(harness.result_ids(&query), harness.model_ids(&query));
        }

        #[test]
        fn and_or_laws(
            records in records_strategy(25),
            a in query_strategy(),
            b in query_strategy(),
            c in query_strategy(),
        ) {
            let mut harness = IntegrationHarness::new(indexed());
            harness.insert_all(records);
            let run = |q: Query| harness.result_ids(&q);

            // Commutativity
            prop_assert_eq!(run(a.clone().and(b.clone())), run(b.clone().and(a.clone())));
            prop_assert_eq!(run(a.clone().or(b.clone())), run(b.clone().or(a.clone())));

            // Idempotence
            prop_assert_eq!(run(a.clone().and(a.clone())), run(a.clone()));
            prop_assert_eq!(run(a.clone().or(a.clone())), run(a.clone()));

            // Associativity
            prop_assert_eq!(
                run(a.clone().and(b.clone()).and(c.clone())),
                run(a.clone().and(b.clone().and(c.clone())))
            );
            prop_assert_eq!(
                run(a.clone().or(b.clone()).or(c.clone())),
                run(a.or(b.or(c)))
            );
        }

        #[test]
        fn limit_and_offset_boundaries(count in 0usize..12, n in 0usize..15) {
            let (_db, c) = scenarios::populated(count);

            let limited = Query::Select.limit(n).execute(&c).unwrap();
            prop_assert_eq!(limited.len(), n.min(count));

            let skipped = Query::Select.offset(n).execute(&c).unwrap();
            prop_assert_eq!(skipped.len(), count.saturating_sub(n));
            if n == 0 {
                prop_assert_eq!(ids(&skipped), ids(&c.find_all().unwrap()));
            }
        }
    }
}
