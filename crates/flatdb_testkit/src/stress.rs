//! Stress tests for FlatDB.
//!
//! These helpers drive a shared collection from many threads and report
//! throughput. They verify behavior under concurrent inserts and reads.

use crate::fixtures::Record;
use flatdb_core::{Collection, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Operations per thread.
    pub operations: usize,
    /// Number of concurrent threads.
    pub threads: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 1_000,
            threads: 4,
        }
    }
}

/// Inserts `operations` records from each of `threads` threads.
///
/// Each thread tags its records with `Foo = "t<thread>"`.
pub fn stress_concurrent_inserts(
    collection: Arc<Collection<Record>>,
    config: &StressConfig,
) -> StressTestResult {
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|t| {
            let collection = Arc::clone(&collection);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let operations = config.operations;

            thread::spawn(move || {
                for i in 0..operations {
                    let record = Record::new(format!("t{t}"), format!("{i}")).with_rank(i as i64);
                    match collection.insert(&record) {
                        Ok(_) => successful.fetch_add(1, Ordering::Relaxed),
                        Err(_) => failed.fetch_add(1, Ordering::Relaxed),
                    };
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Runs inserting threads alongside reading threads.
///
/// Writers insert as in [`stress_concurrent_inserts`]. Readers alternate
/// between an indexed `Foo` lookup, a read of the latest allocated ID and a
/// full scan. A lookup that matches nothing yet, or an ID whose document is
/// still being written, counts as success; decode failures and other errors
/// count as failures.
pub fn stress_mixed_operations(
    collection: Arc<Collection<Record>>,
    config: &StressConfig,
) -> StressTestResult {
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();

    let writers = (0..config.threads).map(|t| {
        let collection = Arc::clone(&collection);
        let successful = Arc::clone(&successful);
        let failed = Arc::clone(&failed);
        let operations = config.operations;

        thread::spawn(move || {
            for i in 0..operations {
                let record = Record::new(format!("t{t}"), format!("{i}"));
                match collection.insert(&record) {
                    Ok(_) => successful.fetch_add(1, Ordering::Relaxed),
                    Err(_) => failed.fetch_add(1, Ordering::Relaxed),
                };
            }
        })
    });

    let readers = (0..config.threads).map(|t| {
        let collection = Arc::clone(&collection);
        let successful = Arc::clone(&successful);
        let failed = Arc::clone(&failed);
        let operations = config.operations;

        thread::spawn(move || {
            let tag = Value::from(format!("t{t}"));
            for i in 0..operations {
                let ok = match i % 16 {
                    0 => collection.find_all().is_ok(),
                    n if n % 2 == 0 => match collection.find_by("Foo", &tag) {
                        Ok(_) => true,
                        Err(e) => e.is_no_match(),
                    },
                    _ => match collection.last_id() {
                        Ok(0) => true,
                        Ok(id) => match collection.get_by_id(id) {
                            Ok(doc) => doc.id == id,
                            Err(e) => e.is_not_found(),
                        },
                        Err(_) => false,
                    },
                };
                if ok {
                    successful.fetch_add(1, Ordering::Relaxed);
                } else {
                    failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        })
    });

    let handles: Vec<_> = writers.chain(readers).collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Returns true if the collection holds exactly the IDs `1..=last_id`.
pub fn ids_are_dense(collection: &Collection<Record>) -> bool {
    let Ok(last) = collection.last_id() else {
        return false;
    };
    let Ok(all) = collection.find_all() else {
        return false;
    };
    all.iter().map(|doc| doc.id).eq(1..=last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TestDatabase;
    use flatdb_core::{CollectionConfig, InsertMode};

    fn shared(db: &TestDatabase, mode: InsertMode) -> Arc<Collection<Record>> {
        Arc::new(db.records(
            "stress",
            CollectionConfig::new().with_index("Foo").insert_mode(mode),
        ))
    }

    #[test]
    fn test_concurrent_inserts_phased() {
        let db = TestDatabase::new();
        let collection = shared(&db, InsertMode::Phased);
        let config = StressConfig {
            operations: 100,
            threads: 4,
        };

        let result = stress_concurrent_inserts(Arc::clone(&collection), &config);
        assert_eq!(result.failed_ops, 0);
        assert_eq!(result.successful_ops, 400);
        assert_eq!(collection.last_id().unwrap(), 400);
        assert!(ids_are_dense(&collection));

        for t in 0..4 {
            let tagged = collection
                .find_by("Foo", &Value::from(format!("t{t}")))
                .unwrap();
            assert_eq!(tagged.len(), 100);
        }
    }

    #[test]
    fn test_concurrent_inserts_atomic() {
        let db = TestDatabase::new();
        let collection = shared(&db, InsertMode::Atomic);
        let config = StressConfig {
            operations: 50,
            threads: 8,
        };

        let result = stress_concurrent_inserts(Arc::clone(&collection), &config);
        assert_eq!(result.failed_ops, 0);
        assert!(ids_are_dense(&collection));
    }

    #[test]
    fn test_mixed_operations() {
        let db = TestDatabase::new();
        let collection = shared(&db, InsertMode::Phased);
        let config = StressConfig {
            operations: 100,
            threads: 3,
        };

        let result = stress_mixed_operations(Arc::clone(&collection), &config);
        assert_eq!(result.failed_ops, 0);
        assert_eq!(result.total_ops, 600);
        assert_eq!(collection.count().unwrap(), 300);
    }
}
