//! Bench command implementation.

use flatdb_core::{CollectionConfig, Database, Document, InsertMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Options for a bench run.
#[derive(Debug, Clone)]
pub struct BenchOptions {
    /// How long workers keep inserting.
    pub duration: Duration,
    /// Number of concurrent workers.
    pub workers: usize,
    /// Insert locking discipline.
    pub insert_mode: InsertMode,
    /// Fsync every write.
    pub sync_on_write: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct BenchPayload {
    foo: String,
}

impl Document for BenchPayload {}

/// Runs the bench command.
///
/// Inserts into a `bench` collection under `path`, or under a fresh
/// temporary directory when no path is given.
pub fn run(path: Option<&Path>, options: &BenchOptions) -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = match path {
        Some(_) => None,
        None => Some(tempfile::Builder::new().prefix("db-bench").tempdir()?),
    };
    let root: PathBuf = match (path, &temp_dir) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(dir)) => dir.path().to_path_buf(),
        (None, None) => return Err("no bench directory".into()),
    };

    let db = Database::open(&root)?;
    let config = CollectionConfig::new()
        .insert_mode(options.insert_mode)
        .sync_on_write(options.sync_on_write);
    let collection = db.collection_with::<BenchPayload>("bench", config)?;
    collection.init()?;

    let before = collection.count()?;
    let payload = BenchPayload {
        foo: "hello world".to_string(),
    };
    let failures = AtomicUsize::new(0);

    info!(
        path = %root.display(),
        workers = options.workers,
        duration = ?options.duration,
        "starting bench"
    );

    let start = Instant::now();
    let deadline = start + options.duration;

    thread::scope(|s| {
        for _ in 0..options.workers {
            s.spawn(|| {
                while Instant::now() < deadline {
                    if let Err(e) = collection.insert(&payload) {
                        error!(error = %e, "insert failed");
                        failures.fetch_add(1, Ordering::Relaxed);
                        break;
                    }
                }
            });
        }
    });

    let elapsed = start.elapsed();
    let inserted = collection.count()?.saturating_sub(before);
    collection.close()?;

    println!("inserted {} records", inserted);
    println!(
        "throughput {:.2} records/s",
        inserted as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );

    match failures.load(Ordering::Relaxed) {
        0 => Ok(()),
        n => Err(format!("{n} workers stopped on insert errors").into()),
    }
}
