//! Benchmark utilities.

#![warn(missing_docs)]

use flatdb_core::Document;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Payload used by the benchmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchRecord {
    /// Low-cardinality field, one of `"k0"` to `"k9"`.
    pub key: String,
    /// Random text of the requested size.
    pub body: String,
    /// Sequence number.
    pub seq: i64,
}

impl Document for BenchRecord {}

/// Generate random alphanumeric text of the specified length.
pub fn random_text(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate random bytes of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate `count` records with bodies of `body_size` bytes.
pub fn generate_records(count: usize, body_size: usize) -> Vec<BenchRecord> {
    (0..count)
        .map(|i| BenchRecord {
            key: format!("k{}", i % 10),
            body: random_text(body_size),
            seq: i as i64,
        })
        .collect()
}
