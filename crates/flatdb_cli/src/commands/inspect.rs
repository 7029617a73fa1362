//! Inspect command implementation.

use super::RawDocument;
use flatdb_core::{CollectionConfig, Database, DatabaseConfig, DocumentFormat};
use serde::Serialize;
use std::path::Path;

/// Database inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Database path.
    pub path: String,
    /// Database name.
    pub name: String,
    /// Per-collection statistics, sorted by name.
    pub collections: Vec<CollectionStats>,
}

/// Statistics for a single collection.
#[derive(Debug, Serialize)]
pub struct CollectionStats {
    /// Collection name.
    pub name: String,
    /// Last allocated ID.
    pub last_id: u64,
    /// Number of JSON document files.
    pub json_documents: usize,
    /// Number of CBOR document files.
    pub cbor_documents: usize,
}

impl CollectionStats {
    /// IDs allocated without a document file (failed or in-flight inserts).
    pub fn missing(&self) -> u64 {
        let present = (self.json_documents + self.cbor_documents) as u64;
        self.last_id.saturating_sub(present)
    }
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_with_config(path, DatabaseConfig::new().create_if_missing(false))?;

    let mut result = InspectResult {
        path: path.display().to_string(),
        name: db.name().to_string(),
        collections: Vec::new(),
    };

    for name in db.collection_names()? {
        let json = db.collection::<RawDocument>(&name)?;
        let cbor = db.collection_with::<RawDocument>(
            &name,
            CollectionConfig::new().format(DocumentFormat::Cbor),
        )?;

        result.collections.push(CollectionStats {
            last_id: json.last_id()?,
            json_documents: json.count()?,
            cbor_documents: cbor.count()?,
            name,
        });
    }

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("FlatDB Database Inspection");
    println!("==========================");
    println!();
    println!("Path: {}", result.path);
    println!("Name: {}", result.name);
    println!();

    if result.collections.is_empty() {
        println!("No collections.");
        return;
    }

    println!("Collections:");
    for col in &result.collections {
        println!(
            "  {}: last ID {}, {} JSON / {} CBOR documents",
            col.name, col.last_id, col.json_documents, col.cbor_documents
        );
        if col.missing() > 0 {
            println!("    {} allocated IDs have no document", col.missing());
        }
    }
}
