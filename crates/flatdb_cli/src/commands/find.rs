//! Find command implementation.

use super::RawDocument;
use flatdb_core::{CollectionConfig, Database, DatabaseConfig, DocumentFormat, Query, Value};
use std::path::Path;
use tracing::{debug, warn};

/// A filter given on the command line.
#[derive(Debug)]
pub struct Filter {
    /// Field to filter on.
    pub field: String,
    /// Operator token.
    pub op: String,
    /// Operand as typed.
    pub value: String,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Results to skip.
    pub offset: usize,
    /// Document format; detected from the files on disk when `None`.
    pub format: Option<DocumentFormat>,
}

impl Filter {
    /// Builds the query this filter describes.
    pub fn query(&self) -> Result<Query, Box<dyn std::error::Error>> {
        let mut query = Query::try_filter(&self.field, &self.op, parse_value(&self.value))?;
        if self.offset > 0 {
            query = query.offset(self.offset);
        }
        if let Some(limit) = self.limit {
            query = query.limit(limit);
        }
        Ok(query)
    }
}

/// Runs the find command, printing one envelope per line as JSON.
pub fn run(path: &Path, collection: &str, filter: &Filter) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_with_config(path, DatabaseConfig::new().create_if_missing(false))?;
    if !db.collection_names()?.iter().any(|name| name == collection) {
        return Err(format!("No collection named {collection:?} in {}", path.display()).into());
    }

    let query = filter.query()?;
    let format = match filter.format {
        Some(format) => format,
        None => detect_format(&db, collection)?,
    };
    let collection = db.collection_with::<RawDocument>(
        collection,
        CollectionConfig::new().format(format),
    )?;

    for doc in query.execute(&collection)? {
        println!("{}", serde_json::to_string(&doc)?);
    }

    Ok(())
}

/// Picks the format with more document files in the collection.
///
/// An empty collection, or a tie, reads as JSON.
pub fn detect_format(db: &Database, name: &str) -> Result<DocumentFormat, Box<dyn std::error::Error>> {
    let json = db.collection::<RawDocument>(name)?.count()?;
    let cbor = db
        .collection_with::<RawDocument>(name, CollectionConfig::new().format(DocumentFormat::Cbor))?
        .count()?;

    if json > 0 && cbor > 0 {
        warn!(collection = name, json, cbor, "collection mixes JSON and CBOR documents");
    }
    let format = if cbor > json {
        DocumentFormat::Cbor
    } else {
        DocumentFormat::Json
    };
    debug!(collection = name, ?format, "detected document format");
    Ok(format)
}

/// Interprets a command-line operand.
fn parse_value(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Integer(n);
    }
    if let Ok(n) = raw.parse::<u64>() {
        return Value::from(n);
    }
    if let Some(x) = raw.parse::<f64>().ok().filter(|x| x.is_finite()) {
        return Value::from(x);
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => Value::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn operands() {
        assert_eq!(parse_value("42"), Value::Integer(42));
        assert_eq!(parse_value("-1"), Value::Integer(-1));
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("null"), Value::Null);
        assert_eq!(parse_value("hello"), Value::from("hello"));
        assert_eq!(parse_value("1.5"), Value::from(1.5));
        assert_eq!(parse_value("18446744073709551615"), Value::Unsigned(u64::MAX));
        assert_eq!(parse_value("nan"), Value::from("nan"));
    }

    #[test]
    fn query_shape() {
        let filter = Filter {
            field: "name".into(),
            op: ">".into(),
            value: "m".into(),
            limit: Some(5),
            offset: 2,
            format: None,
        };
        assert_eq!(filter.query().unwrap().to_string(), "name > \"m\" OFFSET 2 LIMIT 5");
    }

    #[test]
    fn bad_operator() {
        let filter = Filter {
            field: "name".into(),
            op: "~".into(),
            value: "m".into(),
            limit: None,
            offset: 0,
            format: None,
        };
        assert!(filter.query().is_err());
    }

    #[test]
    fn detects_cbor_collection() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        let cbor = db
            .collection_with::<RawDocument>(
                "events",
                CollectionConfig::new().format(DocumentFormat::Cbor),
            )
            .unwrap();
        cbor.insert(&RawDocument(json!({"kind": "start"}))).unwrap();
        cbor.insert(&RawDocument(json!({"kind": "stop"}))).unwrap();
        db.collection::<RawDocument>("empty").unwrap();

        assert_eq!(detect_format(&db, "events").unwrap(), DocumentFormat::Cbor);
        assert_eq!(detect_format(&db, "empty").unwrap(), DocumentFormat::Json);

        let collection = db
            .collection_with::<RawDocument>(
                "events",
                CollectionConfig::new().format(detect_format(&db, "events").unwrap()),
            )
            .unwrap();
        let query = Query::filter("kind", flatdb_core::Operator::Equals, "stop");
        let docs = query.execute(&collection).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, 2);
    }
}
