//! Fluent query construction.

use crate::collection::{Collection, Document};
use crate::error::CoreResult;
use crate::query::Query;
use flatdb_codec::{Envelope, Value};
use tracing::debug;

/// A chainable cursor over a collection's query.
///
/// The builder starts from [`Query::Nop`]. `filter` and `select` replace
/// the held query, `and`/`or` combine it with another query, and
/// `limit`/`offset` wrap it.
///
/// `and` and `or` take the other operand by value, so a builder passed in
/// is consumed: its expression is fixed at the time of composition.
///
/// # Example
///
/// ```rust,ignore
/// let hello = collection.query().filter("foo", "=", "hello");
/// let world = collection.query().filter("bar", "=", "world");
///
/// let both = hello.and(world).execute()?;
/// ```
#[derive(Debug)]
pub struct QueryBuilder<'a, T: Document> {
    collection: &'a Collection<T>,
    query: Query,
}

impl<'a, T: Document> QueryBuilder<'a, T> {
    pub(crate) fn new(collection: &'a Collection<T>) -> Self {
        Self {
            collection,
            query: Query::Nop,
        }
    }

    /// Replaces the query with a filter `field <token> value`.
    ///
    /// An unrecognized token is not reported here; `execute` fails with
    /// `InvalidOperator` instead.
    #[must_use]
    pub fn filter(mut self, field: &str, token: &str, value: impl Into<Value>) -> Self {
        self.query = Query::parse_filter(field, token, value);
        self
    }

    /// Intersects the query with `other`.
    #[must_use]
    pub fn and(mut self, other: impl Into<Query>) -> Self {
        self.query = self.query.and(other);
        self
    }

    /// Unites the query with `other`.
    #[must_use]
    pub fn or(mut self, other: impl Into<Query>) -> Self {
        self.query = self.query.or(other);
        self
    }

    /// Replaces the query with one selecting every document.
    #[must_use]
    pub fn select(mut self) -> Self {
        self.query = Query::Select;
        self
    }

    /// Keeps at most the first `count` results.
    #[must_use]
    pub fn limit(mut self, count: usize) -> Self {
        self.query = self.query.limit(count);
        self
    }

    /// Skips the first `count` results.
    #[must_use]
    pub fn offset(mut self, count: usize) -> Self {
        self.query = self.query.offset(count);
        self
    }

    /// Returns the query built so far.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Consumes the builder, returning its query.
    pub fn into_query(self) -> Query {
        self.query
    }

    /// Executes the query built so far.
    pub fn execute(&self) -> CoreResult<Vec<Envelope<T>>> {
        debug!(collection = self.collection.name(), query = %self.query, "executing query");
        self.query.execute(self.collection)
    }
}

impl<T: Document> From<QueryBuilder<'_, T>> for Query {
    fn from(builder: QueryBuilder<'_, T>) -> Self {
        builder.query
    }
}
