//! Query expression tree and its evaluation.

use crate::collection::{Collection, Document};
use crate::error::{CoreError, CoreResult};
use crate::query::Operator;
use flatdb_codec::{Envelope, Value};
use std::collections::HashSet;
use std::fmt;

/// A composable query over one collection.
///
/// Nodes are independent of the payload type and can be built once and
/// executed against any [`Collection`]. Result ordering is part of the
/// contract:
///
/// - `And(l, r)` keeps the documents of `r` whose IDs appear in `l`, in
///   `r`'s order.
/// - `Or(l, r)` yields `l`, then the documents of `r` not already seen.
/// - `Select` yields every document in ID order.
/// - `Limit` and `Offset` slice their input without reordering it.
///
/// As sets of IDs, `And` and `Or` are commutative, associative and
/// idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Query {
    /// Matches nothing. The starting point of a [`QueryBuilder`](crate::QueryBuilder).
    #[default]
    Nop,
    /// Documents whose `field` compares to `value` by `operator`.
    Where {
        /// Payload field name.
        field: String,
        /// Comparison.
        operator: Operator,
        /// Operand.
        value: Value,
    },
    /// Intersection.
    And(Box<Query>, Box<Query>),
    /// Union.
    Or(Box<Query>, Box<Query>),
    /// Every document in the collection.
    Select,
    /// The first `count` results of `input`.
    Limit {
        /// Inner query.
        input: Box<Query>,
        /// Maximum number of results.
        count: usize,
    },
    /// The results of `input` after skipping `count`.
    Offset {
        /// Inner query.
        input: Box<Query>,
        /// Number of results to skip.
        count: usize,
    },
    /// A filter whose operator token did not parse. Fails on execution.
    Invalid {
        /// Field the filter was on.
        field: String,
        /// The rejected token.
        token: String,
    },
}

impl Query {
    /// Creates a filter node.
    pub fn filter(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Query::Where {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Creates a filter node from an operator token (`=`, `<` or `>`).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidOperator`] for any other token.
    pub fn try_filter(
        field: impl Into<String>,
        token: &str,
        value: impl Into<Value>,
    ) -> CoreResult<Self> {
        Ok(Self::filter(field, token.parse()?, value))
    }

    /// Like [`Query::try_filter`], but an unknown token yields a
    /// [`Query::Invalid`] node that reports the error when executed.
    pub fn parse_filter(field: impl Into<String>, token: &str, value: impl Into<Value>) -> Self {
        let field = field.into();
        match token.parse() {
            Ok(operator) => Self::filter(field, operator, value),
            Err(_) => Query::Invalid {
                field,
                token: token.to_string(),
            },
        }
    }

    /// Intersects this query with `other`.
    #[must_use]
    pub fn and(self, other: impl Into<Query>) -> Self {
        Query::And(Box::new(self), Box::new(other.into()))
    }

    /// Unites this query with `other`.
    #[must_use]
    pub fn or(self, other: impl Into<Query>) -> Self {
        Query::Or(Box::new(self), Box::new(other.into()))
    }

    /// Keeps at most the first `count` results.
    #[must_use]
    pub fn limit(self, count: usize) -> Self {
        Query::Limit {
            input: Box::new(self),
            count,
        }
    }

    /// Skips the first `count` results.
    #[must_use]
    pub fn offset(self, count: usize) -> Self {
        Query::Offset {
            input: Box::new(self),
            count,
        }
    }

    /// Short name of this node kind, used in error context.
    pub fn kind(&self) -> &'static str {
        match self {
            Query::Nop => "nop",
            Query::Where { .. } | Query::Invalid { .. } => "where",
            Query::And(..) => "and",
            Query::Or(..) => "or",
            Query::Select => "select",
            Query::Limit { .. } => "limit",
            Query::Offset { .. } => "offset",
        }
    }

    /// Evaluates this query against `collection`.
    ///
    /// A filter that matches nothing yields an empty result. Any other
    /// failure is returned wrapped with the kind of each enclosing node.
    pub fn execute<T: Document>(&self, collection: &Collection<T>) -> CoreResult<Vec<Envelope<T>>> {
        self.evaluate(collection)
            .map_err(|e| CoreError::query(self.kind(), e))
    }

    fn evaluate<T: Document>(&self, collection: &Collection<T>) -> CoreResult<Vec<Envelope<T>>> {
        match self {
            Query::Nop => Ok(Vec::new()),
            Query::Where {
                field,
                operator,
                value,
            } => match collection.find_where(field, *operator, value) {
                Err(e) if e.is_no_match() => Ok(Vec::new()),
                other => other,
            },
            Query::Invalid { token, .. } => Err(CoreError::InvalidOperator {
                token: token.clone(),
            }),
            Query::And(left, right) => {
                let left = left.execute(collection)?;
                let right = right.execute(collection)?;

                let ids: HashSet<u64> = left.iter().map(|doc| doc.id).collect();
                Ok(right
                    .into_iter()
                    .filter(|doc| ids.contains(&doc.id))
                    .collect())
            }
            Query::Or(left, right) => {
                let mut result = left.execute(collection)?;
                let right = right.execute(collection)?;

                let mut seen: HashSet<u64> = result.iter().map(|doc| doc.id).collect();
                result.extend(right.into_iter().filter(|doc| seen.insert(doc.id)));
                Ok(result)
            }
            Query::Select => collection.find_all(),
            Query::Limit { input, count } => {
                let mut result = input.execute(collection)?;
                result.truncate(*count);
                Ok(result)
            }
            Query::Offset { input, count } => {
                let result = input.execute(collection)?;
                Ok(result.into_iter().skip(*count).collect())
            }
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Nop => f.write_str("NOP"),
            Query::Where {
                field,
                operator,
                value,
            } => write!(f, "{field} {operator} {value}"),
            Query::Invalid { field, token } => write!(f, "{field} {token}? <invalid>"),
            Query::And(left, right) => write!(f, "({left} AND {right})"),
            Query::Or(left, right) => write!(f, "({left} OR {right})"),
            Query::Select => f.write_str("SELECT"),
            Query::Limit { input, count } => write!(f, "{input} LIMIT {count}"),
            Query::Offset { input, count } => write!(f, "{input} OFFSET {count}"),
        }
    }
}
