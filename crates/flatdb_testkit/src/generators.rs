//! Property-based test generators using proptest.
//!
//! Strategies draw field values from small alphabets so that generated
//! records collide often and filters select non-trivial subsets.

use crate::fixtures::Record;
use flatdb_core::{Operator, Query, Value};
use proptest::prelude::*;

/// Field names of [`Record`] that hold text.
pub const TEXT_FIELDS: [&str; 2] = ["Foo", "Bar"];

/// Strategy for generating valid collection names.
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,31}").expect("Invalid regex")
}

/// Strategy for generating a `Foo` value.
pub fn foo_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(String::from)
}

/// Strategy for generating a `Bar` value.
pub fn bar_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["x", "y", "z"]).prop_map(String::from)
}

/// Strategy for generating records.
pub fn record_strategy() -> impl Strategy<Value = Record> {
    (foo_strategy(), bar_strategy(), -5i64..5)
        .prop_map(|(foo, bar, rank)| Record::new(foo, bar).with_rank(rank))
}

/// Strategy for generating up to `max` records.
pub fn records_strategy(max: usize) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(record_strategy(), 0..=max)
}

/// Strategy for generating orderable scalar values.
pub fn scalar_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        "[a-z]{0,8}".prop_map(Value::Text),
        (i64::MAX as u64 + 1..=u64::MAX).prop_map(Value::Unsigned),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
    ]
}

/// Strategy for generating a single filter on a [`Record`] field.
pub fn filter_strategy() -> impl Strategy<Value = Query> {
    let operator = prop::sample::select(vec![Operator::Equals, Operator::Less, Operator::Greater]);
    prop_oneof![
        (operator.clone(), foo_strategy()).prop_map(|(op, v)| Query::filter("Foo", op, v)),
        (operator.clone(), bar_strategy()).prop_map(|(op, v)| Query::filter("Bar", op, v)),
        (operator, -6i64..6).prop_map(|(op, v)| Query::filter("Rank", op, v)),
    ]
}

/// Strategy for generating AND/OR trees of filters, with `Select` leaves.
pub fn query_strategy() -> impl Strategy<Value = Query> {
    let leaf = prop_oneof![4 => filter_strategy(), 1 => Just(Query::Select)];
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l.and(r)),
            (inner.clone(), inner).prop_map(|(l, r)| l.or(r)),
        ]
    })
}
