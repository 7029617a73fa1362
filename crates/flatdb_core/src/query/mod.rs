//! Query engine.
//!
//! Queries are trees of [`Query`] nodes evaluated against a collection.
//! [`QueryBuilder`] offers a chainable way to assemble them.

mod builder;
mod node;
mod operator;

pub use builder::QueryBuilder;
pub use node::Query;
pub use operator::Operator;
