//! Comparison operators.

use crate::error::CoreError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A comparison between a document field and a query operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`: structural equality. Served by an index when one exists.
    Equals,
    /// `<`: the field orders before the operand.
    Less,
    /// `>`: the field orders after the operand.
    Greater,
}

impl Operator {
    /// Returns the query token for this operator.
    pub fn token(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::Less => "<",
            Operator::Greater => ">",
        }
    }

    /// Returns true if a field comparing to the operand as `ordering`
    /// satisfies this operator.
    pub fn accepts(self, ordering: Ordering) -> bool {
        matches!(
            (self, ordering),
            (Operator::Equals, Ordering::Equal)
                | (Operator::Less, Ordering::Less)
                | (Operator::Greater, Ordering::Greater)
        )
    }
}

impl FromStr for Operator {
    type Err = CoreError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "=" => Ok(Operator::Equals),
            "<" => Ok(Operator::Less),
            ">" => Ok(Operator::Greater),
            _ => Err(CoreError::InvalidOperator {
                token: token.to_string(),
            }),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
