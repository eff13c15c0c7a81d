//! Operation sequences produced by the interpreter.
//!
//! A [`Pipeline`] is a chain of operations applied in order to the value
//! bound to its variable. Nested pipelines (filter predicates, comparison
//! operands, multi-select branches) name the variable they read, which is
//! either the enclosing pipeline's variable or a fresh one bound per element.

use crate::ast::Comparator;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub variable: String,
    pub operations: Vec<Operation>,
}

impl Pipeline {
    pub fn new(variable: impl Into<String>, operations: Vec<Operation>) -> Self {
        Pipeline {
            variable: variable.into(),
            operations,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Object member lookup
    Field(String),

    /// Array element; negative indexes count from the end
    Index(i64),

    /// Merge one level of nested arrays and start a projection
    Flatten,

    /// Object values or array elements as a projection
    Wildcard,

    /// Keep the elements for which the predicate is truthy
    Filter(Pipeline),

    Compare(Comparator, Pipeline),
    Or(Pipeline),
    And(Pipeline),

    /// Boolean negation of the current value's truthiness
    Not,

    /// Replace the current value
    Constant(Constant),

    Length,

    /// Membership of the needle's value in the current array or string
    Contains(Pipeline),

    /// One result per branch, each branch reading the current value
    MultiSelectList(Vec<Pipeline>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Value(Value),
    Pipeline(Pipeline),
}
