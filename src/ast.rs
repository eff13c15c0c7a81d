//! # Path Expressions - Abstract Syntax Tree
//!
//! This module defines the tree produced by [`crate::parser::parse`] for the
//! JMESPath subset used by waiter acceptors.
//!
//! ## Architecture Overview
//!
//! - **[expressions]** - The [`Expression`] enum and its binary/unary nodes
//! - **[brackets]** - Bracket specifiers: `[]`, `[0]`, `[*]`, `[1:2]`, `[?a]`
//! - **[operators]** - Comparison operators
//! - **[functions]** - Function calls and their arguments
//! - **[multi_select]** - `[a, b]` lists and `{k: v}` hashes
//!
//! ## Quick Start
//!
//! ```text
//! length(Reservations[].Instances[?State.Name == 'running']) > `0`
//! ```
//!
//! parses into a comparator whose left side is a function call and whose
//! right side is a literal.
//!
//! ## Core Concepts
//!
//! ### No precedence table
//!
//! The grammar carries no operator precedence. A node's shape is whatever the
//! first successful split of the source text produced, so `a == b && c`
//! becomes a comparator whose right side is `b && c`.
//!
//! ### Identifiers
//!
//! Unquoted identifiers (`Foo_1`) and quoted identifiers (`"foo bar"`) both
//! become [`Expression::Identifier`]; quoting is not preserved.
//!
//! ### Literals
//!
//! Backtick literals hold a full JSON document as a [`serde_json::Value`].
//! Raw strings (`'text'`) hold plain text and are a separate node.
pub mod brackets;
pub mod expressions;
pub mod functions;
pub mod multi_select;
pub mod operators;

pub use brackets::{BracketContents, BracketSpecifier, SliceExpression};
pub use expressions::{
    AndExpression, ComparatorExpression, Expression, IndexExpression, Literal, NotExpression,
    OrExpression, ParenExpression, PipeExpression, SubExpression, SubExpressionRight,
};
pub use functions::{FunctionArg, FunctionExpression};
pub use multi_select::{KeyValueExpression, MultiSelectHash, MultiSelectList};
pub use operators::Comparator;
