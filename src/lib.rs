//! Parser and interpreter for the JMESPath subset used by waiter acceptors.
//!
//! An expression is parsed into an [`Expression`] tree, compiled into a
//! [`Pipeline`] of value operations, and either rendered as a method-call
//! chain for a code generator or evaluated directly against a [`Value`].
//!
//! ```
//! use jmespath_waiters::{Value, compile, search};
//!
//! let pipeline = compile("length(foo[].bar) > `0`", "input").unwrap();
//! assert_eq!(
//!     pipeline.to_string(),
//!     r#"input.field("foo").flatten().field("bar").length().compare(">", input.constant(0))"#
//! );
//!
//! let document = Value::from(serde_json::json!({"foo": [{"bar": 1}, {"baz": 2}]}));
//! assert_eq!(search("length(foo[].bar) > `0`", &document).unwrap(), Value::Boolean(true));
//! ```
pub mod ast;
pub mod evaluator;
pub mod interpreter;
pub mod ops;
pub mod output;
pub mod parser;
pub mod scanner;
pub mod value;

use thiserror::Error;

pub use ast::{Comparator, Expression};
pub use evaluator::{EvalError, Evaluator};
pub use interpreter::{InterpretError, Interpreter, InterpreterOptions};
pub use ops::{Constant, Operation, Pipeline};
pub use output::to_json;
pub use parser::{ParseError, Parser, ParserOptions, parse};
pub use value::Value;

/// Any failure from parsing, compiling or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Interpret(#[from] InterpretError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Parses `expression` and compiles it against `variable`.
pub fn compile(expression: &str, variable: &str) -> Result<Pipeline, Error> {
    let expression = parse(expression)?;
    Ok(Interpreter::new().interpret(&expression, variable)?)
}

/// Compiles `expression` against `input` and evaluates it on `document`.
pub fn search(expression: &str, document: &Value) -> Result<Value, Error> {
    let pipeline = compile(expression, "input")?;
    Ok(Evaluator::new().evaluate(&pipeline, document)?)
}
