//! # Path Expression Parser
//!
//! A recursive-descent parser that works on character ranges instead of a
//! token stream. Where the grammar is ambiguous the parser tries every
//! candidate split point of the range, left to right, and keeps the first one
//! where both sides parse.
//!
//! ## Submodules
//!
//! - **[combinators]** - alternation, sequencing, split search and the
//!   comma-separated multi-select parser
//! - **[error]** - [`ParseError`] and the per-branch failure tree
//! - `grammar` - one method per grammar rule
//!
//! ## Example
//!
//! ```
//! use jmespath_waiters::ast::{Expression, SubExpression, SubExpressionRight};
//! use jmespath_waiters::parser::parse;
//!
//! let expression = parse("foo.bar").unwrap();
//! assert_eq!(
//!     expression,
//!     Expression::SubExpression(SubExpression::new(
//!         Expression::Identifier("foo".to_string()),
//!         SubExpressionRight::Identifier("bar".to_string()),
//!     ))
//! );
//! ```
//!
//! ## Cost
//!
//! Backtracking is proportional to the number of candidate delimiter
//! positions times the cost of re-parsing each side. Inputs with many
//! repeated delimiters inside deeply nested ambiguous constructs can be slow;
//! nesting depth is capped by [`ParserOptions::max_depth`].

pub mod combinators;
pub mod error;
mod grammar;

use log::debug;

use crate::ast::Expression;
use crate::scanner::Scanner;
use grammar::Grammar;

pub use error::{ParseError, ParseResult};

/// Limits applied while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Deepest allowed nesting of expressions before a branch is abandoned
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions { max_depth: 256 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Parser { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses a complete path expression.
    ///
    /// The whole input must match; there is no partial result. On failure the
    /// returned error's [`ParseError::diagnostic`] lists every alternative
    /// that was tried.
    pub fn parse(&self, input: &str) -> ParseResult<Expression> {
        let scanner = Scanner::new(input);
        debug!("parsing expression of {} characters", scanner.len());

        if scanner.is_empty() {
            return Err(ParseError::new("expression", "Empty expression", 0));
        }

        let result = Grammar::new(&scanner, &self.options).expression(0, scanner.len());
        match &result {
            Ok(_) => debug!("parsed expression {input:?}"),
            Err(e) => debug!("failed to parse {input:?}: {e}"),
        }
        result
    }

    /// Parses `input` as a lone identifier, quoted or unquoted.
    pub fn parse_identifier(&self, input: &str) -> ParseResult<String> {
        let scanner = Scanner::new(input);
        if scanner.is_empty() {
            return Err(ParseError::new("identifier", "Empty identifier", 0));
        }
        Grammar::new(&scanner, &self.options).identifier(0, scanner.len())
    }
}

/// Parses `input` with default options.
pub fn parse(input: &str) -> ParseResult<Expression> {
    Parser::new().parse(input)
}
