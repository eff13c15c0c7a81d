//! Compiles a parsed [`Expression`] into a [`Pipeline`].
//!
//! The interpreter covers the subset of the language that waiter acceptors
//! use. Everything else parses but is rejected here with
//! [`InterpretError::UnsupportedConstruct`].

use log::{debug, trace};
use thiserror::Error;

use crate::ast::{
    BracketContents, BracketSpecifier, Expression, FunctionExpression, SubExpressionRight,
};
use crate::ops::{Constant, Operation, Pipeline};
use crate::parser::{ParseError, Parser};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretError {
    #[error("Unsupported construct: {0}")]
    UnsupportedConstruct(&'static str),

    #[error("Unsupported function: {0}")]
    UnsupportedFunction(String),

    #[error("Invalid arguments to {function}: {message}")]
    InvalidArguments { function: String, message: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Options for naming scoped variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterOptions {
    /// Scoped variables are named `<prefix>0`, `<prefix>1`, ... in creation order
    pub variable_prefix: String,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        InterpreterOptions {
            variable_prefix: "x".to_string(),
        }
    }
}

/// The variables in scope, innermost first.
///
/// Each nested predicate or branch gets a child scope that lives on the
/// stack of the call translating it, so a scope can never outlive the
/// translation that introduced it.
#[derive(Debug)]
struct Scope<'p> {
    variable: String,
    parent: Option<&'p Scope<'p>>,
}

impl<'p> Scope<'p> {
    fn root(variable: &str) -> Self {
        Scope {
            variable: variable.to_string(),
            parent: None,
        }
    }

    fn push(&'p self, variable: String) -> Scope<'p> {
        Scope {
            variable,
            parent: Some(self),
        }
    }

    fn depth(&self) -> usize {
        self.parent.map_or(0, |parent| parent.depth() + 1)
    }
}

#[derive(Debug, Default)]
pub struct Interpreter {
    options: InterpreterOptions,
    next_variable: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: InterpreterOptions) -> Self {
        Interpreter {
            options,
            next_variable: 0,
        }
    }

    /// Translates `expression` into operations on `input_variable`.
    ///
    /// Variable numbering continues across calls on the same interpreter.
    pub fn interpret(&mut self, expression: &Expression, input_variable: &str) -> Result<Pipeline, InterpretError> {
        let root = Scope::root(input_variable);
        let pipeline = self.pipeline(expression, &root)?;
        debug!(
            "interpreted expression against {input_variable} into {} operations",
            pipeline.operations.len()
        );
        Ok(pipeline)
    }

    fn fresh_variable(&mut self) -> String {
        let variable = format!("{}{}", self.options.variable_prefix, self.next_variable);
        self.next_variable += 1;
        variable
    }

    /// A pipeline reading the scope's current variable.
    fn pipeline(&mut self, expression: &Expression, scope: &Scope<'_>) -> Result<Pipeline, InterpretError> {
        let mut operations = Vec::new();
        self.visit(expression, scope, &mut operations)?;
        Ok(Pipeline::new(scope.variable.as_str(), operations))
    }

    /// A pipeline reading a freshly bound variable.
    fn scoped_pipeline(&mut self, expression: &Expression, scope: &Scope<'_>) -> Result<Pipeline, InterpretError> {
        let inner = scope.push(self.fresh_variable());
        trace!("enter scope {} at depth {}", inner.variable, inner.depth());
        let pipeline = self.pipeline(expression, &inner);
        trace!("leave scope {}", inner.variable);
        pipeline
    }

    fn visit(
        &mut self,
        expression: &Expression,
        scope: &Scope<'_>,
        operations: &mut Vec<Operation>,
    ) -> Result<(), InterpretError> {
        match expression {
            Expression::SubExpression(sub) => {
                self.visit(&sub.left, scope, operations)?;
                match &sub.right {
                    SubExpressionRight::Identifier(name) => operations.push(Operation::Field(name.clone())),
                    SubExpressionRight::MultiSelectList(list) => {
                        self.multi_select_list(&list.expressions, scope, operations)?
                    }
                    SubExpressionRight::MultiSelectHash(_) => {
                        return Err(InterpretError::UnsupportedConstruct("multi-select-hash"));
                    }
                    SubExpressionRight::FunctionExpression(function) => self.function(function, scope, operations)?,
                    SubExpressionRight::StarExpression => operations.push(Operation::Wildcard),
                }
            }

            Expression::IndexExpression(index) => {
                if let Some(left) = &index.left {
                    self.visit(left, scope, operations)?;
                }
                match &index.bracket {
                    BracketSpecifier::WithoutContents => operations.push(Operation::Flatten),
                    BracketSpecifier::WithContents(BracketContents::Number(n)) => {
                        operations.push(Operation::Index(*n))
                    }
                    BracketSpecifier::WithContents(BracketContents::StarExpression) => {
                        operations.push(Operation::Wildcard)
                    }
                    BracketSpecifier::WithContents(BracketContents::SliceExpression(_)) => {
                        return Err(InterpretError::UnsupportedConstruct("slice-expression"));
                    }
                    BracketSpecifier::WithQuestionMark(predicate) => {
                        let predicate = self.scoped_pipeline(predicate, scope)?;
                        operations.push(Operation::Filter(predicate));
                    }
                }
            }

            Expression::ComparatorExpression(comparison) => {
                self.visit(&comparison.left, scope, operations)?;
                let right = self.pipeline(&comparison.right, scope)?;
                operations.push(Operation::Compare(comparison.comparator, right));
            }

            Expression::OrExpression(or) => {
                self.visit(&or.left, scope, operations)?;
                let right = self.pipeline(&or.right, scope)?;
                operations.push(Operation::Or(right));
            }

            Expression::AndExpression(and) => {
                self.visit(&and.left, scope, operations)?;
                let right = self.pipeline(&and.right, scope)?;
                operations.push(Operation::And(right));
            }

            Expression::NotExpression(not) => {
                let mut negated = self.pipeline(&not.expression, scope)?;
                negated.operations.push(Operation::Not);
                operations.push(Operation::Constant(Constant::Pipeline(negated)));
            }

            Expression::ParenExpression(paren) => self.visit(&paren.expression, scope, operations)?,

            Expression::Identifier(name) => operations.push(Operation::Field(name.clone())),

            Expression::StarExpression => operations.push(Operation::Wildcard),

            Expression::MultiSelectList(list) => self.multi_select_list(&list.expressions, scope, operations)?,

            Expression::Literal(literal) => {
                operations.push(Operation::Constant(Constant::Value(Value::from(literal.value.clone()))))
            }

            Expression::RawString(text) => {
                operations.push(Operation::Constant(Constant::Value(Value::String(text.clone()))))
            }

            Expression::FunctionExpression(function) => self.function(function, scope, operations)?,

            Expression::MultiSelectHash(_) => return Err(InterpretError::UnsupportedConstruct("multi-select-hash")),
            Expression::PipeExpression(_) => return Err(InterpretError::UnsupportedConstruct("pipe-expression")),
            Expression::CurrentNode => return Err(InterpretError::UnsupportedConstruct("current-node")),
        }
        Ok(())
    }

    fn multi_select_list(
        &mut self,
        expressions: &[Expression],
        scope: &Scope<'_>,
        operations: &mut Vec<Operation>,
    ) -> Result<(), InterpretError> {
        let branches = expressions
            .iter()
            .map(|expression| self.scoped_pipeline(expression, scope))
            .collect::<Result<Vec<_>, _>>()?;
        operations.push(Operation::MultiSelectList(branches));
        Ok(())
    }

    fn function(
        &mut self,
        function: &FunctionExpression,
        scope: &Scope<'_>,
        operations: &mut Vec<Operation>,
    ) -> Result<(), InterpretError> {
        match function.name.as_str() {
            "length" => {
                let [subject] = expression_args::<1>(function)?;
                self.visit(subject, scope, operations)?;
                operations.push(Operation::Length);
            }
            "contains" => {
                let [subject, needle] = expression_args::<2>(function)?;
                self.visit(subject, scope, operations)?;
                let needle = self.pipeline(needle, scope)?;
                operations.push(Operation::Contains(needle));
            }
            other => return Err(InterpretError::UnsupportedFunction(other.to_string())),
        }
        Ok(())
    }
}

/// Exactly `N` arguments, none of them `&expression`.
fn expression_args<const N: usize>(function: &FunctionExpression) -> Result<[&Expression; N], InterpretError> {
    let invalid = |message: String| InterpretError::InvalidArguments {
        function: function.name.clone(),
        message,
    };

    if function.args.len() != N {
        return Err(invalid(format!(
            "expected {N} argument{}, got {}",
            if N == 1 { "" } else { "s" },
            function.args.len()
        )));
    }

    let args = function
        .args
        .iter()
        .enumerate()
        .map(|(position, arg)| {
            arg.as_expression()
                .ok_or_else(|| invalid(format!("argument {} must be an expression", position + 1)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    args.try_into()
        .map_err(|_| invalid(format!("expected {N} arguments")))
}

/// Parses `expression` and translates it against `input_variable`.
///
/// # Examples
///
/// ```
/// use jmespath_waiters::interpreter::interpret;
///
/// let pipeline = interpret("foo[].bar", "input").unwrap();
/// assert_eq!(pipeline.to_string(), r#"input.field("foo").flatten().field("bar")"#);
/// ```
pub fn interpret(expression: &str, input_variable: &str) -> Result<Pipeline, InterpretError> {
    let expression = Parser::new().parse(expression)?;
    Interpreter::new().interpret(&expression, input_variable)
}
