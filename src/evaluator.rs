use std::cmp::Ordering;

use log::trace;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use thiserror::Error;

use crate::{
    ast::Comparator,
    ops::{Constant, Operation, Pipeline},
    value::Value,
};

/// Errors that can occur while evaluating a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A pipeline reads a variable that no enclosing scope binds
    #[error("Unbound variable: {0}")]
    UnboundVariable(String),

    /// Type mismatch or invalid operation for the given type
    #[error("Type error: {0}")]
    TypeError(String),
}

/// Variables visible to a pipeline, innermost first.
struct Bindings<'a> {
    name: &'a str,
    value: &'a Value,
    parent: Option<&'a Bindings<'a>>,
}

impl<'a> Bindings<'a> {
    fn bind(&'a self, name: &'a str, value: &'a Value) -> Bindings<'a> {
        Bindings {
            name,
            value,
            parent: Some(self),
        }
    }

    fn lookup(&self, name: &str) -> Option<&'a Value> {
        if self.name == name {
            Some(self.value)
        } else {
            self.parent.and_then(|parent| parent.lookup(name))
        }
    }
}

/// The value flowing through a pipeline.
///
/// `projecting` is set once a flatten, wildcard or filter has turned the value
/// into a list whose elements the following member and index operations
/// should be applied to individually.
#[derive(Debug, Clone, PartialEq)]
struct Current {
    value: Value,
    projecting: bool,
}

impl Current {
    fn plain(value: Value) -> Self {
        Current {
            value,
            projecting: false,
        }
    }

    fn projection(values: Vec<Value>) -> Self {
        Current {
            value: Value::Array(values),
            projecting: true,
        }
    }
}

/// Executes pipelines against documents.
///
/// # Examples
///
/// ```
/// use jmespath_waiters::{Evaluator, Value, compile};
///
/// let pipeline = compile("length(Items[?Ready]) > `1`", "input").unwrap();
/// let document = Value::from(serde_json::json!({
///     "Items": [{"Ready": true}, {"Ready": false}, {"Ready": true}]
/// }));
///
/// let result = Evaluator::new().evaluate(&pipeline, &document).unwrap();
/// assert_eq!(result, Value::Boolean(true));
/// ```
#[derive(Debug, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Evaluator
    }

    /// Evaluates `pipeline` with its variable bound to `document`.
    pub fn evaluate(&self, pipeline: &Pipeline, document: &Value) -> Result<Value, EvalError> {
        let root = Bindings {
            name: &pipeline.variable,
            value: document,
            parent: None,
        };
        self.run(pipeline, &root)
    }

    fn run(&self, pipeline: &Pipeline, bindings: &Bindings<'_>) -> Result<Value, EvalError> {
        let start = bindings
            .lookup(&pipeline.variable)
            .ok_or_else(|| EvalError::UnboundVariable(pipeline.variable.clone()))?;

        let mut current = Current::plain(start.clone());
        for operation in &pipeline.operations {
            current = self.apply(operation, current, bindings)?;
        }
        Ok(current.value)
    }

    fn apply(&self, operation: &Operation, current: Current, bindings: &Bindings<'_>) -> Result<Current, EvalError> {
        trace!(
            "apply {} to {}{}",
            operation_name(operation),
            current.value.type_name(),
            if current.projecting { " projection" } else { "" }
        );

        match operation {
            Operation::Field(_)
            | Operation::Index(_)
            | Operation::Wildcard
            | Operation::Filter(_)
            | Operation::MultiSelectList(_)
                if current.projecting =>
            {
                self.project(operation, current.value, bindings)
            }

            Operation::Field(name) => Ok(Current::plain(match current.value {
                Value::Object(mut obj) => obj.swap_remove(name).unwrap_or(Value::Null),
                _ => Value::Null,
            })),

            Operation::Index(n) => Ok(Current::plain(match current.value {
                Value::Array(mut arr) => resolve_index(arr.len(), *n)
                    .map(|i| arr.swap_remove(i))
                    .unwrap_or(Value::Null),
                _ => Value::Null,
            })),

            Operation::Flatten => Ok(match current.value {
                Value::Array(arr) => Current::projection(flatten(arr)),
                _ => Current::plain(Value::Null),
            }),

            Operation::Wildcard => Ok(match current.value {
                Value::Object(obj) => Current::projection(obj.into_values().collect()),
                Value::Array(arr) => Current::projection(arr),
                _ => Current::plain(Value::Null),
            }),

            Operation::Filter(predicate) => match current.value {
                Value::Array(arr) => {
                    let mut kept = Vec::with_capacity(arr.len());
                    for element in arr {
                        let scope = bindings.bind(&predicate.variable, &element);
                        if self.run(predicate, &scope)?.is_truthy() {
                            kept.push(element);
                        }
                    }
                    Ok(Current::projection(kept))
                }
                _ => Ok(Current::plain(Value::Null)),
            },

            Operation::Compare(comparator, right) => {
                let right = self.run(right, bindings)?;
                Ok(Current::plain(compare(*comparator, &current.value, &right)))
            }

            Operation::Or(right) => Ok(Current::plain(if current.value.is_truthy() {
                current.value
            } else {
                self.run(right, bindings)?
            })),

            Operation::And(right) => Ok(Current::plain(if current.value.is_truthy() {
                self.run(right, bindings)?
            } else {
                current.value
            })),

            Operation::Not => Ok(Current::plain(Value::Boolean(!current.value.is_truthy()))),

            Operation::Constant(Constant::Value(value)) => Ok(Current::plain(value.clone())),
            Operation::Constant(Constant::Pipeline(pipeline)) => Ok(Current::plain(self.run(pipeline, bindings)?)),

            Operation::Length => self.length(&current.value).map(Current::plain),

            Operation::Contains(needle) => {
                let needle = self.run(needle, bindings)?;
                self.contains(&current.value, &needle).map(Current::plain)
            }

            Operation::MultiSelectList(branches) => {
                if current.value.is_null() {
                    return Ok(Current::plain(Value::Null));
                }
                let results = branches
                    .iter()
                    .map(|branch| self.run(branch, &bindings.bind(&branch.variable, &current.value)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Current::plain(Value::Array(results)))
            }
        }
    }

    /// Applies `operation` to each element of a projection, dropping nulls.
    fn project(&self, operation: &Operation, value: Value, bindings: &Bindings<'_>) -> Result<Current, EvalError> {
        let Value::Array(elements) = value else {
            return Ok(Current::plain(Value::Null));
        };

        let mut results = Vec::with_capacity(elements.len());
        for element in elements {
            let projected = self.apply(operation, Current::plain(element), bindings)?;
            if !projected.value.is_null() {
                results.push(projected.value);
            }
        }
        Ok(Current::projection(results))
    }

    /// length() - element count of an array or object, code points of a string
    fn length(&self, value: &Value) -> Result<Value, EvalError> {
        let len = match value {
            Value::Array(arr) => arr.len(),
            Value::Object(obj) => obj.len(),
            Value::String(s) => s.chars().count(),
            _ => {
                return Err(EvalError::TypeError(format!(
                    "length() requires array, object or string, got {}",
                    value.type_name()
                )));
            }
        };
        Ok(Value::Integer(len as i64))
    }

    /// contains(subject, needle) - array membership or substring search
    fn contains(&self, subject: &Value, needle: &Value) -> Result<Value, EvalError> {
        match (subject, needle) {
            (Value::Array(arr), _) => Ok(Value::Boolean(arr.iter().any(|element| values_equal(element, needle)))),
            (Value::String(s), Value::String(sub)) => Ok(Value::Boolean(s.contains(sub.as_str()))),
            (Value::String(_), _) => Err(EvalError::TypeError(format!(
                "contains() on a string requires a string argument, got {}",
                needle.type_name()
            ))),
            _ => Err(EvalError::TypeError(format!(
                "contains() requires array or string, got {}",
                subject.type_name()
            ))),
        }
    }
}

/// Evaluates `pipeline` against `document` with a default evaluator.
pub fn evaluate(pipeline: &Pipeline, document: &Value) -> Result<Value, EvalError> {
    Evaluator::new().evaluate(pipeline, document)
}

fn operation_name(operation: &Operation) -> &'static str {
    match operation {
        Operation::Field(_) => "field",
        Operation::Index(_) => "index",
        Operation::Flatten => "flatten",
        Operation::Wildcard => "wildcard",
        Operation::Filter(_) => "filter",
        Operation::Compare(..) => "compare",
        Operation::Or(_) => "or",
        Operation::And(_) => "and",
        Operation::Not => "not",
        Operation::Constant(_) => "constant",
        Operation::Length => "length",
        Operation::Contains(_) => "contains",
        Operation::MultiSelectList(_) => "multiSelectList",
    }
}

fn resolve_index(len: usize, index: i64) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { len + index } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

fn flatten(arr: Vec<Value>) -> Vec<Value> {
    let mut result = Vec::with_capacity(arr.len());
    for item in arr {
        match item {
            Value::Array(inner) => result.extend(inner),
            other => result.push(other),
        }
    }
    result
}

fn compare(comparator: Comparator, left: &Value, right: &Value) -> Value {
    match comparator {
        Comparator::Equal => Value::Boolean(values_equal(left, right)),
        Comparator::NotEqual => Value::Boolean(!values_equal(left, right)),
        _ => match numeric_cmp(left, right) {
            Some(ordering) => Value::Boolean(match comparator {
                Comparator::LessThan => ordering == Ordering::Less,
                Comparator::LessThanOrEqual => ordering != Ordering::Greater,
                Comparator::GreaterThan => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }),
            None => Value::Null,
        },
    }
}

/// Deep equality where an integer and a float are equal when they denote the
/// same number.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            numeric_cmp(a, b) == Some(Ordering::Equal)
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len() && a.iter().all(|(k, v)| b.get(k).is_some_and(|other| values_equal(v, other)))
        }
        _ => a == b,
    }
}

fn numeric_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Integer(a), Value::Float(b)) => mixed_cmp(*a, *b),
        (Value::Float(a), Value::Integer(b)) => mixed_cmp(*b, *a).map(Ordering::reverse),
        _ => None,
    }
}

/// Exact comparison of an integer with a float where both fit a decimal.
fn mixed_cmp(integer: i64, float: f64) -> Option<Ordering> {
    if let Some(id) = Decimal::from_i64(integer)
        && let Some(fd) = Decimal::from_f64(float)
    {
        return Some(id.cmp(&fd));
    }
    (integer as f64).partial_cmp(&float)
}

#[test]
fn test_resolve_index() {
    assert_eq!(resolve_index(3, 0), Some(0));
    assert_eq!(resolve_index(3, -1), Some(2));
    assert_eq!(resolve_index(3, 3), None);
    assert_eq!(resolve_index(3, -4), None);
    assert_eq!(resolve_index(0, 0), None);
}

#[test]
fn test_mixed_numeric_equality() {
    assert!(values_equal(&Value::Integer(2), &Value::Float(2.0)));
    assert!(!values_equal(&Value::Integer(2), &Value::Float(2.5)));
    assert!(!values_equal(&Value::Integer(1), &Value::Boolean(true)));
    assert_eq!(numeric_cmp(&Value::Float(2.5), &Value::Integer(3)), Some(Ordering::Less));
    assert_eq!(numeric_cmp(&Value::from("a"), &Value::Integer(3)), None);
}

#[test]
fn test_ordering_requires_numbers() {
    assert_eq!(
        compare(Comparator::LessThan, &Value::from("a"), &Value::from("b")),
        Value::Null
    );
    assert_eq!(
        compare(Comparator::GreaterThanOrEqual, &Value::Integer(3), &Value::Float(3.0)),
        Value::Boolean(true)
    );
}
