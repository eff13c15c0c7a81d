//! Textual rendering of values and pipelines.
//!
//! A [`Pipeline`] renders as a method-call chain rooted at its variable,
//! with nested pipelines written as single-argument lambdas:
//!
//! ```text
//! input.field("Instances").filter(x0 -> x0.field("State").compare("==", x0.constant("running"))).length()
//! ```
//!
//! Constant values render as compact JSON. Object keys keep their insertion
//! order and strings are escaped so the output can be embedded in generated
//! source code.
//!
//! # Examples
//!
//! ```
//! use jmespath_waiters::Value;
//! use jmespath_waiters::output::to_json;
//!
//! assert_eq!(to_json(&Value::from("say \"hi\"")), r#""say \"hi\"""#);
//! assert_eq!(to_json(&Value::Float(1.0)), "1.0");
//! ```

use std::fmt;

use indexmap::IndexMap;

use crate::ops::{Constant, Operation, Pipeline};
use crate::value::Value;

pub struct JsonPrinter;

impl JsonPrinter {
    pub fn print(&self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            // `{:?}` keeps the fractional part of whole floats
            Value::Float(n) if n.is_finite() => format!("{n:?}"),
            Value::Float(_) => "null".to_string(),
            Value::String(s) => format!("\"{}\"", escape_string(s)),
            Value::Array(arr) => self.print_array(arr),
            Value::Object(obj) => self.print_object(obj),
        }
    }

    fn print_array(&self, arr: &[Value]) -> String {
        let items: Vec<String> = arr.iter().map(|v| self.print(v)).collect();
        format!("[{}]", items.join(","))
    }

    fn print_object(&self, obj: &IndexMap<String, Value>) -> String {
        let items: Vec<String> = obj
            .iter()
            .map(|(k, v)| format!("\"{}\":{}", escape_string(k), self.print(v)))
            .collect();
        format!("{{{}}}", items.join(","))
    }
}

pub fn escape_string(s: &str) -> String {
    s.chars()
        .flat_map(|c| match c {
            '"' => vec!['\\', '"'],
            '\\' => vec!['\\', '\\'],
            '\n' => vec!['\\', 'n'],
            '\r' => vec!['\\', 'r'],
            '\t' => vec!['\\', 't'],
            c if c.is_control() => format!("\\u{:04x}", c as u32).chars().collect(),
            c => vec![c],
        })
        .collect()
}

/// Converts a Value to a compact JSON string.
pub fn to_json(value: &Value) -> String {
    JsonPrinter.print(value)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_json(self))
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.variable)?;
        for operation in &self.operations {
            write!(f, ".{operation}")?;
        }
        Ok(())
    }
}

/// A nested pipeline that binds its own variable.
struct Lambda<'a>(&'a Pipeline);

impl fmt::Display for Lambda<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.0.variable, self.0)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Field(name) => write!(f, "field(\"{}\")", escape_string(name)),
            Operation::Index(n) => write!(f, "index({n})"),
            Operation::Flatten => f.write_str("flatten()"),
            Operation::Wildcard => f.write_str("wildcard()"),
            Operation::Filter(predicate) => write!(f, "filter({})", Lambda(predicate)),
            Operation::Compare(comparator, right) => {
                write!(f, "compare(\"{}\", {right})", comparator.symbol())
            }
            Operation::Or(right) => write!(f, "or({right})"),
            Operation::And(right) => write!(f, "and({right})"),
            Operation::Not => f.write_str("not()"),
            Operation::Constant(Constant::Value(value)) => write!(f, "constant({value})"),
            Operation::Constant(Constant::Pipeline(pipeline)) => write!(f, "constant({pipeline})"),
            Operation::Length => f.write_str("length()"),
            Operation::Contains(needle) => write!(f, "contains({needle})"),
            Operation::MultiSelectList(branches) => {
                f.write_str("multiSelectList(")?;
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", Lambda(branch))?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Comparator;

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
        assert_eq!(escape_string("\u{1}"), "\\u0001");
        assert_eq!(escape_string("héllo"), "héllo");
    }

    #[test]
    fn test_json_keeps_insertion_order() {
        let mut obj = IndexMap::new();
        obj.insert("b".to_string(), Value::Integer(1));
        obj.insert("a".to_string(), Value::Array(vec![Value::Null, Value::Boolean(true)]));
        assert_eq!(to_json(&Value::Object(obj)), r#"{"b":1,"a":[null,true]}"#);
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(to_json(&Value::Float(f64::INFINITY)), "null");
        assert_eq!(to_json(&Value::Float(2.5)), "2.5");
    }

    #[test]
    fn test_render_nested_pipelines() {
        let predicate = Pipeline::new(
            "x0",
            vec![
                Operation::Field("State".to_string()),
                Operation::Compare(
                    Comparator::NotEqual,
                    Pipeline::new("x0", vec![Operation::Constant(Constant::Value(Value::from("stopped")))]),
                ),
            ],
        );
        let pipeline = Pipeline::new(
            "input",
            vec![
                Operation::Field("Items".to_string()),
                Operation::Filter(predicate),
                Operation::Index(-1),
                Operation::Constant(Constant::Pipeline(Pipeline::new(
                    "input",
                    vec![Operation::Field("done".to_string()), Operation::Not],
                ))),
            ],
        );
        assert_eq!(
            pipeline.to_string(),
            r#"input.field("Items").filter(x0 -> x0.field("State").compare("!=", x0.constant("stopped"))).index(-1).constant(input.field("done").not())"#
        );
    }

    #[test]
    fn test_render_multi_select_list() {
        let pipeline = Pipeline::new(
            "input",
            vec![Operation::MultiSelectList(vec![
                Pipeline::new("x0", vec![Operation::Field("a".to_string())]),
                Pipeline::new("x1", vec![Operation::Wildcard, Operation::Length]),
            ])],
        );
        assert_eq!(
            pipeline.to_string(),
            r#"input.multiSelectList(x0 -> x0.field("a"), x1 -> x1.wildcard().length())"#
        );
    }
}
