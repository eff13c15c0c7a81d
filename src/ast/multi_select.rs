use crate::ast::Expression;

/// `[a, b, c]`
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSelectList {
    pub expressions: Vec<Expression>,
}

impl MultiSelectList {
    pub fn new(expressions: Vec<Expression>) -> Self {
        MultiSelectList { expressions }
    }
}

/// `{a: b, c: d}`
///
/// Entries keep their source order. Duplicate keys are kept as written.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSelectHash {
    pub entries: Vec<KeyValueExpression>,
}

impl MultiSelectHash {
    pub fn new(entries: Vec<KeyValueExpression>) -> Self {
        MultiSelectHash { entries }
    }
}

/// `key: value`
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueExpression {
    pub key: String,
    pub value: Expression,
}

impl KeyValueExpression {
    pub fn new(key: impl Into<String>, value: Expression) -> Self {
        KeyValueExpression {
            key: key.into(),
            value,
        }
    }
}
