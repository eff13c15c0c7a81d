use crate::ast::{
    BracketSpecifier, Comparator, FunctionExpression, MultiSelectHash, MultiSelectList,
};

/// A parsed path expression.
///
/// Every node owns its children; a tree is built once by the parser and is
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `foo.bar`, `foo.[a, b]`, `foo.*`
    SubExpression(SubExpression),

    /// `foo[0]`, `foo[]`, `[?a]`, `[1:2]`
    IndexExpression(IndexExpression),

    /// `a == b`
    ComparatorExpression(ComparatorExpression),

    /// `a || b`
    OrExpression(OrExpression),

    /// Unquoted `foo` or quoted `"foo bar"` field name
    Identifier(String),

    /// `a && b`
    AndExpression(AndExpression),

    /// `!a`
    NotExpression(NotExpression),

    /// `(a)`
    ParenExpression(ParenExpression),

    /// Bare `*`
    StarExpression,

    /// `[a, b]`
    MultiSelectList(MultiSelectList),

    /// `{a: b, c: d}`
    MultiSelectHash(MultiSelectHash),

    /// `` `{"json": true}` ``
    Literal(Literal),

    /// `length(foo)`
    FunctionExpression(FunctionExpression),

    /// `a | b`
    PipeExpression(PipeExpression),

    /// `'raw text'`
    RawString(String),

    /// `@`
    CurrentNode,
}

/// `left.right`
#[derive(Debug, Clone, PartialEq)]
pub struct SubExpression {
    pub left: Box<Expression>,
    pub right: SubExpressionRight,
}

impl SubExpression {
    pub fn new(left: Expression, right: SubExpressionRight) -> Self {
        SubExpression {
            left: Box::new(left),
            right,
        }
    }
}

/// What may follow the `.` of a sub-expression.
#[derive(Debug, Clone, PartialEq)]
pub enum SubExpressionRight {
    Identifier(String),
    MultiSelectList(MultiSelectList),
    MultiSelectHash(MultiSelectHash),
    FunctionExpression(FunctionExpression),
    StarExpression,
}

/// An optional left-hand expression followed by a bracket specifier.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub left: Option<Box<Expression>>,
    pub bracket: BracketSpecifier,
}

impl IndexExpression {
    pub fn new(left: Option<Expression>, bracket: BracketSpecifier) -> Self {
        IndexExpression {
            left: left.map(Box::new),
            bracket,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparatorExpression {
    pub left: Box<Expression>,
    pub comparator: Comparator,
    pub right: Box<Expression>,
}

impl ComparatorExpression {
    pub fn new(left: Expression, comparator: Comparator, right: Expression) -> Self {
        ComparatorExpression {
            left: Box::new(left),
            comparator,
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrExpression {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

impl OrExpression {
    pub fn new(left: Expression, right: Expression) -> Self {
        OrExpression {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AndExpression {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

impl AndExpression {
    pub fn new(left: Expression, right: Expression) -> Self {
        AndExpression {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipeExpression {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

impl PipeExpression {
    pub fn new(left: Expression, right: Expression) -> Self {
        PipeExpression {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotExpression {
    pub expression: Box<Expression>,
}

impl NotExpression {
    pub fn new(expression: Expression) -> Self {
        NotExpression {
            expression: Box::new(expression),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpression {
    pub expression: Box<Expression>,
}

impl ParenExpression {
    pub fn new(expression: Expression) -> Self {
        ParenExpression {
            expression: Box::new(expression),
        }
    }
}

/// A JSON document embedded between backticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: serde_json::Value,
}

impl Literal {
    pub fn new(value: serde_json::Value) -> Self {
        Literal { value }
    }
}
