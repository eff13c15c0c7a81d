use crate::ast::Expression;

/// The bracketed suffix of an index expression.
#[derive(Debug, Clone, PartialEq)]
pub enum BracketSpecifier {
    /// `[]` - flatten
    WithoutContents,

    /// `[0]`, `[*]`, `[1:2]`
    WithContents(BracketContents),

    /// `[?expression]` - filter predicate
    WithQuestionMark(Box<Expression>),
}

impl BracketSpecifier {
    pub fn filter(predicate: Expression) -> Self {
        BracketSpecifier::WithQuestionMark(Box::new(predicate))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketContents {
    Number(i64),
    StarExpression,
    SliceExpression(SliceExpression),
}

/// `[start:stop:step]`
///
/// Each component is independently optional; `None` means the component was
/// omitted, which is not the same as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceExpression {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

impl SliceExpression {
    pub fn new(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Self {
        SliceExpression { start, stop, step }
    }
}
