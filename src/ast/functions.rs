use crate::ast::Expression;

/// Function call.
///
/// # Examples
/// ```text
/// length(foo)
/// contains(foo[].bar, `true`)
/// sort_by(people, &age)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression {
    pub name: String,
    pub args: Vec<FunctionArg>,
}

impl FunctionExpression {
    pub fn new(name: impl Into<String>, args: Vec<FunctionArg>) -> Self {
        FunctionExpression {
            name: name.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionArg {
    /// Evaluated before the call
    Expression(Expression),

    /// `&expression` - passed unevaluated
    ExpressionType(Expression),
}

impl FunctionArg {
    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            FunctionArg::Expression(expression) => Some(expression),
            FunctionArg::ExpressionType(_) => None,
        }
    }
}
