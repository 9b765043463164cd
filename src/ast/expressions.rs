use std::fmt;

use super::common::{Ident, Span};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expression {
    Value(ValueExpr, Span),
    FnCall(FnCallOp),
    /// An expression tagged with `ow` or `mv`.
    Owned(OwnedExpr),
}

impl Expression {
    pub fn get_span(&self) -> Span {
        match self {
            Expression::Value(_, span) => *span,
            Expression::FnCall(call) => call.span,
            Expression::Owned(owned) => owned.span,
        }
    }

    /// A short description of the expression shape, used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Expression::Value(ValueExpr::ConstInt(..), _) => "a literal",
            Expression::Value(ValueExpr::Var(_), _) => "a variable",
            Expression::FnCall(_) => "a function call",
            Expression::Owned(owned) => match owned.op {
                Ownership::Ow => "an 'ow' expression",
                Ownership::Mv => "an 'mv' expression",
            },
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValueExpr {
    ConstInt(u128, Span),
    Var(Ident),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FnCallOp {
    pub target: Ident,
    pub args: Vec<Expression>,
    pub span: Span,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Ownership {
    /// Own a fresh literal value.
    Ow,
    /// Move an existing binding, invalidating it.
    Mv,
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ownership::Ow => f.write_str("ow"),
            Ownership::Mv => f.write_str("mv"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnedExpr {
    pub op: Ownership,
    pub value: Box<Expression>,
    pub span: Span,
}
