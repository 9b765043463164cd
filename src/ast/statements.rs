use super::{
    common::{Ident, Span, TypeName},
    expressions::Expression,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Statement {
    Let(LetStmt),
    Return(ReturnStmt),
    Block(BlockStmt),
    /// A bare expression followed by `;`, e.g. `foo();`.
    Expr(Expression, Span),
}

impl Statement {
    pub fn get_span(&self) -> Span {
        match self {
            Statement::Let(info) => info.span,
            Statement::Return(info) => info.span,
            Statement::Block(info) => info.span,
            Statement::Expr(_, span) => *span,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LetStmt {
    pub name: Ident,
    pub r#type: TypeName,
    pub value: Expression,
    pub span: Span,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReturnStmt {
    pub value: Expression,
    pub span: Span,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockStmt {
    pub statements: Vec<Statement>,
    pub span: Span,
}
