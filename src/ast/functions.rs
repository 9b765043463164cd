use super::{
    common::{Ident, Span, TypeName},
    statements::BlockStmt,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionDef {
    pub name: Ident,
    pub params: Vec<Param>,
    pub ret_type: TypeName,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub r#type: TypeName,
}
