use std::path::PathBuf;

use functions::FunctionDef;

pub mod common;
pub mod expressions;
pub mod functions;
pub mod statements;

/// A parsed source file, made up of functions in declaration order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Program {
    pub file_path: PathBuf,
    pub functions: Vec<FunctionDef>,
}
