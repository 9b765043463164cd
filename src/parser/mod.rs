use std::path::{Path, PathBuf};

use crate::ast::Program;
use error::Error;
use lexer::Lexer;

pub mod error;
pub mod lexer;
pub mod tokens;

pub mod grammar {
    #![allow(dead_code, unused_imports, unused_variables, clippy::all)]

    pub use self::grammar::*;
    use lalrpop_util::lalrpop_mod;

    lalrpop_mod!(pub grammar);
}

/// The source text of a program along with where it was read from.
#[derive(Debug, Clone)]
pub struct ProgramSource {
    pub input: String,
    pub path: PathBuf,
}

impl ProgramSource {
    pub fn new(input: String, path: &Path) -> Self {
        Self {
            input,
            path: path.to_path_buf(),
        }
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(path = %source.path.display()))]
pub fn parse_ast(source: &ProgramSource) -> Result<Program, Error> {
    let lexer = Lexer::new(&source.input);
    let parser = grammar::ProgramParser::new();

    let program = parser.parse(&source.path, lexer)?;
    tracing::debug!("parsed {} functions", program.functions.len());
    Ok(program)
}
