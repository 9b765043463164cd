use std::path::Path;

use cerberus::check::{OwnershipError, check_function};
use cerberus::ir::{
    ProgramBody,
    lowering::{LoweringError, lower_program},
};
use cerberus::parser::ProgramSource;

#[derive(Debug)]
pub enum CheckFailure {
    Lowering(LoweringError),
    Ownership(OwnershipError),
}

fn parse(source: &str, path: &str) -> cerberus::ast::Program {
    let source = ProgramSource::new(source.to_string(), Path::new(path));
    tracing::debug!("source code:\n{}", &source.input);

    match cerberus::parser::parse_ast(&source) {
        Ok(x) => x,
        Err(_) => {
            panic!("error parsing ast");
        }
    }
}

/// Lowers and verifies every function of the program, stopping at the first failure.
pub fn lower_and_check(source: &str, path: &str) -> Result<ProgramBody, CheckFailure> {
    let program = parse(source, path);
    let ir = lower_program(&program).map_err(CheckFailure::Lowering)?;

    for body in &ir.functions {
        check_function(body).map_err(CheckFailure::Ownership)?;
    }

    Ok(ir)
}

#[allow(unused)]
pub fn check_invalid_program(source: &str, path: &str) -> CheckFailure {
    lower_and_check(source, path).expect_err("expected error")
}
