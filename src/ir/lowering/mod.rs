use tracing::{debug, trace, warn};

use crate::{
    ast::{
        Program,
        common::{Ident, TypeName},
        functions::FunctionDef,
    },
    ir::{FnBody, Instruction, InstructionKind, Local, ProgramBody, Span},
};

mod errors;
mod expressions;
mod functions;
mod scope;
mod statements;

pub use errors::{LoweringContext, LoweringError};
pub use functions::lower_function;
use scope::ScopeStack;

/// Lowers every function of the program, stopping at the first error.
pub fn lower_program(program: &Program) -> Result<ProgramBody, LoweringError> {
    let mut ir = ProgramBody::default();

    for func in &program.functions {
        ir.functions.push(lower_function(func)?);
    }

    debug!("lowered {} functions", ir.functions.len());
    Ok(ir)
}

/// State needed while lowering a single function.
#[derive(Debug)]
pub(crate) struct FnIrBuilder {
    pub body: FnBody,
    pub scopes: ScopeStack,
}

impl FnIrBuilder {
    pub fn new(func: &FunctionDef) -> Self {
        Self {
            body: FnBody {
                name: func.name.name.clone(),
                ret_ty: func.ret_type.name.clone(),
                locals: Vec::new(),
                instructions: Vec::new(),
                span: func.span,
            },
            scopes: ScopeStack::default(),
        }
    }

    pub fn fn_name(&self) -> String {
        self.body.name.clone()
    }

    pub fn ret_ty(&self) -> &str {
        &self.body.ret_ty
    }

    pub fn push(&mut self, kind: InstructionKind, span: Option<Span>) {
        trace!("emit `{}`", kind);
        self.body.instructions.push(Instruction::new(kind, span));
    }

    /// Registers a new binding in the function-wide locals (first occurrence only)
    /// and in the innermost open scope.
    ///
    /// Locals are keyed by name, so redeclaring a name reuses the same local. Inside a
    /// nested block that local is shared with the enclosing binding and gets dropped at
    /// the inner block's exit.
    pub fn declare_local(&mut self, name: &Ident, ty: &TypeName) -> Result<(), LoweringError> {
        match self.scopes.declared_depth(&name.name) {
            Some(depth) if depth + 1 < self.scopes.depth() => warn!(
                "{:?} in function {:?} redeclares a binding of an enclosing block, both share one local",
                name.name,
                self.body.name
            ),
            Some(_) => trace!("{:?} is owned again", name.name),
            None => {}
        }

        if self.body.get_local(&name.name).is_none() {
            self.body.locals.push(Local {
                name: name.name.clone(),
                ty: ty.name.clone(),
                span: Some(name.span),
            });
        }

        if !self.scopes.declare(&name.name) {
            return Err(crate::ir::InternalError::ScopeUnderflow {
                function: self.fn_name(),
            }
            .into());
        }

        Ok(())
    }

    /// Ownership of the value left its declaring scope, so it must not be dropped there.
    pub fn retract(&mut self, name: &str) {
        match self.scopes.retract(name) {
            Some(depth) => trace!("retracted {name:?} from scope at depth {depth}"),
            None => trace!("{name:?} is not owned by any open scope"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use test_case::test_case;

    use super::{LoweringContext, LoweringError, lower_function, lower_program};
    use crate::{
        ir::{ConstData, FnBody, InstructionKind, LocalRef, Operand},
        parser::{ProgramSource, parse_ast},
    };

    fn lower_source(source: &str) -> Result<FnBody, LoweringError> {
        let source = ProgramSource::new(source.to_string(), Path::new("test.cer"));
        let program = parse_ast(&source).expect("failed to parse");
        lower_function(&program.functions[0])
    }

    fn kinds(body: &FnBody) -> Vec<InstructionKind> {
        body.instructions.iter().map(|x| x.kind.clone()).collect()
    }

    fn own(target: &str, value: u128) -> InstructionKind {
        InstructionKind::OwnLiteral {
            target: target.to_string(),
            value: ConstData {
                value,
                ty: "i32".to_string(),
            },
        }
    }

    fn mv(target: &str, source: &str) -> InstructionKind {
        InstructionKind::MoveVar {
            target: target.to_string(),
            source: source.to_string(),
            ty: "i32".to_string(),
        }
    }

    fn ret_var(name: &str) -> InstructionKind {
        InstructionKind::Return(Operand::Local(LocalRef {
            name: name.to_string(),
            ty: "i32".to_string(),
        }))
    }

    fn drop(name: &str) -> InstructionKind {
        InstructionKind::Drop(name.to_string())
    }

    use InstructionKind::{BlockEnd, BlockStart};

    #[test]
    fn return_move_retracts_drop() {
        let body = lower_source(
            "fn main() -> i32 {
                let a: i32 = ow 10;
                return mv a;
            }",
        )
        .unwrap();

        assert_eq!(
            kinds(&body),
            vec![BlockStart, own("a", 10), ret_var("a"), BlockEnd]
        );
        assert_eq!(body.local_names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn move_into_inner_block() {
        let body = lower_source(
            "fn main() -> i32 {
                let a: i32 = ow 10;
                {
                    let b: i32 = mv a;
                }
                return ow 0;
            }",
        )
        .unwrap();

        assert_eq!(
            kinds(&body),
            vec![
                BlockStart,
                own("a", 10),
                BlockStart,
                mv("b", "a"),
                drop("b"),
                BlockEnd,
                InstructionKind::Return(Operand::Const(ConstData {
                    value: 0,
                    ty: "i32".to_string()
                })),
                BlockEnd,
            ]
        );
    }

    #[test]
    fn nested_move_empties_outer_scope() {
        let body = lower_source(
            "fn main() -> i32 {
                {
                    let a: i32 = ow 1;
                    {
                        let b: i32 = mv a;
                    }
                }
                return ow 0;
            }",
        )
        .unwrap();

        let drops: Vec<_> = kinds(&body)
            .into_iter()
            .filter(|kind| matches!(kind, InstructionKind::Drop(_)))
            .collect();
        assert_eq!(drops, vec![drop("b")]);
    }

    #[test]
    fn drops_follow_declaration_order() {
        let body = lower_source(
            "fn main() -> i32 {
                let c: i32 = ow 3;
                let a: i32 = ow 1;
                let b: i32 = ow 2;
                let d: i32 = mv a;
                return ow 0;
            }",
        )
        .unwrap();

        let tail: Vec<_> = kinds(&body).into_iter().rev().take(4).collect();
        assert_eq!(tail, vec![BlockEnd, drop("d"), drop("b"), drop("c")]);
    }

    #[test]
    fn undeclared_move_source_still_lowers() {
        let body = lower_source(
            "fn main() -> i32 {
                let x: i32 = mv y;
                return mv x;
            }",
        )
        .unwrap();

        assert_eq!(
            kinds(&body),
            vec![BlockStart, mv("x", "y"), ret_var("x"), BlockEnd]
        );
        assert_eq!(body.local_names().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn sibling_blocks_reuse_name() {
        let body = lower_source(
            "fn main() -> i32 {
                { let a: i32 = ow 1; }
                { let a: i32 = ow 2; }
                return ow 0;
            }",
        )
        .unwrap();

        assert_eq!(body.locals.len(), 1);
        let drops = kinds(&body)
            .into_iter()
            .filter(|kind| *kind == drop("a"))
            .count();
        assert_eq!(drops, 2);
    }

    #[test]
    fn lowering_is_deterministic() {
        let source = "fn main() -> i32 {
            let a: i32 = ow 1;
            let b: i32 = ow 2;
            { let c: i32 = mv a; let d: i32 = ow 4; }
            return mv b;
        }";

        let first = lower_source(source).unwrap();
        for _ in 0..10 {
            assert_eq!(lower_source(source).unwrap(), first);
        }
    }

    #[test]
    fn ow_of_variable_suggests_mv() {
        let error = lower_source(
            "fn main() -> i32 {
                let x: i32 = ow y;
                return ow 0;
            }",
        )
        .unwrap_err();

        assert!(
            matches!(
                &error,
                LoweringError::OwnOfVariable { name, context: LoweringContext::Let(binding), .. }
                    if name == "y" && binding == "x"
            ),
            "{:#?}",
            error
        );
        assert!(error.help().unwrap().contains("mv y"));
    }

    #[test]
    fn mv_of_literal_suggests_ow() {
        let error = lower_source(
            "fn main() -> i32 {
                return mv 5;
            }",
        )
        .unwrap_err();

        assert!(
            matches!(
                &error,
                LoweringError::MoveOfLiteral {
                    value: 5,
                    context: LoweringContext::Return,
                    ..
                }
            ),
            "{:#?}",
            error
        );
        assert!(error.help().unwrap().contains("ow 5"));
    }

    #[test_case("let x: i32 = ow foo();" ; "ow of call")]
    #[test_case("let x: i32 = ow mv z;" ; "ow of mv")]
    fn ow_of_non_literal(statement: &str) {
        let source = format!("fn main() -> i32 {{ {statement} return ow 0; }}");
        let error = lower_source(&source).unwrap_err();
        assert!(
            matches!(error, LoweringError::OwnOfNonLiteral { .. }),
            "{:#?}",
            error
        );
    }

    #[test_case("let x: i32 = mv foo();" ; "mv of call")]
    #[test_case("return mv ow 1;" ; "mv of ow")]
    fn mv_of_non_variable(statement: &str) {
        let source = format!("fn main() -> i32 {{ {statement} }}");
        let error = lower_source(&source).unwrap_err();
        assert!(
            matches!(error, LoweringError::MoveOfNonVariable { .. }),
            "{:#?}",
            error
        );
    }

    #[test_case("let x: i32 = 10;", LoweringContext::Let("x".to_string()) ; "let literal")]
    #[test_case("let x: i32 = foo();", LoweringContext::Let("x".to_string()) ; "let call")]
    #[test_case("return 0;", LoweringContext::Return ; "return literal")]
    fn missing_ownership_tag(statement: &str, expected: LoweringContext) {
        let source = format!("fn main() -> i32 {{ {statement} }}");
        let error = lower_source(&source).unwrap_err();
        assert!(
            matches!(&error, LoweringError::MissingOwnership { context, .. } if *context == expected),
            "{:#?}",
            error
        );
        assert!(error.help().unwrap().contains("mv x"));
    }

    #[test]
    fn expression_statement_is_unsupported() {
        let error = lower_source(
            "fn main() -> i32 {
                foo();
                return ow 0;
            }",
        )
        .unwrap_err();
        assert!(matches!(
            error,
            LoweringError::UnsupportedStatement { .. }
        ));
        assert!(!error.is_internal());
    }

    #[test]
    fn parameters_are_unsupported() {
        let error = lower_source("fn main(a: i32) -> i32 { return mv a; }").unwrap_err();
        assert!(matches!(
            error,
            LoweringError::UnsupportedParameters { .. }
        ));
    }

    #[test]
    fn owning_same_name_again_reuses_local() {
        let body = lower_source(
            "fn main() -> i32 {
                let a: i32 = ow 1;
                let a: i32 = ow 2;
                return mv a;
            }",
        )
        .unwrap();

        assert_eq!(body.locals.len(), 1);
        assert_eq!(
            kinds(&body),
            vec![BlockStart, own("a", 1), own("a", 2), ret_var("a"), BlockEnd]
        );
    }

    #[test]
    fn nested_redeclaration_shares_local() {
        let body = lower_source(
            "fn main() -> i32 {
                let a: i32 = ow 1;
                { let a: i32 = ow 2; }
                return ow 0;
            }",
        )
        .unwrap();

        assert_eq!(body.locals.len(), 1);
        assert_eq!(
            kinds(&body),
            vec![
                BlockStart,
                own("a", 1),
                BlockStart,
                own("a", 2),
                drop("a"),
                BlockEnd,
                InstructionKind::Return(Operand::Const(ConstData {
                    value: 0,
                    ty: "i32".to_string(),
                })),
                drop("a"),
                BlockEnd,
            ]
        );
    }

    #[test]
    fn move_into_same_name() {
        let body = lower_source(
            "fn main() -> i32 {
                let a: i32 = ow 1;
                let a: i32 = mv a;
                return ow 0;
            }",
        )
        .unwrap();

        assert_eq!(
            kinds(&body),
            vec![
                BlockStart,
                own("a", 1),
                mv("a", "a"),
                InstructionKind::Return(Operand::Const(ConstData {
                    value: 0,
                    ty: "i32".to_string(),
                })),
                drop("a"),
                BlockEnd,
            ]
        );
    }

    #[test]
    fn redeclaring_moved_binding_is_allowed() {
        let body = lower_source(
            "fn main() -> i32 {
                let a: i32 = ow 1;
                {
                    let b: i32 = mv a;
                    let a: i32 = ow 2;
                }
                return ow 0;
            }",
        )
        .unwrap();

        let drops: Vec<_> = kinds(&body)
            .into_iter()
            .filter(|kind| matches!(kind, InstructionKind::Drop(_)))
            .collect();
        assert_eq!(drops, vec![drop("b"), drop("a")]);
    }

    #[test]
    fn lower_program_stops_at_first_error() {
        let source = ProgramSource::new(
            "fn ok() -> i32 { return ow 1; }
             fn bad() -> i32 { return 1; }
             fn ok2() -> i32 { return ow 2; }"
                .to_string(),
            Path::new("test.cer"),
        );
        let program = parse_ast(&source).unwrap();
        let error = lower_program(&program).unwrap_err();
        assert_eq!(error.function(), "bad");
    }
}
