use std::fmt;

use thiserror::Error;

pub mod lowering;

pub use crate::ast::common::Span;

/// Holds all the lowered functions of a program, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramBody {
    pub functions: Vec<FnBody>,
}

/// A lowered function: a flat instruction trace over a function-wide list of locals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnBody {
    /// The name of this function.
    pub name: String,
    /// The declared return type tag.
    pub ret_ty: String,
    /// Every local declared in the function, in first-seen order.
    pub locals: Vec<Local>,
    pub instructions: Vec<Instruction>,
    pub span: Span,
}

impl FnBody {
    pub fn get_local(&self, name: &str) -> Option<&Local> {
        self.locals.iter().find(|local| local.name == name)
    }

    pub fn local_names(&self) -> impl Iterator<Item = &str> {
        self.locals.iter().map(|local| local.name.as_str())
    }
}

/// A local, akin to a variable, identified by its surface name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Local {
    pub name: String,
    /// The declared type tag.
    pub ty: String,
    /// Where the first declaration with this name appears.
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub span: Option<Span>,
    pub kind: InstructionKind,
}

impl Instruction {
    pub fn new(kind: InstructionKind, span: Option<Span>) -> Self {
        Self { span, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionKind {
    /// Bind `target` to a fresh owned literal.
    OwnLiteral { target: String, value: ConstData },
    /// Transfer ownership from `source` to `target`, consuming `source`.
    MoveVar {
        target: String,
        source: String,
        ty: String,
    },
    /// Plain store of an operand. Not produced by lowering yet.
    Assign { target: String, operand: Operand },
    Return(Operand),
    /// Release a local still alive at the exit of its declaring block.
    Drop(String),
    BlockStart,
    BlockEnd,
}

/// A operand is a value, either a local or constant data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Const(ConstData),
    Local(LocalRef),
}

impl Operand {
    pub fn get_local(&self) -> Option<&str> {
        match self {
            Operand::Local(local) => Some(&local.name),
            Operand::Const(_) => None,
        }
    }
}

/// Constant data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstData {
    pub value: u128,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRef {
    pub name: String,
    pub ty: String,
}

/// Faults that can only be caused by a bug in the compiler itself, never by user code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("scope stack not empty after lowering function {function:?} ({depth} scopes left open)")]
    UnbalancedScopes { function: String, depth: usize },
    #[error("scope stack underflow while lowering function {function:?}")]
    ScopeUnderflow { function: String },
    #[error("function {function:?} references unregistered local {name:?} in `{instruction}`")]
    UnregisteredLocal {
        function: String,
        name: String,
        instruction: Instruction,
    },
}

impl InternalError {
    pub fn function(&self) -> &str {
        match self {
            InternalError::UnbalancedScopes { function, .. }
            | InternalError::ScopeUnderflow { function }
            | InternalError::UnregisteredLocal { function, .. } => function,
        }
    }
}

impl fmt::Display for ConstData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.value, self.ty)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Const(data) => write!(f, "{}", data.value),
            Operand::Local(local) => f.write_str(&local.name),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstructionKind::OwnLiteral { target, value } => write!(f, "{target} = ow {value}"),
            InstructionKind::MoveVar { target, source, ty } => {
                write!(f, "{target} = mv {source}: {ty}")
            }
            InstructionKind::Assign { target, operand } => match operand {
                Operand::Const(data) => write!(f, "{target} = {data}"),
                Operand::Local(local) => write!(f, "{target} = {}: {}", local.name, local.ty),
            },
            InstructionKind::Return(operand) => write!(f, "return {operand};"),
            InstructionKind::Drop(target) => write!(f, "drop {target}"),
            InstructionKind::BlockStart => f.write_str("{"),
            InstructionKind::BlockEnd => f.write_str("}"),
        }
    }
}

impl FnBody {
    /// Renders the instruction trace, one instruction per line, indented by block depth.
    pub fn display_instructions(&self) -> String {
        let mut out = String::new();
        let mut depth: usize = 0;

        for instruction in &self.instructions {
            if matches!(instruction.kind, InstructionKind::BlockEnd) {
                depth = depth.saturating_sub(1);
            }
            out.push_str(&"    ".repeat(depth));
            out.push_str(&instruction.to_string());
            out.push('\n');
            if matches!(instruction.kind, InstructionKind::BlockStart) {
                depth += 1;
            }
        }

        out
    }
}

impl fmt::Display for FnBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fn {}() -> {}", self.name, self.ret_ty)?;
        for local in &self.locals {
            writeln!(f, "let {}: {};", local.name, local.ty)?;
        }
        f.write_str(&self.display_instructions())
    }
}

impl fmt::Display for ProgramBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, function) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{function}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instr(kind: InstructionKind) -> Instruction {
        Instruction::new(kind, None)
    }

    #[test]
    fn display_instruction_forms() {
        let own = InstructionKind::OwnLiteral {
            target: "a".to_string(),
            value: ConstData {
                value: 10,
                ty: "i32".to_string(),
            },
        };
        assert_eq!(own.to_string(), "a = ow 10: i32");

        let mv = InstructionKind::MoveVar {
            target: "b".to_string(),
            source: "a".to_string(),
            ty: "i32".to_string(),
        };
        assert_eq!(mv.to_string(), "b = mv a: i32");

        let assign = InstructionKind::Assign {
            target: "c".to_string(),
            operand: Operand::Local(LocalRef {
                name: "b".to_string(),
                ty: "i32".to_string(),
            }),
        };
        assert_eq!(assign.to_string(), "c = b: i32");

        let ret = InstructionKind::Return(Operand::Const(ConstData {
            value: 0,
            ty: "i32".to_string(),
        }));
        assert_eq!(ret.to_string(), "return 0;");
        assert_eq!(InstructionKind::Drop("a".to_string()).to_string(), "drop a");
    }

    #[test]
    fn display_indents_nested_blocks() {
        let body = FnBody {
            name: "main".to_string(),
            ret_ty: "i32".to_string(),
            locals: vec![Local {
                name: "a".to_string(),
                ty: "i32".to_string(),
                span: None,
            }],
            instructions: vec![
                instr(InstructionKind::BlockStart),
                instr(InstructionKind::BlockStart),
                instr(InstructionKind::OwnLiteral {
                    target: "a".to_string(),
                    value: ConstData {
                        value: 1,
                        ty: "i32".to_string(),
                    },
                }),
                instr(InstructionKind::Drop("a".to_string())),
                instr(InstructionKind::BlockEnd),
                instr(InstructionKind::BlockEnd),
            ],
            span: Span::default(),
        };

        assert_eq!(
            body.to_string(),
            "fn main() -> i32\nlet a: i32;\n{\n    {\n        a = ow 1: i32\n        drop a\n    }\n}\n"
        );
    }
}
