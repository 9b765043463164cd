use std::fmt;

use thiserror::Error;

use crate::ir::{Instruction, InternalError, Span};

/// How a local is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseKind {
    /// Read as the operand of an assignment.
    Read,
    Return,
}

impl fmt::Display for UseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UseKind::Read => f.write_str("use"),
            UseKind::Return => f.write_str("return"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OwnershipError {
    #[error("move from unknown variable {name:?} in function {function:?}")]
    MoveOfUnknown {
        function: String,
        name: String,
        instruction: Instruction,
    },
    #[error("cannot move uninitialized variable {name:?} in function {function:?}")]
    MoveOfUninitialized {
        function: String,
        name: String,
        dropped_at: Option<Span>,
        instruction: Instruction,
    },
    #[error(
        "double move: variable {name:?} was already moved {prior_moves} time(s) in function {function:?}"
    )]
    DoubleMove {
        function: String,
        name: String,
        prior_moves: usize,
        moved_at: Option<Span>,
        instruction: Instruction,
    },
    #[error("{kind} of unknown variable {name:?} in function {function:?}")]
    UseOfUnknown {
        function: String,
        name: String,
        kind: UseKind,
        instruction: Instruction,
    },
    #[error("use after move: {kind} of moved variable {name:?} in function {function:?}")]
    UseAfterMove {
        function: String,
        name: String,
        kind: UseKind,
        moved_at: Option<Span>,
        instruction: Instruction,
    },
    #[error("{kind} of uninitialized variable {name:?} in function {function:?}")]
    UseOfUninitialized {
        function: String,
        name: String,
        kind: UseKind,
        dropped_at: Option<Span>,
        instruction: Instruction,
    },
    #[error("internal compiler error: {0}")]
    Internal(#[from] InternalError),
}

impl OwnershipError {
    pub fn function(&self) -> &str {
        match self {
            OwnershipError::MoveOfUnknown { function, .. }
            | OwnershipError::MoveOfUninitialized { function, .. }
            | OwnershipError::DoubleMove { function, .. }
            | OwnershipError::UseOfUnknown { function, .. }
            | OwnershipError::UseAfterMove { function, .. }
            | OwnershipError::UseOfUninitialized { function, .. } => function,
            OwnershipError::Internal(error) => error.function(),
        }
    }

    /// The local whose state was violated.
    pub fn variable(&self) -> Option<&str> {
        match self {
            OwnershipError::MoveOfUnknown { name, .. }
            | OwnershipError::MoveOfUninitialized { name, .. }
            | OwnershipError::DoubleMove { name, .. }
            | OwnershipError::UseOfUnknown { name, .. }
            | OwnershipError::UseAfterMove { name, .. }
            | OwnershipError::UseOfUninitialized { name, .. } => Some(name),
            OwnershipError::Internal(_) => None,
        }
    }

    /// The offending instruction.
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            OwnershipError::MoveOfUnknown { instruction, .. }
            | OwnershipError::MoveOfUninitialized { instruction, .. }
            | OwnershipError::DoubleMove { instruction, .. }
            | OwnershipError::UseOfUnknown { instruction, .. }
            | OwnershipError::UseAfterMove { instruction, .. }
            | OwnershipError::UseOfUninitialized { instruction, .. } => Some(instruction),
            OwnershipError::Internal(InternalError::UnregisteredLocal { instruction, .. }) => {
                Some(instruction)
            }
            OwnershipError::Internal(_) => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        self.instruction().and_then(|instruction| instruction.span)
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, OwnershipError::Internal(_))
    }
}
