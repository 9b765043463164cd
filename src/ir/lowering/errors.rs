use std::fmt;

use thiserror::Error;

use crate::ir::{InternalError, Span};

/// Where an ownership-tagged operand appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoweringContext {
    /// The initializer of `let <name>`.
    Let(String),
    Return,
}

impl fmt::Display for LoweringContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoweringContext::Let(name) => write!(f, "let {name}"),
            LoweringContext::Return => f.write_str("return"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoweringError {
    #[error("'ow' can only be used with literals, found variable {name:?} in '{context}'")]
    OwnOfVariable {
        function: String,
        context: LoweringContext,
        name: String,
        span: Span,
    },
    #[error("'ow' can only be used with literals, found {found} in '{context}'")]
    OwnOfNonLiteral {
        function: String,
        context: LoweringContext,
        found: &'static str,
        span: Span,
    },
    #[error("'mv' can only be used with variables, found literal {value} in '{context}'")]
    MoveOfLiteral {
        function: String,
        context: LoweringContext,
        value: u128,
        span: Span,
    },
    #[error("'mv' can only be used with variables, found {found} in '{context}'")]
    MoveOfNonVariable {
        function: String,
        context: LoweringContext,
        found: &'static str,
        span: Span,
    },
    #[error("'{context}' must use 'ow' or 'mv'")]
    MissingOwnership {
        function: String,
        context: LoweringContext,
        span: Span,
    },
    #[error("unsupported statement: {found}")]
    UnsupportedStatement {
        function: String,
        found: &'static str,
        span: Span,
    },
    #[error("function {function:?} declares parameters, which are not supported")]
    UnsupportedParameters { function: String, span: Span },
    #[error("internal compiler error: {0}")]
    Internal(#[from] InternalError),
}

impl LoweringError {
    /// The function being lowered when the error was found.
    pub fn function(&self) -> &str {
        match self {
            LoweringError::OwnOfVariable { function, .. }
            | LoweringError::OwnOfNonLiteral { function, .. }
            | LoweringError::MoveOfLiteral { function, .. }
            | LoweringError::MoveOfNonVariable { function, .. }
            | LoweringError::MissingOwnership { function, .. }
            | LoweringError::UnsupportedStatement { function, .. }
            | LoweringError::UnsupportedParameters { function, .. } => function,
            LoweringError::Internal(error) => error.function(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            LoweringError::OwnOfVariable { span, .. }
            | LoweringError::OwnOfNonLiteral { span, .. }
            | LoweringError::MoveOfLiteral { span, .. }
            | LoweringError::MoveOfNonVariable { span, .. }
            | LoweringError::MissingOwnership { span, .. }
            | LoweringError::UnsupportedStatement { span, .. }
            | LoweringError::UnsupportedParameters { span, .. } => Some(*span),
            LoweringError::Internal(_) => None,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, LoweringError::Internal(_))
    }

    /// A suggestion on how to fix the error, if there is one.
    pub fn help(&self) -> Option<String> {
        match self {
            LoweringError::OwnOfVariable { name, .. } => {
                Some(format!("use 'mv {name}' to move the variable's value"))
            }
            LoweringError::OwnOfNonLiteral { .. } => {
                Some("'ow' takes ownership of a new literal value".to_string())
            }
            LoweringError::MoveOfLiteral { value, .. } => Some(format!(
                "use 'ow {value}' to create ownership of a literal"
            )),
            LoweringError::MoveOfNonVariable { .. } => {
                Some("'mv' moves a value that already exists in a variable".to_string())
            }
            LoweringError::MissingOwnership { context, .. } => Some(match context {
                LoweringContext::Let(_) => {
                    "use `let x: i32 = ow 10;` for literals or `let y: i32 = mv x;` for variables"
                        .to_string()
                }
                LoweringContext::Return => {
                    "use `return ow 42;` for literals or `return mv x;` for variables".to_string()
                }
            }),
            LoweringError::UnsupportedStatement { .. } => {
                Some("only 'let', 'return' and nested blocks are supported".to_string())
            }
            LoweringError::UnsupportedParameters { .. } => {
                Some("declare values inside the function body with 'let'".to_string())
            }
            LoweringError::Internal(_) => None,
        }
    }
}
