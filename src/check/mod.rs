use crate::ir::{InternalError, Span, lowering::LoweringError};
use ariadne::{Color, ColorGenerator, Label, Report, ReportKind};
use std::ops::Range;

mod errors;
pub mod ownership;

pub use errors::{OwnershipError, UseKind};
pub use ownership::{check_function, check_program};

#[derive(Debug, Clone)]
pub struct FileSpan {
    pub span: Range<usize>,
    pub path: String,
}

impl FileSpan {
    pub fn new(path: String, span: Range<usize>) -> Self {
        Self { path, span }
    }
}

impl ariadne::Span for FileSpan {
    type SourceId = String;

    fn source(&self) -> &Self::SourceId {
        &self.path
    }

    fn start(&self) -> usize {
        self.span.start
    }

    fn end(&self) -> usize {
        self.span.end
    }
}

fn file_span(path: &str, span: Option<Span>) -> FileSpan {
    FileSpan::new(path.to_string(), span.map(Range::from).unwrap_or(0..0))
}

/// Creates a report from a lowering error.
pub fn lowering_error_to_report(path: &str, error: &LoweringError) -> Report<'static, FileSpan> {
    if let LoweringError::Internal(error) = error {
        return internal_error_to_report(path, error);
    }

    let mut colors = ColorGenerator::new();
    colors.next();
    let filespan = file_span(path, error.span());

    let code = match error {
        LoweringError::OwnOfVariable { .. } | LoweringError::OwnOfNonLiteral { .. } => "OwMisuse",
        LoweringError::MoveOfLiteral { .. } | LoweringError::MoveOfNonVariable { .. } => {
            "MvMisuse"
        }
        LoweringError::MissingOwnership { .. } => "MissingOwnership",
        LoweringError::UnsupportedStatement { .. } => "UnsupportedStatement",
        LoweringError::UnsupportedParameters { .. } => "UnsupportedParameters",
        LoweringError::Internal(_) => unreachable!("handled above"),
    };

    let mut report = Report::build(ReportKind::Error, filespan.clone())
        .with_code(code)
        .with_message(format!("in function {:?}: {}", error.function(), error))
        .with_label(
            Label::new(filespan)
                .with_message(error.to_string())
                .with_color(colors.next()),
        );

    if let Some(help) = error.help() {
        report = report.with_help(help);
    }

    report.finish()
}

/// Creates a report from an ownership violation.
pub fn ownership_error_to_report(path: &str, error: &OwnershipError) -> Report<'static, FileSpan> {
    if let OwnershipError::Internal(error) = error {
        return internal_error_to_report(path, error);
    }

    let mut colors = ColorGenerator::new();
    colors.next();
    let filespan = file_span(path, error.span());

    let code = match error {
        OwnershipError::MoveOfUnknown { .. } | OwnershipError::UseOfUnknown { .. } => {
            "UnknownVariable"
        }
        OwnershipError::MoveOfUninitialized { .. } | OwnershipError::UseOfUninitialized { .. } => {
            "UseOfUninitialized"
        }
        OwnershipError::DoubleMove { .. } => "DoubleMove",
        OwnershipError::UseAfterMove { .. } => "UseAfterMove",
        OwnershipError::Internal(_) => unreachable!("handled above"),
    };

    let mut report = Report::build(ReportKind::Error, filespan.clone())
        .with_code(code)
        .with_message(error.to_string())
        .with_label(
            Label::new(filespan)
                .with_message(match error.instruction() {
                    Some(instruction) => format!("in `{instruction}`"),
                    None => error.to_string(),
                })
                .with_color(colors.next()),
        );

    match error {
        OwnershipError::DoubleMove {
            moved_at: Some(span),
            ..
        }
        | OwnershipError::UseAfterMove {
            moved_at: Some(span),
            ..
        } => {
            report = report.with_label(
                Label::new(file_span(path, Some(*span)))
                    .with_message("value moved here")
                    .with_color(colors.next()),
            );
        }
        OwnershipError::MoveOfUninitialized {
            dropped_at: Some(span),
            ..
        }
        | OwnershipError::UseOfUninitialized {
            dropped_at: Some(span),
            ..
        } => {
            report = report.with_label(
                Label::new(file_span(path, Some(*span)))
                    .with_message("value dropped at the end of this block")
                    .with_color(colors.next()),
            );
        }
        _ => {}
    }

    if let Some(variable) = error.variable() {
        report = report.with_note(format!(
            "a value can't be used once it has been moved or returned, {variable:?} must be declared with 'ow' or 'mv' before use"
        ));
    }

    report.finish()
}

/// Creates a report for a fault in the compiler itself.
pub fn internal_error_to_report(path: &str, error: &InternalError) -> Report<'static, FileSpan> {
    let span = match error {
        InternalError::UnregisteredLocal { instruction, .. } => instruction.span,
        InternalError::UnbalancedScopes { .. } | InternalError::ScopeUnderflow { .. } => None,
    };
    let filespan = file_span(path, span);

    Report::build(
        ReportKind::Custom("Internal compiler error", Color::Red),
        filespan.clone(),
    )
    .with_code("ICE")
    .with_message(error.to_string())
    .with_label(Label::new(filespan).with_message(format!("in function {:?}", error.function())))
    .with_note("this is a bug in the compiler, not in the program being compiled")
    .finish()
}
