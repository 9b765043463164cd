use ariadne::{ColorGenerator, Label, Report, ReportKind};
use itertools::Itertools;
use lalrpop_util::ParseError;

use super::{
    lexer::LexicalError,
    tokens::{self, Token},
};
use crate::check::FileSpan;

pub type Error = ParseError<usize, Token, LexicalError>;

/// Creates a report from a parse error.
pub fn parse_error_to_report(path: &str, error: &Error) -> Report<'static, FileSpan> {
    let mut colors = ColorGenerator::new();
    let span = |from: usize, to: usize| FileSpan::new(path.to_string(), from..to);

    match error {
        ParseError::InvalidToken { location } => {
            let loc = *location;
            Report::build(ReportKind::Error, span(loc, loc + 1))
                .with_code("P1")
                .with_label(
                    Label::new(span(loc, loc + 1))
                        .with_color(colors.next())
                        .with_message("invalid token"),
                )
                .finish()
        }
        ParseError::UnrecognizedEof { location, expected } => {
            let loc = *location;
            Report::build(ReportKind::Error, span(loc, loc))
                .with_code("P2")
                .with_label(
                    Label::new(span(loc, loc))
                        .with_message("unrecognized eof")
                        .with_color(colors.next()),
                )
                .with_note(format!(
                    "expected one of the following: {}",
                    expected.iter().join(", ")
                ))
                .finish()
        }
        ParseError::UnrecognizedToken { token, expected } => {
            Report::build(ReportKind::Error, span(token.0, token.2))
                .with_code("P3")
                .with_label(
                    Label::new(span(token.0, token.2))
                        .with_message(format!("unrecognized token {}", token.1))
                        .with_color(colors.next()),
                )
                .with_note(format!(
                    "expected one of the following: {}",
                    expected.iter().join(", ")
                ))
                .finish()
        }
        ParseError::ExtraToken { token } => Report::build(ReportKind::Error, span(token.0, token.2))
            .with_code("P3")
            .with_message("Extra token")
            .with_label(
                Label::new(span(token.0, token.2))
                    .with_message(format!("unexpected extra token {}", token.1)),
            )
            .finish(),
        ParseError::User { error } => match error {
            LexicalError::InvalidToken(err, range) => {
                let message = match err {
                    tokens::LexingError::NumberParseError => "error parsing literal number",
                    tokens::LexingError::Other => "unrecognized character",
                };
                Report::build(ReportKind::Error, span(range.start, range.end))
                    .with_code("P4")
                    .with_message(message)
                    .with_label(
                        Label::new(span(range.start, range.end))
                            .with_message(message)
                            .with_color(colors.next()),
                    )
                    .finish()
            }
        },
    }
}
