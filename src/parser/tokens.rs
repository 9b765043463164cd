use logos::Logos;
use std::convert::Infallible;

#[derive(Debug, PartialEq, Clone, Default)]
pub enum LexingError {
    NumberParseError,
    #[default]
    Other,
}

impl From<std::num::ParseIntError> for LexingError {
    fn from(_: std::num::ParseIntError) -> Self {
        LexingError::NumberParseError
    }
}

impl From<Infallible> for LexingError {
    fn from(_: Infallible) -> Self {
        LexingError::Other
    }
}

#[derive(Logos, logos_display::Debug, logos_display::Display, PartialEq, Clone)]
#[logos(error = LexingError, skip r"[ \t\r\n\f]+", skip r"//[^\n]*", skip r"/\*(?:[^*]|\*[^/])*\*/")]
pub enum Token {
    #[token("let")]
    KeywordLet,
    #[token("fn")]
    KeywordFn,
    #[token("return")]
    KeywordReturn,
    #[token("ow")]
    KeywordOw,
    #[token("mv")]
    KeywordMv,

    // Modern way of allowing identifiers, read: https://unicode.org/reports/tr31/
    #[regex(r"[\p{XID_Start}_]\p{XID_Continue}*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Literals
    #[regex(r"\d+", |lex| lex.slice().parse::<u128>())]
    Integer(u128),

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBracket,
    #[token("}")]
    RightBracket,
    #[token("=")]
    Assign,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("->")]
    Arrow,
    #[token(",")]
    Coma,
}

#[cfg(test)]
mod tests {
    use logos::Logos;

    use super::{LexingError, Token};

    #[test]
    fn lex_let_binding() {
        let tokens: Vec<_> = Token::lexer("let a: i32 = ow 10; // trailing comment")
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::KeywordLet,
                Token::Identifier("a".to_string()),
                Token::Colon,
                Token::Identifier("i32".to_string()),
                Token::Assign,
                Token::KeywordOw,
                Token::Integer(10),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn keywords_are_not_identifiers() {
        let tokens: Vec<_> = Token::lexer("mv mvx owner")
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::KeywordMv,
                Token::Identifier("mvx".to_string()),
                Token::Identifier("owner".to_string()),
            ]
        );
    }

    #[test]
    fn integer_overflow_is_a_lexing_error() {
        let mut lexer = Token::lexer("999999999999999999999999999999999999999999");
        assert_eq!(lexer.next(), Some(Err(LexingError::NumberParseError)));
    }
}
