//! Tokenization of algebraic expression text.

use logos::Logos;

/// The token set: five operators, parentheses, numbers and identifiers.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    /// A variable name: alphabetic start, then letters, digits or `_`.
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*")]
    Ident,
    /// A decimal literal, optionally with an exponent: `3.14`, `1.5e-3`.
    #[regex(r"\d+\.\d+([eE][+-]?\d+)?")]
    Float,
    /// An integer literal, optionally with an exponent: `42`, `2e3`.
    #[regex(r"\d+([eE][+-]?\d+)?")]
    Integer,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `^`
    #[token("^")]
    Caret,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// Anything the lexer could not match.
    Error,
}

/// A token together with its source text and byte position.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    /// The token kind.
    pub token: Token,
    /// The matched source text.
    pub lexeme: String,
    /// Byte offset of the first matched character.
    pub start: usize,
}

/// Tokenizes the input, mapping lexer failures to [`Token::Error`] so the
/// parser can report the offending text instead of dropping it.
#[must_use]
pub fn tokenize(input: &str) -> Vec<SpannedToken> {
    let mut lex = Token::lexer(input);
    let mut out = Vec::new();
    while let Some(res) = lex.next() {
        let token = res.unwrap_or(Token::Error);
        out.push(SpannedToken {
            token,
            lexeme: lex.slice().to_string(),
            start: lex.span().start,
        });
    }
    out
}
