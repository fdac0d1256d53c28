//! Token definitions for the Surveyor language.

use std::fmt;

use winnow::stream::Location;

use crate::span::Span;

/// Token types for the Surveyor language
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Keywords
    Do,
    End,
    True,
    False,
    Nil,

    // Literals
    StringLiteral(String),
    IntegerLiteral(i64),
    FloatLiteral(f64),
    /// `:name`, stored without the colon
    Symbol(&'src str),
    Identifier(&'src str),
    /// `name:`, stored without the colon
    Label(&'src str),

    // Operators
    FatArrow, // =>

    // Punctuation
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]
    Semicolon,    // ;
    Comma,        // ,

    // Comments
    LineComment(&'src str), // # comment

    // Whitespace
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Returns `true` for tokens the parser skips between arguments.
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::LineComment(_))
    }
}

/// A token with position information for winnow integration
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Do => write!(f, "do"),
            Token::End => write!(f, "end"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Nil => write!(f, "nil"),

            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::IntegerLiteral(n) => write!(f, "{n}"),
            Token::FloatLiteral(n) => write!(f, "{n}"),
            Token::Symbol(name) => write!(f, ":{name}"),
            Token::Identifier(name) => write!(f, "{name}"),
            Token::Label(name) => write!(f, "{name}:"),

            Token::FatArrow => write!(f, "=>"),

            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),

            Token::LineComment(comment) => write!(f, "#{comment}"),

            Token::Whitespace => write!(f, " "),
            Token::Newline => writeln!(f),
        }
    }
}
