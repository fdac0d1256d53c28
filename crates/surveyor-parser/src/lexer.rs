//! Lexical analyzer for Surveyor source text.
//!
//! The lexer converts source text into a stream of [`Token`]s for parsing.
//! It handles whitespace, comments, string literals, symbols, labels and all
//! punctuation of the language.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.

use winnow::{
    Parser as _,
    ascii::multispace0,
    combinator::{alt, cut_err, delimited, not, opt, peek, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, none_of, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// What went wrong inside a token. Attached to winnow errors with
/// `.context()` and turned into a [`Diagnostic`] once lexing has stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexFault {
    code: ErrorCode,
    message: &'static str,
    help: &'static str,
    /// Where the faulty token started.
    from: usize,
}

impl LexFault {
    fn new(code: ErrorCode, message: &'static str, help: &'static str, from: usize) -> Self {
        Self {
            code,
            message,
            help,
            from,
        }
    }

    fn into_diagnostic(self, to: usize) -> Diagnostic {
        Diagnostic::error(self.message)
            .with_code(self.code)
            .with_label(Span::new(self.from..to), self.code.description())
            .with_help(self.help)
    }
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexFault>>;

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Consume one expected character.
fn expect_char<'a>(input: &mut Input<'a>, mut expected: char) -> IResult<'a, char> {
    expected.parse_next(input)
}

/// The character a one-letter escape stands for.
fn simple_escape(c: char) -> Option<char> {
    let unescaped = match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        '0' => '\0',
        '\\' | '/' | '\'' | '"' => c,
        _ => return None,
    };
    Some(unescaped)
}

/// The `{XXXX}` part of a `\u{XXXX}` escape, 1-6 hex digits. `from` is the
/// offset of the backslash.
fn unicode_escape<'a>(input: &mut Input<'a>, from: usize) -> IResult<'a, char> {
    let digits = take_while(1..=6, |c: char| c.is_ascii_hexdigit()).context(LexFault::new(
        ErrorCode::E006,
        "empty unicode escape",
        "provide 1-6 hex digits: `\\u{1F602}`",
        from,
    ));

    cut_err(
        delimited('{', digits, '}')
            .context(LexFault::new(
                ErrorCode::E004,
                "invalid unicode escape",
                "use format `\\u{XXXX}` with 1-6 hex digits",
                from,
            ))
            .verify_map(|hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32))
            .context(LexFault::new(
                ErrorCode::E005,
                "invalid unicode codepoint",
                "valid range: `0x0000`-`0xD7FF` or `0xE000`-`0x10FFFF`",
                from,
            )),
    )
    .parse_next(input)
}

/// An escape sequence in a double-quoted string.
///
/// A backslash followed by whitespace swallows all of it, so a long string
/// can continue on the next line. That case yields `None`.
fn escape<'a>(input: &mut Input<'a>) -> IResult<'a, Option<char>> {
    let from = input.current_token_start();
    expect_char(input, '\\')?;

    let after_backslash = input.checkpoint();
    match input.next_token() {
        Some('u') => return unicode_escape(input, from).map(Some),
        Some(' ' | '\t' | '\r' | '\n') => {
            multispace0.parse_next(input)?;
            return Ok(None);
        }
        Some(c) => {
            if let Some(unescaped) = simple_escape(c) {
                return Ok(Some(unescaped));
            }
        }
        None => {}
    }

    input.reset(&after_backslash);
    let fault = LexFault::new(
        ErrorCode::E003,
        "invalid escape sequence",
        "valid escapes: `\\n`, `\\r`, `\\t`, `\\b`, `\\f`, `\\\\`, `\\/`, `\\'`, `\\\"`, `\\0`, `\\u{}`",
        from,
    );
    Err(ErrMode::Cut(
        ContextError::new().add_context(input, &after_backslash, fault),
    ))
}

/// Parse a double-quoted string literal.
///
/// - Basic strings: "How old are you?"
/// - Escape sequences: "line\nbreak", "quote: \"yes\""
/// - Unicode escapes: "\u{00E9}t\u{00E9}"
/// - Line continuation: "before\   \n  after" (the whitespace is dropped)
fn double_quoted_string<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let plain = none_of(['"', '\\', '\n', '\r']).map(Some);
    let content = repeat(0.., alt((escape, plain))).fold(String::new, |mut text, ch| {
        text.extend(ch);
        text
    });

    let from = input.current_token_start();
    expect_char(input, '"')?;

    cut_err(terminated(content, '"'))
        .context(LexFault::new(
            ErrorCode::E001,
            "unterminated string literal",
            "add closing `\"`",
            from,
        ))
        .map(Token::StringLiteral)
        .parse_next(input)
}

/// Parse a single-quoted string literal.
///
/// Only `\'` and `\\` are escapes; any other backslash is kept as written.
fn single_quoted_string<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let escaped = preceded('\\', one_of(['\'', '\\']));
    let plain = none_of(['\'', '\n', '\r']);
    let content = repeat(0.., alt((escaped, plain))).fold(String::new, |mut text, ch| {
        text.push(ch);
        text
    });

    let from = input.current_token_start();
    expect_char(input, '\'')?;

    cut_err(terminated(content, '\''))
        .context(LexFault::new(
            ErrorCode::E001,
            "unterminated string literal",
            "add closing `'`",
            from,
        ))
        .map(Token::StringLiteral)
        .parse_next(input)
}

fn digits<'a>(input: &mut Input<'a>) -> IResult<'a, &'a str> {
    take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)
}

/// Parse an integer or float literal, optionally negative.
///
/// A fraction or an exponent (`2.5`, `1e3`, `1.5E-2`) makes a float. A
/// literal that does not fit an `i64`, or a float that overflows, is an
/// E007 error covering the whole literal.
fn number_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let from = input.current_token_start();
    let start = input.checkpoint();

    let text = terminated(
        (
            opt('-'),
            digits,
            opt(('.', digits)),
            opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digits)),
        )
            .take(),
        // `1st` is not a number followed by an identifier
        peek(not(one_of(is_name_char))),
    )
    .parse_next(input)?;

    let token = if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Token::FloatLiteral)
    } else {
        text.parse::<i64>().ok().map(Token::IntegerLiteral)
    };

    token.ok_or_else(|| {
        let fault = LexFault::new(
            ErrorCode::E007,
            "number literal out of range",
            "integers must fit in 64 bits; write larger values as strings",
            from,
        );
        ErrMode::Cut(ContextError::new().add_context(input, &start, fault))
    })
}

/// Parse line comment starting with '#'
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded('#', take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse a bare name: a letter or underscore followed by letters, digits or underscores.
fn name<'a>(input: &mut Input<'a>) -> IResult<'a, &'a str> {
    take_while(1.., is_name_char)
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        })
        .parse_next(input)
}

/// Parse a keyword label `name:` (shorthand for `:name =>`).
fn label<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    terminated(name, (':', peek(not(':'))))
        .map(Token::Label)
        .parse_next(input)
}

/// Parse a symbol `:name`.
fn symbol<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded(':', name).map(Token::Symbol).parse_next(input)
}

/// Parse keywords with word boundary checking
fn keyword<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    terminated(
        alt((
            literal("do"),
            literal("end"),
            literal("true"),
            literal("false"),
            literal("nil"),
        )),
        peek(not(one_of(is_name_char))),
    )
    .map(|keyword: &str| match keyword {
        "do" => Token::Do,
        "end" => Token::End,
        "true" => Token::True,
        "false" => Token::False,
        _ => Token::Nil,
    })
    .parse_next(input)
}

/// Parse identifiers
fn identifier<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    name.map(Token::Identifier).parse_next(input)
}

/// Parse punctuation and the `=>` operator
fn punctuation<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        literal("=>").value(Token::FatArrow),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        ';'.value(Token::Semicolon),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

/// Parse whitespace (spaces, tabs, etc. but not newlines)
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

/// Parse newline
fn newline<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<'a, PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        line_comment,
        double_quoted_string,
        single_quoted_string,
        label,          // Must come before keyword and identifier
        keyword,        // Must come before identifier
        number_literal, // Must come before punctuation ('-')
        symbol,
        identifier,
        punctuation,
        newline, // Must come before whitespace
        whitespace,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    let span = Span::new(start_pos..end_pos);

    Ok(PositionedToken::new(token, span))
}

/// Turn a failed token into a diagnostic. Without a recorded fault the
/// character at `at` is simply not part of the language.
fn lex_error(err: ErrMode<ContextError<LexFault>>, at: usize) -> Diagnostic {
    let context = match err {
        ErrMode::Backtrack(context) | ErrMode::Cut(context) => context,
        ErrMode::Incomplete(_) => ContextError::new(),
    };
    let fault = context.context().next().cloned();

    match fault {
        Some(fault) => fault.into_diagnostic(at),
        None => Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(Span::new(at..at + 1), ErrorCode::E002.description()),
    }
}

/// Split source text into positioned tokens.
///
/// Lexing goes on past a bad token, resuming where the fault was detected or
/// one character further, so every lexical error of the script is reported
/// at once.
///
/// # Errors
///
/// A [`ParseError`] holding one diagnostic per lexical error.
pub fn tokenize(source: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut input = LocatingSlice::new(source);
    let mut tokens = Vec::new();
    let mut diagnostics = DiagnosticCollector::new();

    while !input.is_empty() {
        let before = input.current_token_start();
        match positioned_token(&mut input) {
            Ok(token) => tokens.push(token),
            Err(err) => {
                let at = input.current_token_start();
                diagnostics.emit(lex_error(err, at));
                // A fault that consumed nothing leaves the culprit in place
                if at == before {
                    input.next_token();
                }
            }
        }
    }

    diagnostics.finish().map(|_| tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_single_token(input: &str, expected: Token<'_>) {
        let mut located_input = LocatingSlice::new(input);
        let result = positioned_token(&mut located_input);
        assert!(result.is_ok(), "Failed to parse: {}", input);
        let positioned = result.unwrap();
        assert_eq!(positioned.token, expected);
    }

    fn meaningful(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .expect("tokenize")
            .into_iter()
            .map(|t| t.token)
            .filter(|t| !t.is_trivia())
            .collect()
    }

    #[test]
    fn test_keywords() {
        test_single_token("do", Token::Do);
        test_single_token("end", Token::End);
        test_single_token("true", Token::True);
        test_single_token("false", Token::False);
        test_single_token("nil", Token::Nil);
    }

    #[test]
    fn test_keyword_word_boundaries() {
        test_single_token("done", Token::Identifier("done"));
        test_single_token("end_date", Token::Identifier("end_date"));
        test_single_token("nil_value", Token::Identifier("nil_value"));
    }

    #[test]
    fn test_identifiers() {
        test_single_token("q_age", Token::Identifier("q_age"));
        test_single_token("dc_1", Token::Identifier("dc_1"));
        test_single_token("_private", Token::Identifier("_private"));
    }

    #[test]
    fn test_symbols_and_labels() {
        test_single_token(":q_age", Token::Symbol("q_age"));
        test_single_token(":other_and_string", Token::Symbol("other_and_string"));
        test_single_token("pick:", Token::Label("pick"));
        test_single_token("end:", Token::Label("end"));
    }

    #[test]
    fn test_label_followed_by_symbol() {
        assert_eq!(
            meaningful("pick: :one"),
            vec![Token::Label("pick"), Token::Symbol("one")]
        );
    }

    #[test]
    fn test_punctuation() {
        test_single_token("=>", Token::FatArrow);
        test_single_token("(", Token::LeftParen);
        test_single_token(")", Token::RightParen);
        test_single_token("{", Token::LeftBrace);
        test_single_token("}", Token::RightBrace);
        test_single_token("[", Token::LeftBracket);
        test_single_token("]", Token::RightBracket);
        test_single_token(";", Token::Semicolon);
        test_single_token(",", Token::Comma);
    }

    #[test]
    fn test_numbers() {
        test_single_token("42", Token::IntegerLiteral(42));
        test_single_token("-7", Token::IntegerLiteral(-7));
        test_single_token("2.5", Token::FloatLiteral(2.5));
        test_single_token("-0.5", Token::FloatLiteral(-0.5));
    }

    #[test]
    fn test_exponent_floats() {
        test_single_token("1e3", Token::FloatLiteral(1000.0));
        test_single_token("1.5E-2", Token::FloatLiteral(0.015));
        test_single_token("-2.5e+1", Token::FloatLiteral(-25.0));
    }

    #[test]
    fn test_number_out_of_range() {
        let source = "integer_value: 99999999999999999999\n";
        let err = tokenize(source).unwrap_err();
        let [diag] = err.diagnostics() else {
            panic!("expected one diagnostic, got {:?}", err.diagnostics());
        };
        assert_eq!(diag.code(), Some(ErrorCode::E007));
        let span = diag.labels()[0].span();
        assert_eq!(&source[span.start()..span.end()], "99999999999999999999");

        let err = tokenize("1e999").unwrap_err();
        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E007));
    }

    #[test]
    fn test_integer_then_dot_is_not_float() {
        let tokens = tokenize("3.").unwrap_err();
        assert_eq!(tokens.diagnostics()[0].code(), Some(ErrorCode::E002));
    }

    #[test]
    fn test_string_literals() {
        test_single_token(
            "\"How old are you?\"",
            Token::StringLiteral("How old are you?".to_string()),
        );
        test_single_token("\"\"", Token::StringLiteral(String::new()));
        test_single_token(
            r#""say \"hi\"\n""#,
            Token::StringLiteral("say \"hi\"\n".to_string()),
        );
        test_single_token(
            r#""caf\u{e9}""#,
            Token::StringLiteral("café".to_string()),
        );
    }

    #[test]
    fn test_single_quoted_strings() {
        test_single_token("'18+'", Token::StringLiteral("18+".to_string()));
        test_single_token(r"'it\'s'", Token::StringLiteral("it's".to_string()));
        test_single_token(r"'a\nb'", Token::StringLiteral("a\\nb".to_string()));
    }

    #[test]
    fn test_comment() {
        test_single_token("# a note", Token::LineComment(" a note"));
        assert_eq!(
            meaningful("q_1 \"One\" # trailing\n"),
            vec![
                Token::Identifier("q_1"),
                Token::StringLiteral("One".to_string()),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_statement_tokens() {
        assert_eq!(
            meaningful("dc_1(:q_age, \"==\", :a_over)"),
            vec![
                Token::Identifier("dc_1"),
                Token::LeftParen,
                Token::Symbol("q_age"),
                Token::Comma,
                Token::StringLiteral("==".to_string()),
                Token::Comma,
                Token::Symbol("a_over"),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("q_age \"Hi\"").expect("tokenize");
        assert_eq!(tokens[0].span, Span::new(0..5));
        assert_eq!(tokens[1].span, Span::new(5..6));
        assert_eq!(tokens[2].span, Span::new(6..10));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("q \"oops\n").unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert_eq!(diag.labels()[0].span().start(), 2);
    }

    #[test]
    fn test_invalid_escape() {
        let err = tokenize(r#""\q""#).unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E003));
    }

    #[test]
    fn test_all_errors_reported_in_one_pass() {
        let err = tokenize("q_1 \"ok\" @\na_1 $ \"fine\" ~").unwrap_err();
        let codes: Vec<_> = err.diagnostics().iter().map(|d| d.code()).collect();
        assert_eq!(codes, vec![Some(ErrorCode::E002); 3]);
    }
}
