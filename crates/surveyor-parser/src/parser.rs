//! Parser for Surveyor source tokens.
//!
//! This module transforms a token stream from the [`lexer`](super::lexer) into
//! the statement AST defined in [`parser_types`](super::parser_types). The
//! public entry point is [`build_script`].
//!
//! Newlines are significant between statements and insignificant inside
//! parentheses, brackets and map literals, or after a comma.

use winnow::{
    Parser as _,
    combinator::{alt, opt, repeat, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use surveyor_core::value::{Value, ValueMap};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types::Statement,
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at error start position
    ///
    /// Used to calculate start_offset as: `tokens.len() - start_offset_value`
    StartOffset(usize),
}

type Input<'src> = SurveyorTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
/// Type alias for winnow TokenSlice with our positioned tokens
type SurveyorTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

/// Where a statement list ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    /// `{ ... }` body
    Brace,
    /// `do ... end` body
    End,
    /// Top level of the script
    Eof,
}

/// A parsed argument before keyword pairs are gathered.
enum Argument {
    Positional(Spanned<Value>),
    Pair(Spanned<String>, Spanned<Value>),
}

/// Positional arguments plus the keyword pairs that follow them.
#[derive(Default)]
struct ArgumentList {
    positional: Vec<Spanned<Value>>,
    keywords: ValueMap,
    keywords_span: Option<Span>,
}

impl ArgumentList {
    /// Add an argument; returns `false` for a positional argument after a pair.
    fn push(&mut self, argument: Argument) -> bool {
        match argument {
            Argument::Positional(value) => {
                if self.keywords_span.is_some() {
                    return false;
                }
                self.positional.push(value);
            }
            Argument::Pair(key, value) => {
                let span = key.span().union(value.span());
                self.keywords_span = Some(match self.keywords_span {
                    Some(existing) => existing.union(span),
                    None => span,
                });
                self.keywords.insert(key.into_inner(), value.into_inner());
            }
        }
        true
    }

    fn finish(self) -> Vec<Spanned<Value>> {
        let mut arguments = self.positional;
        if let Some(span) = self.keywords_span {
            arguments.push(Spanned::new(Value::Map(self.keywords), span));
        }
        arguments
    }
}

fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Helper to create a Cut error with a label
fn cut_error(label: &'static str) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(Context::Label(label));
    ErrMode::Cut(e)
}

/// Check the next token without consuming it.
fn next_is<'src>(input: &mut Input<'src>, predicate: impl Fn(&Token<'_>) -> bool) -> bool {
    let checkpoint = input.checkpoint();
    let next = any::<_, ErrMode<ContextError>>.parse_next(input);
    input.reset(&checkpoint);
    matches!(next, Ok(token) if predicate(&token.token))
}

/// Parse whitespace and comments
fn trivia0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(
        0..,
        any.verify(|token: &PositionedToken<'_>| token.is_trivia())
            .void(),
    )
    .parse_next(input)
}

/// Parse whitespace, comments and newlines
fn blank0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(
        0..,
        any.verify(|token: &PositionedToken<'_>| {
            token.is_trivia() || matches!(token.token, Token::Newline)
        })
        .void(),
    )
    .parse_next(input)
}

/// Parse statement separators along with any whitespace and comments
fn separators0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(
        0..,
        any.verify(|token: &PositionedToken<'_>| {
            token.is_trivia() || matches!(token.token, Token::Newline | Token::Semicolon)
        })
        .void(),
    )
    .parse_next(input)
}

/// Parse one expected token and return its span.
fn token_is<'src>(input: &mut Input<'src>, expected: &Token<'_>, label: &'static str) -> IResult<Span> {
    any.verify_map(|token: &PositionedToken<'_>| (token.token == *expected).then_some(token.span))
        .context(Context::Label(label))
        .parse_next(input)
}

fn comma<'src>(input: &mut Input<'src>) -> IResult<Span> {
    token_is(input, &Token::Comma, "`,`")
}

fn fat_arrow<'src>(input: &mut Input<'src>) -> IResult<Span> {
    token_is(input, &Token::FatArrow, "`=>`")
}

fn is_closing(closing: Closing, token: &Token<'_>) -> bool {
    match closing {
        Closing::Brace => matches!(token, Token::RightBrace),
        Closing::End => matches!(token, Token::End),
        Closing::Eof => false,
    }
}

/// Tokens that can start an argument written without parentheses.
///
/// `{` is absent: directly after a verb it always opens a body.
fn starts_bare_argument(token: &Token<'_>) -> bool {
    matches!(
        token,
        Token::StringLiteral(_)
            | Token::IntegerLiteral(_)
            | Token::FloatLiteral(_)
            | Token::Symbol(_)
            | Token::Label(_)
            | Token::True
            | Token::False
            | Token::Nil
            | Token::LeftBracket
    )
}

/// Parse a statement verb such as `q_age`
fn verb<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::Identifier(name) => Some(Spanned::new(*name, token.span)),
        _ => None,
    })
    .context(Context::Label("statement"))
    .parse_next(input)
}

/// Parse a literal scalar: string, number, symbol, boolean or nil
fn scalar<'src>(input: &mut Input<'src>) -> IResult<Spanned<Value>> {
    any.verify_map(|token: &PositionedToken<'_>| {
        let value = match &token.token {
            Token::StringLiteral(s) => Value::String(s.clone()),
            Token::IntegerLiteral(n) => Value::Integer(*n),
            Token::FloatLiteral(n) => Value::Float(*n),
            Token::Symbol(name) => Value::Symbol((*name).to_string()),
            Token::True => Value::Bool(true),
            Token::False => Value::Bool(false),
            Token::Nil => Value::Nil,
            _ => return None,
        };
        Some(Spanned::new(value, token.span))
    })
    .parse_next(input)
}

/// Parse a map key written as a string or symbol (`"text" =>`, `:text =>`)
fn arrow_key<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::StringLiteral(s) => Some(Spanned::new(s.clone(), token.span)),
        Token::Symbol(name) => Some(Spanned::new((*name).to_string(), token.span)),
        _ => None,
    })
    .parse_next(input)
}

/// Parse `name: value`
fn label_pair<'src>(input: &mut Input<'src>) -> IResult<(Spanned<String>, Spanned<Value>)> {
    let key = any
        .verify_map(|token: &PositionedToken<'_>| match &token.token {
            Token::Label(name) => Some(Spanned::new((*name).to_string(), token.span)),
            _ => None,
        })
        .parse_next(input)?;

    cut_err(input, |input| {
        blank0(input)?;
        let value = value(input)?;
        Ok((key, value))
    })
}

/// Parse `:name => value` or `"name" => value`
fn arrow_pair<'src>(input: &mut Input<'src>) -> IResult<(Spanned<String>, Spanned<Value>)> {
    let key = arrow_key(input)?;
    blank0(input)?;
    fat_arrow(input)?;

    cut_err(input, |input| {
        blank0(input)?;
        let value = value(input)?;
        Ok((key, value))
    })
}

fn pair<'src>(input: &mut Input<'src>) -> IResult<(Spanned<String>, Spanned<Value>)> {
    alt((label_pair, arrow_pair))
        .context(Context::Label("key-value pair"))
        .parse_next(input)
}

/// Parse a map literal: `{ :a => 1, b: "two" }`
fn map_literal<'src>(input: &mut Input<'src>) -> IResult<Spanned<Value>> {
    let open = token_is(input, &Token::LeftBrace, "`{`")?;

    cut_err(input, |input| {
        blank0(input)?;
        let pairs: Vec<(Spanned<String>, Spanned<Value>)> =
            separated(0.., pair, (blank0, comma, blank0)).parse_next(input)?;
        blank0(input)?;
        opt(comma).parse_next(input)?;
        blank0(input)?;
        let close = token_is(input, &Token::RightBrace, "`}`")?;

        let map = pairs
            .into_iter()
            .map(|(key, value)| (key.into_inner(), value.into_inner()))
            .collect();
        Ok(Spanned::new(Value::Map(map), open.union(close)))
    })
}

/// Parse an array literal: `[1, 2, 3]`
fn list_literal<'src>(input: &mut Input<'src>) -> IResult<Spanned<Value>> {
    let open = token_is(input, &Token::LeftBracket, "`[`")?;

    cut_err(input, |input| {
        blank0(input)?;
        let items: Vec<Spanned<Value>> =
            separated(0.., value, (blank0, comma, blank0)).parse_next(input)?;
        blank0(input)?;
        opt(comma).parse_next(input)?;
        blank0(input)?;
        let close = token_is(input, &Token::RightBracket, "`]`")?;

        let items = items.into_iter().map(Spanned::into_inner).collect();
        Ok(Spanned::new(Value::List(items), open.union(close)))
    })
}

fn value<'src>(input: &mut Input<'src>) -> IResult<Spanned<Value>> {
    alt((scalar, map_literal, list_literal))
        .context(Context::Label("value"))
        .parse_next(input)
}

fn argument<'src>(input: &mut Input<'src>) -> IResult<Argument> {
    alt((
        label_pair.map(|(key, value)| Argument::Pair(key, value)),
        arrow_pair.map(|(key, value)| Argument::Pair(key, value)),
        value.map(Argument::Positional),
    ))
    .context(Context::Label("argument"))
    .parse_next(input)
}

/// Parse one argument into the list, rejecting positionals after pairs
fn push_argument<'src>(input: &mut Input<'src>, arguments: &mut ArgumentList) -> IResult<()> {
    let checkpoint = input.checkpoint();
    let parsed = argument(input)?;
    if !arguments.push(parsed) {
        input.reset(&checkpoint);
        return Err(cut_error("keyword arguments after all positional arguments"));
    }
    Ok(())
}

/// Parse `( arg, arg, key: value )`
fn paren_arguments<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<Value>>> {
    token_is(input, &Token::LeftParen, "`(`")?;

    cut_err(input, |input| {
        let mut arguments = ArgumentList::default();
        blank0(input)?;

        while !next_is(input, |t| matches!(t, Token::RightParen)) {
            push_argument(input, &mut arguments)?;
            blank0(input)?;
            if opt(comma).parse_next(input)?.is_none() {
                break;
            }
            blank0(input)?;
        }

        token_is(input, &Token::RightParen, "`)`")?;
        Ok(arguments.finish())
    })
}

/// Parse `arg, arg, key: value` on the verb's line
///
/// A comma lets the list continue on the next line.
fn bare_arguments<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<Value>>> {
    let mut arguments = ArgumentList::default();

    loop {
        push_argument(input, &mut arguments)?;

        let checkpoint = input.checkpoint();
        trivia0(input)?;
        if opt(comma).parse_next(input)?.is_none() {
            input.reset(&checkpoint);
            break;
        }
        blank0(input)?;
    }

    Ok(arguments.finish())
}

/// Parse an optional `{ ... }` or `do ... end` body
fn body<'src>(input: &mut Input<'src>) -> IResult<Option<Spanned<Vec<Statement<'src>>>>> {
    let (closing, open) = if next_is(input, |t| matches!(t, Token::LeftBrace)) {
        (Closing::Brace, token_is(input, &Token::LeftBrace, "`{`")?)
    } else if next_is(input, |t| matches!(t, Token::Do)) {
        (Closing::End, token_is(input, &Token::Do, "`do`")?)
    } else {
        return Ok(None);
    };

    let statements = statement_list(input, closing)?;

    let close = match closing {
        Closing::Brace => token_is(input, &Token::RightBrace, "`}`")?,
        _ => token_is(input, &Token::End, "`end`")?,
    };

    Ok(Some(Spanned::new(statements, open.union(close))))
}

/// Parse one statement: `verb arguments body`
fn statement<'src>(input: &mut Input<'src>) -> IResult<Statement<'src>> {
    let verb = verb(input)?;

    cut_err(input, |input| {
        trivia0(input)?;
        let arguments = if next_is(input, |t| matches!(t, Token::LeftParen)) {
            paren_arguments(input)?
        } else if next_is(input, starts_bare_argument) {
            bare_arguments(input)?
        } else {
            Vec::new()
        };

        trivia0(input)?;
        let body = body(input)?;

        Ok(Statement {
            verb,
            arguments,
            body,
        })
    })
}

/// Parse statements up to the given closing token (not consumed)
fn statement_list<'src>(input: &mut Input<'src>, closing: Closing) -> IResult<Vec<Statement<'src>>> {
    let mut statements = Vec::new();

    loop {
        separators0(input)?;
        if input.eof_offset() == 0 || next_is(input, |t| is_closing(closing, t)) {
            break;
        }

        statements.push(statement(input)?);

        trivia0(input)?;
        if input.eof_offset() == 0 || next_is(input, |t| is_closing(closing, t)) {
            break;
        }
        if !next_is(input, |t| matches!(t, Token::Newline | Token::Semicolon)) {
            return Err(cut_error("`;` or newline after statement"));
        }
    }

    Ok(statements)
}

fn is_meaningful(token: &PositionedToken<'_>) -> bool {
    !token.is_trivia() && !matches!(token.token, Token::Newline)
}

/// Convert a winnow error into a diagnostic.
///
/// The offending token is the first meaningful token at the error position.
/// When the error carries a StartOffset context, the span starts at the first
/// meaningful token of the construct that was being parsed.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let context = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let end_offset = tokens.len() - current_remaining;
    let start_offset = context
        .context()
        .find_map(|ctx| match ctx {
            Context::StartOffset(n) => Some(tokens.len() - n),
            _ => None,
        })
        .filter(|start| *start < end_offset);

    let expected: Vec<&str> = context
        .context()
        .filter_map(|ctx| match ctx {
            Context::Label(label) => Some(*label),
            _ => None,
        })
        .collect();
    let expected = if expected.is_empty() {
        String::new()
    } else {
        format!(": expected {}", expected.join(" → "))
    };

    let construct_start = start_offset.and_then(|start| {
        tokens[start..end_offset]
            .iter()
            .find(|t| is_meaningful(t))
            .map(|t| t.span)
    });

    match tokens[end_offset..].iter().find(|t| is_meaningful(t)) {
        Some(offending) => {
            let span = construct_start
                .map(|start| start.union(offending.span))
                .unwrap_or(offending.span);

            Diagnostic::error(format!("unexpected token `{}`{expected}", offending.token))
                .with_code(ErrorCode::E100)
                .with_label(span, "unexpected token")
                .with_help("check syntax and token positioning")
        }
        None => {
            let last = tokens
                .iter()
                .rev()
                .find(|t| is_meaningful(t))
                .map(|t| t.span)
                .unwrap_or_default();
            let span = construct_start.map(|start| start.union(last)).unwrap_or(last);

            Diagnostic::error(format!("incomplete input{expected}"))
                .with_code(ErrorCode::E101)
                .with_label(span, "input ends here")
                .with_help("close every open `(`, `[`, `{` and `do` block")
        }
    }
}

/// Deepest nesting of parentheses, lists, maps and bodies a script may use.
pub(crate) const MAX_NESTING: usize = 64;

/// Reject scripts nested deeper than [`MAX_NESTING`] before the recursive
/// parsers descend into them.
fn check_nesting(tokens: &[PositionedToken<'_>]) -> Result<(), Diagnostic> {
    let mut depth = 0usize;
    for token in tokens {
        match token.token {
            Token::LeftParen | Token::LeftBracket | Token::LeftBrace | Token::Do => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(Diagnostic::error(format!(
                        "nesting deeper than {MAX_NESTING} levels"
                    ))
                    .with_code(ErrorCode::E100)
                    .with_label(token.span, "nested too deeply")
                    .with_help("flatten the nested lists, maps or bodies"));
                }
            }
            Token::RightParen | Token::RightBracket | Token::RightBrace | Token::End => {
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
    }
    Ok(())
}

/// Build the statement list of a whole script from tokens
pub fn build_script<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<Vec<Statement<'src>>, Diagnostic> {
    check_nesting(tokens)?;
    let mut token_slice = TokenSlice::new(tokens);

    match statement_list(&mut token_slice, Closing::Eof) {
        Ok(statements) => Ok(statements),
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}
