//! Command dispatcher.
//!
//! Walks the statement tree in source order. For each statement it splits and
//! classifies the verb, checks the body contract of the node kind, runs the
//! builder, interprets the body against the narrowed context and finally
//! prunes the context (or finalizes the survey).

use log::{debug, trace};

use surveyor_core::semantic::Survey;

use crate::{
    ParseConfig,
    builders::{BodyRule, Invocation, builder_for},
    context::{Context, Trace},
    error::{Diagnostic, ErrorCode, ParseError},
    finalizer,
    parser_types::Statement,
    span::{Span, Spanned},
    verb::{self, NodeKind},
};

/// Everything a successful run produces.
pub(crate) struct Interpretation {
    pub surveys: Vec<Spanned<Survey>>,
    pub trace: Vec<String>,
    pub warnings: Vec<Diagnostic>,
}

/// Interprets statements into surveys.
pub(crate) struct Interpreter {
    ctx: Context,
    surveys: Vec<Spanned<Survey>>,
    warnings: Vec<Diagnostic>,
}

impl Interpreter {
    pub fn new(config: ParseConfig) -> Self {
        Self {
            ctx: Context::new(Trace::new(config.trace), config.strict_correct_answers),
            surveys: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Interpret a whole script.
    pub fn run(mut self, statements: &[Statement<'_>]) -> Result<Interpretation, ParseError> {
        for statement in statements {
            self.dispatch(statement)?;
        }
        Ok(Interpretation {
            surveys: self.surveys,
            trace: self.ctx.trace.into_entries(),
            warnings: self.warnings,
        })
    }

    fn dispatch(&mut self, statement: &Statement<'_>) -> Result<(), ParseError> {
        let (base, reference) = verb::split_verb(statement.verb.inner());
        let Some(kind) = verb::classify(base, self.ctx.has_validation()) else {
            return Err(Diagnostic::error(format!("unknown verb `{base}`"))
                .with_code(ErrorCode::E202)
                .with_label(statement.verb.span(), "unknown verb")
                .with_help("verbs are survey, section, group, grid, repeater, q, label, image, a, d, dc, c, v and vc, optionally followed by `_<reference>`")
                .into());
        };

        self.ctx.trace.record(verb::trace_name(kind, reference));

        let span = statement_span(statement);
        let builder = builder_for(kind);
        check_body(kind, builder.body(), statement, span)?;

        let invocation = Invocation {
            kind,
            base,
            reference,
            arguments: &statement.arguments,
            span,
        };
        trace!(kind:?, reference:?; "Dispatching statement");
        builder.build(&mut self.ctx, &invocation)?;

        let Some(body) = &statement.body else {
            return Ok(());
        };

        debug!(kind:?, statements = body.inner().len(); "Entering body");
        for child in body.inner() {
            self.dispatch(child)?;
        }

        if kind == NodeKind::Survey {
            let (survey, warnings) = finalizer::finalize(&mut self.ctx, span)?;
            self.surveys.push(Spanned::new(survey, span));
            self.warnings.extend(warnings);
        } else {
            builder.prune(&mut self.ctx);
        }
        Ok(())
    }
}

/// The verb and its arguments.
fn statement_span(statement: &Statement<'_>) -> Span {
    statement
        .arguments
        .iter()
        .fold(statement.verb.span(), |span, argument| span.union(argument.span()))
}

fn check_body(
    kind: NodeKind,
    rule: BodyRule,
    statement: &Statement<'_>,
    span: Span,
) -> Result<(), Diagnostic> {
    match (rule, &statement.body) {
        (BodyRule::Required, None) => Err(Diagnostic::error(format!(
            "{} cannot be empty",
            kind.described()
        ))
        .with_code(ErrorCode::E200)
        .with_label(span, "declared without a body")
        .with_help("add a body: `{ ... }` or `do ... end`")),
        (BodyRule::Forbidden, Some(body)) => Err(Diagnostic::error(format!(
            "{} cannot open a block",
            kind.described()
        ))
        .with_code(ErrorCode::E201)
        .with_label(body.span(), "unexpected block")
        .with_secondary_label(span, "declared here")
        .with_help("remove the block and declare its statements after this one")),
        _ => Ok(()),
    }
}
