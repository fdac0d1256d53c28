use log::debug;

use surveyor_core::semantic::Survey;

use super::{BodyRule, Invocation, NodeBuilder, text_and_keywords};
use crate::{
    context::Context,
    error::{Diagnostic, ErrorCode, Result},
};

/// `survey "Title" { ... }`
pub(super) struct SurveyNodeBuilder;

impl NodeBuilder for SurveyNodeBuilder {
    fn body(&self) -> BodyRule {
        BodyRule::Required
    }

    fn build(&self, ctx: &mut Context, invocation: &Invocation<'_>) -> Result<()> {
        if ctx.survey.is_some() {
            return Err(Diagnostic::error("a survey cannot be declared inside another survey")
                .with_code(ErrorCode::E203)
                .with_label(invocation.span, "nested survey")
                .with_help("close the enclosing survey first"));
        }

        ctx.reset();

        let (title, keywords) = text_and_keywords(invocation, "title", "Survey")?;
        let mut survey = Survey::new(title);
        survey.set_reference(invocation.reference_id());
        survey.attributes_mut().extend(keywords.into_attributes());

        debug!(title = survey.title(); "Opening survey");
        ctx.survey = Some(survey);
        Ok(())
    }
}
