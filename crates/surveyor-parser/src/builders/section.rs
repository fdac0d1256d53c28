use log::debug;

use surveyor_core::semantic::SurveySection;

use super::{BodyRule, Invocation, NodeBuilder, text_and_keywords};
use crate::{context::Context, error::Result};

/// `section "Title" { ... }`
pub(super) struct SectionBuilder;

impl NodeBuilder for SectionBuilder {
    fn body(&self) -> BodyRule {
        BodyRule::Required
    }

    fn build(&self, ctx: &mut Context, invocation: &Invocation<'_>) -> Result<()> {
        if ctx.survey.is_none() {
            return Err(invocation.missing_parent("a survey"));
        }

        ctx.commit();
        ctx.prune_to_survey();

        let (title, keywords) = text_and_keywords(invocation, "title", "Section")?;
        let mut section = SurveySection::new(title);
        section.set_reference(invocation.reference_id());
        section.attributes_mut().extend(keywords.into_attributes());

        let Some(survey) = ctx.survey.as_mut() else {
            return Err(invocation.missing_parent("a survey"));
        };
        let index = survey.add_section(section);
        debug!(index; "Opening section");

        ctx.section = Some(index);
        Ok(())
    }

    fn prune(&self, ctx: &mut Context) {
        ctx.commit();
        ctx.prune_to_survey();
    }
}
