use log::debug;

use surveyor_core::semantic::{GroupDisplay, GroupId, QuestionGroup};

use super::{BodyRule, Invocation, NodeBuilder, text_and_keywords};
use crate::{context::Context, error::Result};

/// `group`, `grid` and `repeater` blocks.
pub(super) struct GroupBuilder;

impl GroupBuilder {
    fn display_for(base: &str) -> GroupDisplay {
        match base {
            "grid" => GroupDisplay::Grid,
            "repeater" => GroupDisplay::Repeater,
            _ => GroupDisplay::Default,
        }
    }
}

impl NodeBuilder for GroupBuilder {
    fn body(&self) -> BodyRule {
        BodyRule::Required
    }

    fn build(&self, ctx: &mut Context, invocation: &Invocation<'_>) -> Result<()> {
        let Some(section) = ctx.section else {
            return Err(invocation.missing_parent("a survey section"));
        };

        ctx.commit();
        ctx.prune_to_section();

        let (text, mut keywords) = text_and_keywords(invocation, "text", "Question Group")?;
        let display = keywords
            .take_parsed("display_type")?
            .unwrap_or_else(|| Self::display_for(invocation.base));

        let mut group = QuestionGroup::new(text, display);
        group.set_reference(invocation.reference_id());
        group.attributes_mut().extend(keywords.into_attributes());

        let Some(section_node) = ctx.survey.as_mut().and_then(|s| s.section_mut(section)) else {
            return Err(invocation.missing_parent("a survey section"));
        };
        let index = section_node.add_group(group);
        debug!(section, index, display:?; "Opening question group");

        ctx.group = Some(GroupId { section, index });
        Ok(())
    }

    fn prune(&self, ctx: &mut Context) {
        ctx.commit();
        ctx.prune_to_section();
    }
}
