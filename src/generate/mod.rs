pub mod context;
pub mod document;
pub mod glue;
pub mod page_module;
pub mod render;
pub mod specification;
pub mod target;

use crate::model::action::Action;
use crate::model::requirement::TestRequirement;

use context::GenerationContext;
use document::{GlueModule, PageModule, SpecificationDocument};
use target::GenerationTarget;

/// Actions by ascending sequence id. Stable, so equal ids keep input order.
pub(crate) fn in_sequence_order(actions: &[Action]) -> Vec<&Action> {
    let mut ordered: Vec<&Action> = actions.iter().collect();
    ordered.sort_by_key(|a| a.sequence_id);
    ordered
}

/// The three document trees of one run, built from the same actions.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtifacts {
    pub page_module: PageModule,
    pub specification: SpecificationDocument,
    pub glue: GlueModule,
}

/// Rendered text of the three artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifacts {
    pub page_module: String,
    pub specification: String,
    pub glue: String,
}

impl GeneratedArtifacts {
    pub fn render(&self) -> RenderedArtifacts {
        RenderedArtifacts {
            page_module: render::render_page_module(&self.page_module),
            specification: render::render_specification(&self.specification),
            glue: render::render_glue(&self.glue),
        }
    }
}

/// Run the three generators over resolved actions from a recording.
pub fn generate_artifacts(
    actions: &[Action],
    target: &GenerationTarget,
    ctx: &mut GenerationContext,
) -> GeneratedArtifacts {
    let page_module = page_module::generate_page_module(actions, target, ctx);
    let specification = specification::generate_specification(actions, target, ctx);
    let glue = glue::generate_glue(actions, &page_module, target, ctx);
    GeneratedArtifacts {
        page_module,
        specification,
        glue,
    }
}

/// Run the three generators for a ticket-derived requirement whose elements
/// were lowered into `actions`.
pub fn generate_requirement_artifacts(
    requirement: &TestRequirement,
    actions: &[Action],
    target: &GenerationTarget,
    ctx: &mut GenerationContext,
) -> GeneratedArtifacts {
    let page_module = page_module::generate_page_module(actions, target, ctx);
    let specification = specification::generate_specification_from_requirement(requirement, target);
    let glue = glue::generate_glue_for_requirement(actions, &specification, &page_module, target, ctx);
    GeneratedArtifacts {
        page_module,
        specification,
        glue,
    }
}
