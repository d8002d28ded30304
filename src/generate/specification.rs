use crate::generate::context::{ArtifactKind, GenerationContext, UnitKind};
use crate::generate::document::{ScenarioBlock, SpecificationDocument, StepKeyword, StepLine};
use crate::generate::target::GenerationTarget;
use crate::model::action::{Action, ActionKind};
use crate::model::requirement::TestRequirement;
use crate::naming::case::decamelize;
use crate::naming::resolver::step_line;

use super::in_sequence_order;

/// Specification document for a recorded action sequence.
///
/// Header tag, precondition, one behavior line per new step phrase in
/// ascending sequence order (navigation excluded), closing verification.
pub fn generate_specification(
    actions: &[Action],
    target: &GenerationTarget,
    ctx: &mut GenerationContext,
) -> SpecificationDocument {
    let mut steps = vec![StepLine::new(StepKeyword::Given, target.navigation_phrase())];

    for action in in_sequence_order(actions) {
        if action.kind == ActionKind::Navigate {
            continue;
        }
        if !ctx.admit(
            ArtifactKind::Specification,
            UnitKind::Step,
            &action.step_phrase,
            Some(action.sequence_id),
        ) {
            continue;
        }
        let keyword = if steps.len() == 1 {
            StepKeyword::When
        } else {
            StepKeyword::And
        };
        steps.push(StepLine::behavior(keyword, step_line(action), action.sequence_id));
    }

    steps.push(StepLine::new(StepKeyword::Then, target.closing_phrase()));

    let mut description = requirement_line(&target.requirement_key);
    description.push("Generated from a recorded browser session.".to_string());

    SpecificationDocument {
        tags: vec![requirement_tag(&target.requirement_key)],
        feature: target.feature.clone(),
        description,
        scenarios: vec![ScenarioBlock {
            name: format!("Recorded {} flow", decamelize(&target.feature)),
            steps,
        }],
    }
}

/// Specification document for a ticket-derived requirement.
///
/// One scenario block per scenario; step strings are kept verbatim.
pub fn generate_specification_from_requirement(
    requirement: &TestRequirement,
    target: &GenerationTarget,
) -> SpecificationDocument {
    let mut tags = vec![requirement_tag(&target.requirement_key)];
    tags.extend(requirement.verification.tags().into_iter().map(str::to_string));

    let mut description = requirement_line(&target.requirement_key);
    description.extend(
        requirement
            .description
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string),
    );
    if requirement.verification.performance {
        description.push(format!(
            "Performance threshold: {} ms",
            requirement.verification.performance_threshold_ms
        ));
    }

    let scenarios = requirement
        .scenarios
        .iter()
        .map(|s| ScenarioBlock {
            name: s.name.clone(),
            steps: s.steps.iter().map(|raw| StepLine::verbatim(raw)).collect(),
        })
        .collect();

    SpecificationDocument {
        tags,
        feature: requirement.name.clone(),
        description,
        scenarios,
    }
}

fn requirement_line(key: &str) -> Vec<String> {
    if key.trim().is_empty() {
        Vec::new()
    } else {
        vec![format!("Requirement: {}", key.trim())]
    }
}

/// "REQ 12" -> "@REQ-12"
pub fn requirement_tag(key: &str) -> String {
    let cleaned: String = key
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();
    if cleaned.is_empty() {
        "@requirement".to_string()
    } else {
        format!("@{}", cleaned)
    }
}
