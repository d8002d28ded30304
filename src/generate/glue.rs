use log::warn;

use crate::generate::context::{ArtifactKind, GenerationContext, UnitKind};
use crate::generate::document::{
    GlueModule, HandlerArgument, HandlerBody, PageModule, SpecificationDocument, StepHandler,
    StepKeyword,
};
use crate::generate::target::GenerationTarget;
use crate::model::action::{Action, ActionKind};
use crate::naming::case::to_camel_case;
use crate::naming::resolver::{escape_cucumber_expression, step_expression, step_matches};

use super::in_sequence_order;

/// Glue module for a recorded action sequence.
///
/// Navigation handler first, one handler per new step phrase in sequence
/// order, closing placeholder last. Handlers only call methods the page
/// module tree declares.
pub fn generate_glue(
    actions: &[Action],
    page: &PageModule,
    target: &GenerationTarget,
    ctx: &mut GenerationContext,
) -> GlueModule {
    let mut handlers = vec![navigation_handler(page, target, ctx)];
    handlers.extend(action_handlers(actions, page, ctx));
    handlers.extend(closing_handler(target, ctx));
    assemble(target, handlers)
}

/// Glue module for a ticket-derived requirement.
///
/// Same as `generate_glue`, plus a pending handler for every scenario step
/// that no action handler binds.
pub fn generate_glue_for_requirement(
    actions: &[Action],
    specification: &SpecificationDocument,
    page: &PageModule,
    target: &GenerationTarget,
    ctx: &mut GenerationContext,
) -> GlueModule {
    let mut handlers = vec![navigation_handler(page, target, ctx)];
    handlers.extend(action_handlers(actions, page, ctx));

    let navigation = target.navigation_phrase();
    let closing = target.closing_phrase();
    let bindable: Vec<&Action> = actions.iter().filter(|a| a.kind != ActionKind::Navigate).collect();

    for step in specification.all_steps() {
        let text = step.text.trim();
        if text.is_empty()
            || text == navigation
            || text == closing
            || bindable.iter().any(|a| step_matches(a, text))
        {
            continue;
        }
        if !ctx.admit(ArtifactKind::Glue, UnitKind::Step, text, None) {
            continue;
        }
        let function_name = to_camel_case(text);
        if !ctx.admit(ArtifactKind::Glue, UnitKind::Method, &function_name, None) {
            continue;
        }
        handlers.push(StepHandler {
            keyword: handler_keyword(step.keyword),
            expression: escape_cucumber_expression(text),
            function_name,
            body: HandlerBody::Pending,
        });
    }

    handlers.extend(closing_handler(target, ctx));
    assemble(target, handlers)
}

fn assemble(target: &GenerationTarget, handlers: Vec<StepHandler>) -> GlueModule {
    GlueModule {
        package: target.steps_package.clone(),
        class_name: target.glue_class(),
        page_package: target.page_package.clone(),
        page_class: target.page_class(),
        page_field: target.page_field(),
        handlers,
    }
}

fn navigation_handler(page: &PageModule, target: &GenerationTarget, ctx: &mut GenerationContext) -> StepHandler {
    let phrase = target.navigation_phrase();
    ctx.admit(ArtifactKind::Glue, UnitKind::Step, &phrase, None);
    let function_name = to_camel_case(&phrase);
    ctx.admit(ArtifactKind::Glue, UnitKind::Method, &function_name, None);

    StepHandler {
        keyword: StepKeyword::Given,
        expression: escape_cucumber_expression(&phrase),
        function_name,
        body: HandlerBody::Call {
            method: page.navigation.name.clone(),
            argument: HandlerArgument::None,
        },
    }
}

fn action_handlers(actions: &[Action], page: &PageModule, ctx: &mut GenerationContext) -> Vec<StepHandler> {
    let mut handlers = Vec::new();

    for action in in_sequence_order(actions) {
        if action.kind == ActionKind::Navigate {
            continue;
        }
        let id = Some(action.sequence_id);
        if !ctx.admit(ArtifactKind::Glue, UnitKind::Step, &action.step_phrase, id) {
            continue;
        }
        let function_name = to_camel_case(&action.step_phrase);
        if !ctx.admit(ArtifactKind::Glue, UnitKind::Method, &function_name, id) {
            continue;
        }

        let selector = action.selector.as_deref().unwrap_or_default();
        let body = match page.method(&action.method_name) {
            Some(method) if ctx.constant_for(selector) == Some(method.constant.as_str()) => {
                HandlerBody::Call {
                    method: action.method_name.clone(),
                    argument: handler_argument(action),
                }
            }
            Some(method) => {
                warn!(
                    "method {} acts on {}, not on '{}'; step '{}' left pending",
                    method.name, method.constant, selector, action.step_phrase
                );
                HandlerBody::Pending
            }
            None => {
                warn!(
                    "page module has no method {}; step '{}' left pending",
                    action.method_name, action.step_phrase
                );
                HandlerBody::Pending
            }
        };

        handlers.push(StepHandler {
            keyword: StepKeyword::When,
            expression: step_expression(action),
            function_name,
            body,
        });
    }
    handlers
}

fn handler_argument(action: &Action) -> HandlerArgument {
    if action.kind.is_parameterized() {
        return HandlerArgument::Parameter;
    }
    match (action.kind, &action.value) {
        (ActionKind::Press, Some(key)) => HandlerArgument::Literal(key.clone()),
        (ActionKind::Press, None) => HandlerArgument::Literal("Enter".to_string()),
        _ => HandlerArgument::None,
    }
}

fn closing_handler(target: &GenerationTarget, ctx: &mut GenerationContext) -> Option<StepHandler> {
    let phrase = target.closing_phrase();
    if !ctx.admit(ArtifactKind::Glue, UnitKind::Step, &phrase, None) {
        return None;
    }
    let function_name = to_camel_case(&phrase);
    ctx.admit(ArtifactKind::Glue, UnitKind::Method, &function_name, None);
    Some(StepHandler {
        keyword: StepKeyword::Then,
        expression: escape_cucumber_expression(&phrase),
        function_name,
        body: HandlerBody::PassThrough,
    })
}

/// Cucumber annotations only come in Given/When/Then flavours that matter here.
fn handler_keyword(keyword: Option<StepKeyword>) -> StepKeyword {
    match keyword {
        Some(StepKeyword::Given) => StepKeyword::Given,
        Some(StepKeyword::Then) => StepKeyword::Then,
        _ => StepKeyword::When,
    }
}
