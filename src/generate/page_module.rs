use log::warn;

use crate::generate::context::{ArtifactKind, GenerationContext, UnitKind};
use crate::generate::document::{ConstantDecl, NavigationMethod, PageMethod, PageModule, Primitive};
use crate::generate::target::GenerationTarget;
use crate::model::action::{Action, ActionKind};

use super::in_sequence_order;

/// Build the page-module tree: one constant per new selector, the
/// navigation entry point, and one method per new method name.
///
/// Actions must already carry resolved names.
pub fn generate_page_module(
    actions: &[Action],
    target: &GenerationTarget,
    ctx: &mut GenerationContext,
) -> PageModule {
    let mut constants = Vec::new();
    let mut methods = Vec::new();

    for action in in_sequence_order(actions) {
        if action.kind == ActionKind::Navigate {
            continue;
        }
        let (Some(selector), Some(primitive)) = (action.selector.as_deref(), Primitive::for_kind(action.kind)) else {
            continue;
        };
        let id = Some(action.sequence_id);

        if ctx.admit(ArtifactKind::PageModule, UnitKind::Selector, selector, id)
            && ctx.admit(ArtifactKind::PageModule, UnitKind::Constant, &action.constant_name, id)
        {
            constants.push(ConstantDecl {
                name: action.constant_name.clone(),
                selector: selector.to_string(),
                sequence_id: action.sequence_id,
            });
            ctx.bind_constant(selector, &action.constant_name);
        }

        let Some(constant) = ctx.constant_for(selector).map(str::to_string) else {
            warn!(
                "no constant declared for selector '{}'; method {} not generated",
                selector, action.method_name
            );
            continue;
        };

        if ctx.admit(ArtifactKind::PageModule, UnitKind::Method, &action.method_name, id) {
            methods.push(PageMethod {
                name: action.method_name.clone(),
                constant,
                primitive,
                sequence_id: action.sequence_id,
            });
        }
    }

    PageModule {
        package: target.page_package.clone(),
        class_name: target.page_class(),
        navigation: NavigationMethod {
            name: "navigateTo".to_string(),
            url: navigation_url(actions, target),
        },
        constants,
        methods,
    }
}

/// Configured base URL, else the first recorded navigation, else "/".
pub fn navigation_url(actions: &[Action], target: &GenerationTarget) -> String {
    if !target.base_url.is_empty() {
        return target.base_url.clone();
    }
    in_sequence_order(actions)
        .into_iter()
        .filter(|a| a.kind == ActionKind::Navigate)
        .find_map(|a| a.value.clone())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| "/".to_string())
}
