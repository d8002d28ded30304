use stepweaver::generate::target::GenerationTarget;
use stepweaver::model::action::{Action, ActionKind};
use stepweaver::naming::resolver::resolve_all;
use stepweaver::pipeline::runner::{GenerationPlan, plan_recording};
use stepweaver::ticket::story::Story;

/// The four-line login recording used across tests.
pub const LOGIN_RECORDING: &str = r##"navigate("/login")
locator("#username").fill("bob")
locator("#password").fill("x")
locator("text=Sign In").click()
"##;

pub fn action(id: u32, kind: ActionKind, selector: &str, value: Option<&str>) -> Action {
    Action::new(id, kind, Some(selector.to_string()), value.map(str::to_string))
}

pub fn resolved(mut actions: Vec<Action>) -> Vec<Action> {
    resolve_all(&mut actions);
    actions
}

pub fn login_target() -> GenerationTarget {
    GenerationTarget::new("Login", "", "REQ-1")
}

pub fn plan(raw: &str) -> GenerationPlan {
    plan_recording(raw, login_target())
}

pub fn story(key: &str, summary: &str, description: &str) -> Story {
    Story {
        key: key.to_string(),
        summary: summary.to_string(),
        description: description.to_string(),
        issue_type: "Story".to_string(),
        status: "To Do".to_string(),
        priority: "Medium".to_string(),
        acceptance_criteria: Vec::new(),
    }
}

pub fn login_story() -> Story {
    story(
        "PROJ-42",
        "User login",
        "Username field... Password field... Login button... should redirect to dashboard",
    )
}
