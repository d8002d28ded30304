use pretty_assertions::assert_eq;
use serde_json::json;

use stepweaver::error::TicketError;
use stepweaver::model::action::ActionKind;
use stepweaver::ticket::jira::{JiraClient, JiraSettings, story_from_issue};
use stepweaver::ticket::sample_values::{guess_value, sample_value};
use stepweaver::ticket::story::{FileTicketSource, TicketSource, criteria_section, split_criteria};
use stepweaver::ticket::synthesizer::{
    PriorityLevel, RequirementInput, detect_elements, feature_name_from_summary, lower_elements,
    suggest_verification, synthesize_requirement, then_assertion,
};

use crate::common::utils::{login_story, story};

mod common;

const EDGE_CASES: [&str; 4] = [
    "Submit with empty required fields",
    "Submit with invalid data",
    "Error handling",
    "UI responsiveness",
];

// ============================================================================
// Scenario 3: free-text login ticket
// ============================================================================

#[test]
fn login_ticket_detects_elements() {
    let story = login_story();
    let requirement = synthesize_requirement(&RequirementInput::from(&story));

    let names: Vec<&str> = requirement.elements.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Username", "Password", "LoginButton"]);
    assert_eq!(requirement.elements[2].interaction_kind, ActionKind::Click);
    assert_eq!(requirement.source_ticket_key.as_deref(), Some("PROJ-42"));
}

#[test]
fn login_ticket_synthesizes_skeleton_scenario() {
    let story = login_story();
    let requirement = synthesize_requirement(&RequirementInput::from(&story));

    // one criterion (the description) plus the four edge cases for a story
    assert_eq!(requirement.scenarios.len(), 5);

    let first = &requirement.scenarios[0];
    assert!(first.name.starts_with("Acceptance criterion 1"));
    assert_eq!(
        first.steps,
        vec![
            "Given user is on the user login page",
            "When user enters text \"testuser\" into username",
            "And user enters text \"TestPass123!\" into password",
            "And user clicks on login",
            "Then the system should redirect to dashboard",
        ]
    );

    let tail: Vec<&str> = requirement.scenarios[1..].iter().map(|s| s.name.as_str()).collect();
    assert_eq!(tail, EDGE_CASES.to_vec());
}

#[test]
fn bug_tickets_skip_ui_responsiveness() {
    let mut story = login_story();
    story.issue_type = "Bug".to_string();
    let requirement = synthesize_requirement(&RequirementInput::from(&story));

    let tail: Vec<&str> = requirement.scenarios[1..].iter().map(|s| s.name.as_str()).collect();
    assert_eq!(tail, EDGE_CASES[..3].to_vec());
    assert!(requirement.verification.logging);
}

#[test]
fn given_when_then_criteria_are_kept_verbatim() {
    let mut story = story("PROJ-5", "Checkout", "");
    story.acceptance_criteria = vec![
        "Scenario: Paying by card\nGiven the cart has one item\nWhen the user pays by card\nThen the order should be confirmed"
            .to_string(),
        "Orders over $100 should ship free".to_string(),
    ];
    let requirement = synthesize_requirement(&RequirementInput::from(&story));

    assert_eq!(requirement.scenarios[0].name, "Paying by card");
    assert_eq!(
        requirement.scenarios[0].steps,
        vec![
            "Given the cart has one item",
            "When the user pays by card",
            "Then the order should be confirmed",
        ]
    );
    assert_eq!(
        requirement.scenarios[1].steps.last().map(String::as_str),
        Some("Then the system should ship free")
    );
    assert_eq!(requirement.scenarios.len(), 2 + 4);
}

#[test]
fn summary_stands_in_for_empty_description() {
    let story = story("PROJ-6", "Search should return results", "");
    let requirement = synthesize_requirement(&RequirementInput::from(&story));
    assert_eq!(
        requirement.scenarios[0].steps.last().map(String::as_str),
        Some("Then the system should return results")
    );
}

// ============================================================================
// Building blocks
// ============================================================================

#[test]
fn then_assertion_uses_should_clause() {
    assert_eq!(
        then_assertion("Users should be able to reset passwords."),
        "Then the system should be able to reset passwords"
    );
    assert_eq!(then_assertion("Shows a banner"), "Then the operation should complete successfully");
}

#[test]
fn unknown_text_gets_generic_elements() {
    let elements = detect_elements("improve the onboarding copy");
    let names: Vec<&str> = elements.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["ActionButton", "TextField"]);
}

#[test]
fn lowered_elements_are_resolved_actions() {
    let actions = lower_elements(&detect_elements("enter email and password, tick remember me"));

    let summary: Vec<(u32, &str, &str)> = actions
        .iter()
        .map(|a| (a.sequence_id, a.selector.as_deref().unwrap_or_default(), a.method_name.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, "[data-testid=\"password\"]", "enterPassword"),
            (2, "[data-testid=\"email\"]", "enterEmail"),
            (3, "[data-testid=\"remember-me-checkbox\"]", "checkRememberMe"),
        ]
    );
    assert_eq!(actions[1].value.as_deref(), Some("user@example.com"));
}

#[test]
fn sample_values_by_label() {
    assert_eq!(guess_value("Email"), "user@example.com");
    assert_eq!(guess_value("Password"), "TestPass123!");
    assert_eq!(guess_value("Username"), "testuser");
    assert_eq!(guess_value("FirstName"), "Jane");
    assert_eq!(guess_value("Comment"), "test");
    assert_eq!(sample_value("Country", ActionKind::Select).as_deref(), Some("United States"));
    assert_eq!(sample_value("LoginButton", ActionKind::Click), None);
}

#[test]
fn verification_suggestions() {
    let story_ui = suggest_verification("login form", "Story", "Medium");
    assert!(story_ui.functional && story_ui.ui);
    assert!(!story_ui.performance && !story_ui.logging);
    assert_eq!(story_ui.performance_threshold_ms, 3000);
    assert_eq!(story_ui.tags(), vec!["@functional", "@ui"]);

    let critical = suggest_verification("checkout", "Task", "Blocker");
    assert!(critical.performance && critical.logging);
    assert!(!critical.ui);
    assert_eq!(critical.performance_threshold_ms, 2000);

    let slow = suggest_verification("the page load time is too slow", "Task", "Low");
    assert!(slow.performance);
    assert_eq!(slow.performance_threshold_ms, 3000);

    assert_eq!(PriorityLevel::from_label("Highest"), PriorityLevel::Critical);
    assert_eq!(PriorityLevel::from_label("whatever"), PriorityLevel::Medium);
}

#[test]
fn feature_names_from_summaries() {
    assert_eq!(feature_name_from_summary("User login"), "UserLogin");
    assert_eq!(feature_name_from_summary("As a user I want to reset my password"), "UserIWant");
    assert_eq!(feature_name_from_summary("!!!"), "Generated");
}

// ============================================================================
// Acceptance-criteria extraction
// ============================================================================

#[test]
fn split_criteria_bullets_and_gherkin_blocks() {
    let text = "- Username is required\n- Password is required\n\nGiven a user\nWhen they log in\nThen they should see the dashboard";
    assert_eq!(
        split_criteria(text),
        vec![
            "Username is required",
            "Password is required",
            "Given a user\nWhen they log in\nThen they should see the dashboard",
        ]
    );
}

#[test]
fn split_criteria_numbered_with_continuation() {
    assert_eq!(
        split_criteria("1. First rule\n2) Second rule\ncontinued here"),
        vec!["First rule", "Second rule continued here"]
    );
}

#[test]
fn criteria_section_from_description() {
    let description = "Intro text.\n\nAcceptance Criteria:\n- One\n- Two\n\nNotes:\nignore me";
    let section = criteria_section(description);
    assert_eq!(section.as_deref().map(split_criteria), Some(vec!["One".to_string(), "Two".to_string()]));
    assert_eq!(criteria_section("no criteria here"), None);
}

#[test]
fn story_from_jira_issue() {
    let issue = json!({
        "key": "PROJ-7",
        "fields": {
            "summary": "Checkout",
            "description": "Pay for the cart.\n\nAcceptance Criteria:\n- Card is charged\n- Receipt should be emailed",
            "issuetype": { "name": "Story" },
            "status": { "name": "To Do" },
            "priority": { "name": "High" }
        }
    });
    let story = story_from_issue(&issue, None).unwrap();
    assert_eq!(story.key, "PROJ-7");
    assert_eq!(story.priority, "High");
    assert_eq!(story.acceptance_criteria, vec!["Card is charged", "Receipt should be emailed"]);
}

#[test]
fn story_from_jira_custom_field() {
    let issue = json!({
        "key": "PROJ-8",
        "fields": {
            "summary": "Profile",
            "description": "Acceptance Criteria:\n- ignored",
            "customfield_10020": ["Name is editable", { "value": "Avatar can be uploaded" }]
        }
    });
    let story = story_from_issue(&issue, Some("customfield_10020")).unwrap();
    assert_eq!(story.acceptance_criteria, vec!["Name is editable", "Avatar can be uploaded"]);
    assert_eq!(story.issue_type, "Story");
}

#[test]
fn malformed_jira_issue_is_rejected() {
    let err = story_from_issue(&json!({ "fields": {} }), None).unwrap_err();
    assert!(matches!(err, TicketError::Malformed(_)));
}

#[test]
fn jira_client_requires_base_url() {
    let err = JiraClient::new(JiraSettings::default()).err();
    assert!(matches!(err, Some(TicketError::MissingCredentials(_))));

    let client = JiraClient::new(JiraSettings {
        base_url: "https://acme.atlassian.net/".to_string(),
        acceptance_criteria_field: Some("customfield_1".to_string()),
        ..JiraSettings::default()
    })
    .unwrap();
    assert_eq!(
        client.issue_url("PROJ-1"),
        "https://acme.atlassian.net/rest/api/2/issue/PROJ-1?fields=summary,description,issuetype,status,priority,customfield_1"
    );
}

// ============================================================================
// File-backed ticket source
// ============================================================================

#[test]
fn file_ticket_source_reads_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("story.yaml");
    std::fs::write(
        &path,
        "key: PROJ-9\nsummary: Search products\ndescription: Results should list matching products\nissue_type: Feature\n",
    )
    .unwrap();

    let source = FileTicketSource::new(&path);
    let story = source.fetch("PROJ-9").unwrap();
    assert_eq!(story.summary, "Search products");
    assert_eq!(story.issue_type, "Feature");
    assert!(story.acceptance_criteria.is_empty());

    assert!(matches!(source.fetch("PROJ-10"), Err(TicketError::NotFound(_))));
}

#[test]
fn file_ticket_source_fills_missing_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("story.json");
    std::fs::write(&path, r#"{"summary": "Logout", "acceptance_criteria": ["Session should end"]}"#).unwrap();

    let story = FileTicketSource::new(&path).fetch("PROJ-11").unwrap();
    assert_eq!(story.key, "PROJ-11");
    assert_eq!(story.acceptance_criteria, vec!["Session should end"]);
}

#[test]
fn file_ticket_source_missing_file() {
    let result = FileTicketSource::new("/definitely/not/here.yaml").fetch("PROJ-1");
    assert!(matches!(result, Err(TicketError::Io(_))));
}
