use std::fs;
use std::path::Path;

use stepweaver::error::{GenError, TicketError};
use stepweaver::generate::context::ArtifactKind;
use stepweaver::pipeline::runner::{Generator, RecordingRequest, RunMode, plan_ticket, read_recording};
use stepweaver::pipeline::writer::{OutputLayout, text_fingerprint};
use stepweaver::naming::resolver::step_line;
use stepweaver::report::console::format_generation_summary;
use stepweaver::ticket::story::{FileTicketSource, Story, TicketSource};
use stepweaver::ticket::synthesizer::{RequirementInput, synthesize_with_actions};
use stepweaver::trace::logger::TraceLogger;

use crate::common::utils::{LOGIN_RECORDING, login_story};

mod common;

fn login_request() -> RecordingRequest {
    RecordingRequest {
        feature: "Login".to_string(),
        base_url: String::new(),
        requirement_key: "REQ-1".to_string(),
    }
}

fn files_under(root: &Path) -> Vec<String> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                found.push(path.strip_prefix(root).unwrap().display().to_string());
            }
        }
    }
    found.sort();
    found
}

struct UnreachableTracker;

impl TicketSource for UnreachableTracker {
    fn fetch(&self, _key: &str) -> Result<Story, TicketError> {
        Err(TicketError::Status {
            status: 503,
            body: "maintenance".to_string(),
        })
    }
}

// ============================================================================
// Recording mode
// ============================================================================

#[test]
fn recording_run_writes_three_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Generator::new(OutputLayout::with_root(dir.path()));

    let summary = generator
        .generate_from_recording(LOGIN_RECORDING, &login_request())
        .unwrap();

    assert_eq!(
        files_under(dir.path()),
        vec![
            "src/test/java/pages/LoginPage.java",
            "src/test/java/steps/LoginSteps.java",
            "src/test/resources/features/login.feature",
        ]
    );

    assert_eq!(summary.mode, RunMode::Recording);
    assert_eq!(summary.actions, 4);
    assert_eq!(summary.constants, 3);
    assert_eq!(summary.methods, 3);
    assert_eq!(summary.behavior_steps, 3);
    assert_eq!(summary.handlers, 5);
    assert_eq!(summary.pending_handlers, 0);
    assert!(summary.warnings.is_empty());

    let kinds: Vec<ArtifactKind> = summary.artifacts.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![ArtifactKind::PageModule, ArtifactKind::Specification, ArtifactKind::Glue]);
    for artifact in &summary.artifacts {
        let content = fs::read_to_string(&artifact.path).unwrap();
        assert_eq!(artifact.fingerprint, text_fingerprint(&content));
        assert_eq!(artifact.bytes, content.len());
    }
}

#[test]
fn reruns_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Generator::new(OutputLayout::with_root(dir.path()));

    let first = generator.generate_from_recording(LOGIN_RECORDING, &login_request()).unwrap();
    let second = generator.generate_from_recording(LOGIN_RECORDING, &login_request()).unwrap();

    let fingerprints = |s: &stepweaver::pipeline::runner::GenerationSummary| {
        s.artifacts.iter().map(|a| a.fingerprint.clone()).collect::<Vec<_>>()
    };
    assert_eq!(fingerprints(&first), fingerprints(&second));
}

#[test]
fn packages_and_layout_are_configurable() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout {
        root: dir.path().to_path_buf(),
        pages_dir: "pages".to_string(),
        features_dir: "features".to_string(),
        steps_dir: "steps".to_string(),
    };
    let generator = Generator::new(layout).with_packages("com.acme.pages", "com.acme.steps");
    generator.generate_from_recording(LOGIN_RECORDING, &login_request()).unwrap();

    let page = fs::read_to_string(dir.path().join("pages/LoginPage.java")).unwrap();
    assert!(page.starts_with("package com.acme.pages;"));
    let glue = fs::read_to_string(dir.path().join("steps/LoginSteps.java")).unwrap();
    assert!(glue.contains("import com.acme.pages.LoginPage;"));
}

#[test]
fn empty_recording_still_generates() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Generator::new(OutputLayout::with_root(dir.path()));
    let request = RecordingRequest {
        base_url: "https://example.com".to_string(),
        ..login_request()
    };

    let summary = generator.generate_from_recording("// nothing here", &request).unwrap();
    assert_eq!(summary.actions, 1);
    assert_eq!(summary.warnings.len(), 1);
    assert_eq!(summary.artifacts.len(), 3);

    let page = fs::read_to_string(&summary.artifacts[0].path).unwrap();
    assert!(page.contains("PAGE_URL = \"https://example.com\""));
}

#[test]
fn no_temp_files_are_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    Generator::new(OutputLayout::with_root(dir.path()))
        .generate_from_recording(LOGIN_RECORDING, &login_request())
        .unwrap();
    assert!(files_under(dir.path()).iter().all(|f| !f.ends_with(".tmp")));
}

#[test]
fn write_failure_names_artifact_and_rolls_back() {
    let dir = tempfile::tempdir().unwrap();
    // a plain file where the features directory should be
    fs::write(dir.path().join("blocked"), "not a directory").unwrap();
    let layout = OutputLayout {
        features_dir: "blocked".to_string(),
        ..OutputLayout::with_root(dir.path())
    };

    let err = Generator::new(layout)
        .generate_from_recording(LOGIN_RECORDING, &login_request())
        .unwrap_err();

    match err {
        GenError::Write { artifact, .. } => assert_eq!(artifact, ArtifactKind::Specification),
        other => panic!("expected write failure, got {}", other),
    }
    assert!(!dir.path().join("src/test/java/pages/LoginPage.java").exists());
    assert_eq!(files_under(dir.path()), vec!["blocked"]);
}

#[test]
fn missing_recording_file_is_a_parse_stage_error() {
    let err = read_recording("/no/such/recording.py").unwrap_err();
    assert!(matches!(err, GenError::RecordingRead { .. }));
    assert!(err.to_string().starts_with("parse stage"));
}

// ============================================================================
// Ticket mode
// ============================================================================

#[test]
fn ticket_run_from_story_file() {
    let dir = tempfile::tempdir().unwrap();
    let story_path = dir.path().join("story.yaml");
    fs::write(
        &story_path,
        "key: PROJ-42\nsummary: User login\ndescription: Username field... Password field... Login button... should redirect to dashboard\n",
    )
    .unwrap();
    let out = dir.path().join("out");

    let summary = Generator::new(OutputLayout::with_root(&out))
        .generate_from_ticket(&FileTicketSource::new(&story_path), "PROJ-42", "/login")
        .unwrap();

    assert_eq!(summary.mode, RunMode::Ticket);
    assert_eq!(summary.feature, "UserLogin");
    assert_eq!(summary.requirement_key, "PROJ-42");
    assert_eq!(summary.scenarios, 5);
    assert!(summary.pending_handlers > 0);

    let feature = fs::read_to_string(out.join("src/test/resources/features/user_login.feature")).unwrap();
    assert!(feature.contains("@PROJ-42 @functional @ui\n"));
    assert!(feature.contains("Feature: User login\n"));
    assert!(feature.contains("    Then the system should redirect to dashboard\n"));
    assert!(feature.contains("  Scenario: Submit with empty required fields\n"));

    let glue = fs::read_to_string(out.join("src/test/java/steps/UserLoginSteps.java")).unwrap();
    assert!(glue.contains("import io.cucumber.java.PendingException;"));
    assert!(glue.contains("userLoginPage.enterUsername(value);"));
    assert!(glue.contains("@Then(\"the system should redirect to dashboard\")"));

    let page = fs::read_to_string(out.join("src/test/java/pages/UserLoginPage.java")).unwrap();
    assert!(page.contains("PAGE_URL = \"/login\""));
    assert!(page.contains("LOGIN_3 = \"[data-testid=\\\"login-button\\\"]\""));
}

#[test]
fn ticket_glue_binds_skeleton_steps_to_page_methods() {
    let plan = plan_ticket(&login_story(), "", ("pages", "steps"));
    let glue = &plan.artifacts.glue;

    let called: Vec<&str> = glue.called_methods().collect();
    assert_eq!(called, vec!["navigateTo", "enterUsername", "enterPassword", "clickLogin"]);
    for method in glue.called_methods() {
        assert!(plan.artifacts.page_module.has_method(method));
    }
    // skeleton action steps are bound, not duplicated as pending handlers
    assert!(!glue.handlers.iter().any(|h| h.expression.contains("testuser")));
}

#[test]
fn ticket_plan_reuses_synthesized_actions() {
    let story = login_story();
    let (requirement, synthesized) = synthesize_with_actions(&RequirementInput::from(&story));
    let plan = plan_ticket(&story, "", ("pages", "steps"));

    assert_eq!(plan.actions, synthesized);
    assert_eq!(plan.requirement.as_ref(), Some(&requirement));

    // the skeleton steps were written from these same actions
    let skeleton = &requirement.scenarios[0].steps;
    for action in &plan.actions {
        assert!(skeleton.iter().any(|step| step.ends_with(&step_line(action))));
    }
}

#[test]
fn ticket_fetch_failure_aborts_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let err = Generator::new(OutputLayout::with_root(dir.path()))
        .generate_from_ticket(&UnreachableTracker, "PROJ-1", "")
        .unwrap_err();

    match &err {
        GenError::TicketFetch { key, source } => {
            assert_eq!(key, "PROJ-1");
            assert!(matches!(source, TicketError::Status { status: 503, .. }));
        }
        other => panic!("expected ticket fetch failure, got {}", other),
    }
    assert!(err.to_string().starts_with("ticket-fetch stage"));
    assert!(files_under(dir.path()).is_empty());
}

#[test]
fn ticket_without_text_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let story_path = dir.path().join("empty.yaml");
    fs::write(&story_path, "key: PROJ-3\nsummary: \"\"\n").unwrap();
    let out = dir.path().join("out");

    let err = Generator::new(OutputLayout::with_root(&out))
        .generate_from_ticket(&FileTicketSource::new(&story_path), "PROJ-3", "")
        .unwrap_err();
    assert!(matches!(
        err,
        GenError::TicketFetch {
            source: TicketError::Malformed(_),
            ..
        }
    ));
    assert!(!out.exists());
}

// ============================================================================
// Trace and console report
// ============================================================================

#[test]
fn trace_records_written_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let trace_path = dir.path().join("trace.jsonl");
    let generator = Generator::new(OutputLayout::with_root(dir.path().join("out")))
        .with_tracer(TraceLogger::new(trace_path.to_str().unwrap()));

    generator
        .generate_from_recording("locator(\"#save\").click()\nlocator(\"#save\").click()", &login_request())
        .unwrap();

    let lines: Vec<serde_json::Value> = fs::read_to_string(&trace_path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let written = lines.iter().filter(|e| e["event"] == "artifact_written").count();
    let suppressed = lines.iter().filter(|e| e["event"] == "suppressed").count();
    assert_eq!(written, 3);
    assert!(suppressed >= 2);
    assert!(lines
        .iter()
        .filter(|e| e["event"] == "artifact_written")
        .all(|e| e["fingerprint"].as_str().is_some_and(|f| f.len() == 40)));
}

#[test]
fn console_summary_lists_artifacts_and_skips() {
    let dir = tempfile::tempdir().unwrap();
    let summary = Generator::new(OutputLayout::with_root(dir.path()))
        .generate_from_recording("locator(\"#save\").click()\nlocator(\"#save\").click()", &login_request())
        .unwrap();

    let report = format_generation_summary(&summary);
    assert!(report.starts_with("=== Generated: Login (recording, REQ-1) ===\n"));
    assert!(report.contains("LoginPage.java"));
    assert!(report.contains("[SKIP] duplicate method 'clickSave' in page module (action #2)"));
    assert!(report.contains("=== Done: 3 artifacts, 4 duplicates skipped, 0 warnings ===\n"));
}

#[test]
fn summary_serializes_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let summary = Generator::new(OutputLayout::with_root(dir.path()))
        .generate_from_recording("page.hover(\"#x\")\nlocator(\"#go\").click()", &login_request())
        .unwrap();

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["mode"], "recording");
    assert_eq!(json["warnings"][0]["warning"], "unrecognized_call");
    assert_eq!(json["artifacts"][0]["kind"], "page_module");
}
