use std::sync::LazyLock;

use regex::Regex;

use crate::generate::document::StepKeyword;
use crate::generate::target::{GenerationTarget, normalize_feature};
use crate::model::action::{Action, ActionKind};
use crate::model::requirement::{PageElement, Scenario, TestRequirement, VerificationOptions};
use crate::naming::case::to_kebab_case;
use crate::naming::resolver::{resolve_all, step_line};
use crate::ticket::sample_values::sample_value;
use crate::ticket::story::Story;

// ============================================================================
// Input
// ============================================================================

/// Free text plus hints the synthesizer works from.
#[derive(Debug, Clone, Copy)]
pub struct RequirementInput<'a> {
    pub key: Option<&'a str>,
    pub summary: &'a str,
    pub description: &'a str,
    pub acceptance_criteria: &'a [String],

    /// Ticket type, e.g. "Story", "Bug", "Feature"
    pub category: &'a str,
    pub priority: &'a str,
}

impl<'a> From<&'a Story> for RequirementInput<'a> {
    fn from(story: &'a Story) -> Self {
        Self {
            key: Some(story.key.as_str()).filter(|k| !k.is_empty()),
            summary: &story.summary,
            description: &story.description,
            acceptance_criteria: &story.acceptance_criteria,
            category: &story.issue_type,
            priority: &story.priority,
        }
    }
}

impl RequirementInput<'_> {
    /// Summary, body and criteria joined and lowercased.
    pub fn combined_lowercase(&self) -> String {
        let mut text = format!("{}\n{}", self.summary, self.description);
        for criterion in self.acceptance_criteria {
            text.push('\n');
            text.push_str(criterion);
        }
        text.to_lowercase()
    }
}

// ============================================================================
// Element detection
// ============================================================================

struct ElementRule {
    pattern: Regex,
    name: &'static str,
    kind: ActionKind,
    description: &'static str,
}

static ELEMENT_RULES: LazyLock<Vec<ElementRule>> = LazyLock::new(|| {
    let rule = |pattern: &str, name, kind, description| ElementRule {
        pattern: Regex::new(pattern).expect("static regex"),
        name,
        kind,
        description,
    };
    vec![
        rule(r"\busername\b|\buser\s+name\b|\buser\s*id\b", "Username", ActionKind::Fill, "Username input field"),
        rule(r"\bpassword\b", "Password", ActionKind::Fill, "Password input field"),
        rule(r"\be-?mail\b", "Email", ActionKind::Fill, "Email input field"),
        rule(r"\bfirst\s*name\b", "FirstName", ActionKind::Fill, "First name input field"),
        rule(r"\blast\s*name\b|\bsurname\b", "LastName", ActionKind::Fill, "Last name input field"),
        rule(r"\bphone\b|\bmobile\b|\btelephone\b", "Phone", ActionKind::Fill, "Phone number input field"),
        rule(
            r"\b(?:street|postal|shipping|billing|home)\s+address\b|\baddress\s+(?:field|line)\b",
            "Address",
            ActionKind::Fill,
            "Address input field",
        ),
        rule(r"\bsearch\b", "Search", ActionKind::Fill, "Search input field"),
        rule(r"\blog\s*-?\s*in\b|\bsign\s*-?\s*in\b", "LoginButton", ActionKind::Click, "Login button"),
        rule(r"\bsubmit\b", "SubmitButton", ActionKind::Click, "Submit button"),
        rule(r"\bsave\b", "SaveButton", ActionKind::Click, "Save button"),
        rule(r"\bcancel\b", "CancelButton", ActionKind::Click, "Cancel button"),
        rule(r"\bdelete\b|\bremove\b", "DeleteButton", ActionKind::Click, "Delete button"),
        rule(r"\bregister\b|\bsign\s*-?\s*up\b", "RegisterButton", ActionKind::Click, "Register button"),
        rule(r"\bremember\s+me\b", "RememberMeCheckbox", ActionKind::Check, "Remember me checkbox"),
        rule(r"\bterms\b|\bagree\b", "AcceptTermsCheckbox", ActionKind::Check, "Accept terms checkbox"),
        rule(r"\bcountry\b", "CountryDropdown", ActionKind::Select, "Country dropdown"),
        rule(r"\bdrop\s*-?\s*down\b|\bcombo\s*box\b", "OptionsDropdown", ActionKind::Select, "Options dropdown"),
    ]
});

/// Every rule matching the lowercased text contributes one element, in
/// table order. With no match, a generic button + field pair is returned.
pub fn detect_elements(text_lower: &str) -> Vec<PageElement> {
    let elements: Vec<PageElement> = ELEMENT_RULES
        .iter()
        .filter(|r| r.pattern.is_match(text_lower))
        .map(|r| PageElement {
            name: r.name.to_string(),
            interaction_kind: r.kind,
            description: r.description.to_string(),
        })
        .collect();

    if !elements.is_empty() {
        return elements;
    }
    vec![
        PageElement {
            name: "ActionButton".to_string(),
            interaction_kind: ActionKind::Click,
            description: "Primary action button".to_string(),
        },
        PageElement {
            name: "TextField".to_string(),
            interaction_kind: ActionKind::Fill,
            description: "Text input field".to_string(),
        },
    ]
}

/// Lower elements into resolved synthetic actions, one per element, with
/// sequence ids starting at 1 and a `data-testid` selector.
pub fn lower_elements(elements: &[PageElement]) -> Vec<Action> {
    let mut actions: Vec<Action> = elements
        .iter()
        .enumerate()
        .map(|(i, element)| {
            Action::new(
                i as u32 + 1,
                element.interaction_kind,
                Some(format!("[data-testid=\"{}\"]", to_kebab_case(&element.name))),
                sample_value(&element.name, element.interaction_kind),
            )
        })
        .collect();
    resolve_all(&mut actions);
    actions
}

// ============================================================================
// Scenario synthesis
// ============================================================================

static SHOULD_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bshould\s+([^.\n;!?]+)").expect("static regex"));

/// "Then" step built from the clause after "should", or a generic one.
pub fn then_assertion(criterion: &str) -> String {
    match SHOULD_CLAUSE
        .captures(criterion)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().trim_end_matches([',', ':']).trim())
        .filter(|clause| !clause.is_empty())
    {
        Some(clause) => format!("Then the system should {}", clause),
        None => "Then the operation should complete successfully".to_string(),
    }
}

/// Given/When/Then-shaped lines of a criterion, verbatim.
fn gherkin_lines(criterion: &str) -> Vec<String> {
    let lines: Vec<String> = criterion
        .lines()
        .map(str::trim)
        .filter(|l| StepKeyword::split(l).is_some())
        .map(str::to_string)
        .collect();
    let anchored = lines.iter().any(|l| {
        matches!(
            StepKeyword::split(l),
            Some((StepKeyword::Given | StepKeyword::When | StepKeyword::Then, _))
        )
    });
    if anchored { lines } else { Vec::new() }
}

fn scenario_name(index: usize, criterion: &str) -> String {
    let explicit = criterion.lines().find_map(|l| {
        l.trim()
            .strip_prefix("Scenario:")
            .map(|rest| rest.trim().to_string())
    });
    if let Some(name) = explicit.filter(|n| !n.is_empty()) {
        return name;
    }

    let first = criterion
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    let short: String = first.chars().take(60).collect();
    if short.is_empty() {
        format!("Acceptance criterion {}", index + 1)
    } else {
        format!("Acceptance criterion {}: {}", index + 1, short)
    }
}

/// Precondition, one When/And per element action, then the assertion.
fn skeleton_steps(navigation_phrase: &str, actions: &[Action], criterion: &str) -> Vec<String> {
    let mut steps = vec![format!("Given {}", navigation_phrase)];
    for (i, action) in actions.iter().filter(|a| a.kind != ActionKind::Navigate).enumerate() {
        let keyword = if i == 0 { "When" } else { "And" };
        steps.push(format!("{} {}", keyword, step_line(action)));
    }
    steps.push(then_assertion(criterion));
    steps
}

/// Scenarios appended to every synthesized requirement.
pub fn edge_case_scenarios(navigation_phrase: &str, feature_type: bool) -> Vec<Scenario> {
    let given = format!("Given {}", navigation_phrase);
    let mut scenarios = vec![
        Scenario {
            name: "Submit with empty required fields".to_string(),
            steps: vec![
                given.clone(),
                "When user submits the form without filling required fields".to_string(),
                "Then validation errors should be displayed for required fields".to_string(),
            ],
        },
        Scenario {
            name: "Submit with invalid data".to_string(),
            steps: vec![
                given.clone(),
                "When user enters invalid data into the form fields".to_string(),
                "Then an error message should be displayed for invalid input".to_string(),
            ],
        },
        Scenario {
            name: "Error handling".to_string(),
            steps: vec![
                given.clone(),
                "When the system encounters an unexpected error".to_string(),
                "Then a user-friendly error message should be displayed".to_string(),
            ],
        },
    ];
    if feature_type {
        scenarios.push(Scenario {
            name: "UI responsiveness".to_string(),
            steps: vec![
                given,
                "When the page is viewed on a mobile-sized viewport".to_string(),
                "Then all page elements should be visible and usable".to_string(),
            ],
        });
    }
    scenarios
}

// ============================================================================
// Verification suggestion
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl PriorityLevel {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "critical" | "blocker" | "highest" | "urgent" => PriorityLevel::Critical,
            "high" | "major" => PriorityLevel::High,
            "low" | "lowest" | "minor" | "trivial" => PriorityLevel::Low,
            _ => PriorityLevel::Medium,
        }
    }
}

static UI_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:ui|user interface|layout|display|screen|responsive|visual|design)\b").expect("static regex")
});

static PERFORMANCE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:performance|fast|faster|slow|load time|response time|latency|speed)\b")
        .expect("static regex")
});

pub fn is_feature_type(category: &str) -> bool {
    let c = category.to_lowercase();
    c.contains("feature") || c.contains("story") || c.contains("improvement")
}

pub fn is_bug_type(category: &str) -> bool {
    let c = category.to_lowercase();
    c.contains("bug") || c.contains("defect")
}

pub fn suggest_verification(text_lower: &str, category: &str, priority: &str) -> VerificationOptions {
    let level = PriorityLevel::from_label(priority);
    let urgent = level >= PriorityLevel::High;

    VerificationOptions {
        functional: true,
        ui: is_feature_type(category) || UI_KEYWORDS.is_match(text_lower),
        performance: urgent || PERFORMANCE_KEYWORDS.is_match(text_lower),
        logging: is_bug_type(category) || urgent,
        performance_threshold_ms: if level == PriorityLevel::Critical { 2000 } else { 3000 },
    }
}

// ============================================================================
// Entry point
// ============================================================================

const SUMMARY_STOPWORDS: [&str; 14] = [
    "a", "an", "the", "with", "and", "or", "to", "of", "for", "in", "on", "as", "be", "able",
];

/// Short PascalCase feature name from a ticket summary (first three
/// meaningful words).
pub fn feature_name_from_summary(summary: &str) -> String {
    let spaced: String = summary
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let words: Vec<&str> = spaced
        .split_whitespace()
        .filter(|w| !SUMMARY_STOPWORDS.contains(&w.to_lowercase().as_str()))
        .take(3)
        .collect();
    normalize_feature(&words.join(" "))
}

/// Turn ticket text into a `TestRequirement`.
///
/// Each acceptance criterion becomes one scenario: its Given/When/Then lines
/// verbatim when it has them, otherwise a synthesized skeleton. With no
/// criteria the description (or the summary) stands in as the only one.
/// Edge-case scenarios are appended last.
pub fn synthesize_requirement(input: &RequirementInput<'_>) -> TestRequirement {
    synthesize_with_actions(input).0
}

/// Like `synthesize_requirement`, also returning the resolved actions the
/// skeleton steps were written from.
pub fn synthesize_with_actions(input: &RequirementInput<'_>) -> (TestRequirement, Vec<Action>) {
    let text_lower = input.combined_lowercase();
    let elements = detect_elements(&text_lower);
    let actions = lower_elements(&elements);

    let feature = feature_name_from_summary(input.summary);
    let navigation_phrase = GenerationTarget::new(&feature, "", "").navigation_phrase();

    let mut criteria: Vec<&str> = input
        .acceptance_criteria
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if criteria.is_empty() {
        let fallback = if input.description.trim().is_empty() {
            input.summary
        } else {
            input.description
        };
        criteria.push(fallback.trim());
    }

    let mut scenarios: Vec<Scenario> = criteria
        .iter()
        .enumerate()
        .map(|(i, criterion)| {
            let verbatim = gherkin_lines(criterion);
            let steps = if verbatim.is_empty() {
                skeleton_steps(&navigation_phrase, &actions, criterion)
            } else {
                verbatim
            };
            Scenario {
                name: scenario_name(i, criterion),
                steps,
            }
        })
        .collect();
    scenarios.extend(edge_case_scenarios(&navigation_phrase, is_feature_type(input.category)));

    let requirement = TestRequirement {
        name: input.summary.trim().to_string(),
        description: input.description.trim().to_string(),
        source_ticket_key: input.key.map(str::to_string),
        elements,
        scenarios,
        verification: suggest_verification(&text_lower, input.category, input.priority),
    };
    (requirement, actions)
}
