use std::sync::LazyLock;

use regex::Regex;

use crate::model::action::{Action, ActionKind};
use crate::naming::case::{decamelize, to_pascal_case, to_upper_snake};

// ============================================================================
// Readable-name rules
// ============================================================================

/// How the captured text of a rule is turned into words before cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Post {
    Verbatim,
    Separators,
    StripIdSuffix,
}

struct NameRule {
    name: &'static str,
    regex: Regex,
    post: Post,
}

/// Ordered rule table; the first rule whose regex matches wins.
static NAME_RULES: LazyLock<Vec<NameRule>> = LazyLock::new(|| {
    let rule = |name, pattern: &str, post| NameRule {
        name,
        regex: Regex::new(pattern).expect("static regex"),
        post,
    };
    vec![
        rule("text", r#"^text\s*=\s*["']?(.+?)["']?$"#, Post::Verbatim),
        rule("placeholder", r#"^placeholder\s*=\s*["']?(.+?)["']?$"#, Post::Verbatim),
        rule("label", r#"^label\s*=\s*["']?(.+?)["']?$"#, Post::Verbatim),
        rule("id", r"#([A-Za-z_][\w-]*)", Post::StripIdSuffix),
        rule("role", r#"^role=\w+\[name=["']?([^"'\]]+)["']?"#, Post::Verbatim),
        rule("has_text", r#":has-text\(\s*["']([^"']+)["']\s*\)"#, Post::Verbatim),
        rule(
            "attribute",
            r#"\[(?:name|placeholder|aria-label|title|value)\s*=\s*["']?([^"'\]]+)["']?\]"#,
            Post::Verbatim,
        ),
        rule("class", r"\.([A-Za-z_][\w-]*)", Post::Separators),
        rule("test_id", r#"\[data-test-?id\s*=\s*["']?([^"'\]]+)["']?\]"#, Post::Separators),
    ]
});

const ID_SUFFIXES: [&str; 8] = ["-btn", "-button", "-input", "-field", "_btn", "_button", "_input", "_field"];

const GENERIC_TRAILING_WORDS: [&str; 7] = ["button", "btn", "input", "field", "link", "checkbox", "dropdown"];

/// Which rule produced the raw text for a selector, if any.
pub fn matching_rule(selector: &str) -> Option<&'static str> {
    NAME_RULES
        .iter()
        .find(|r| r.regex.is_match(selector))
        .map(|r| r.name)
}

fn raw_name(selector: &str) -> String {
    for rule in NAME_RULES.iter() {
        let Some(m) = rule.regex.captures(selector).and_then(|c| c.get(1)) else {
            continue;
        };
        let text = m.as_str();
        return match rule.post {
            Post::Verbatim => text.to_string(),
            Post::Separators => separators_to_spaces(text),
            Post::StripIdSuffix => {
                let stripped = ID_SUFFIXES
                    .iter()
                    .find_map(|s| text.strip_suffix(s))
                    .filter(|s| !s.is_empty())
                    .unwrap_or(text);
                separators_to_spaces(stripped)
            }
        };
    }
    selector.to_string()
}

fn separators_to_spaces(text: &str) -> String {
    text.replace(['-', '_', '.'], " ")
}

/// Strip non-alphanumerics, collapse whitespace, drop one trailing generic word.
fn clean(raw: &str) -> Vec<String> {
    let spaced: String = raw
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let mut words: Vec<String> = spaced.split_whitespace().map(str::to_string).collect();

    if words.len() > 1 {
        let last = words[words.len() - 1].to_lowercase();
        if GENERIC_TRAILING_WORDS.contains(&last.as_str()) {
            words.pop();
        }
    }
    words
}

// ============================================================================
// Derivations
// ============================================================================

/// Human-oriented PascalCase label for a selector.
pub fn readable_name(selector: Option<&str>, kind: ActionKind) -> String {
    if kind == ActionKind::Navigate {
        return "Page".to_string();
    }
    let Some(selector) = selector else {
        return "Element".to_string();
    };

    let words = clean(&raw_name(selector));
    let name = to_pascal_case(&words.join(" "));

    if name.is_empty() {
        "Element".to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Number{}", name)
    } else {
        name
    }
}

/// `UPPER_SNAKE(readable) + "_" + sequence_id`
pub fn constant_name(readable: &str, sequence_id: u32) -> String {
    format!("{}_{}", to_upper_snake(readable), sequence_id)
}

/// Verb-prefixed page-method name.
pub fn method_name(readable: &str, kind: ActionKind) -> String {
    let lower = readable.to_lowercase();
    match kind {
        ActionKind::Navigate => "navigateTo".to_string(),
        ActionKind::Click => format!("click{}", readable),
        ActionKind::Fill => {
            if lower.contains("search") {
                format!("search{}", remove_search(readable))
            } else if lower.contains("email") {
                "enterEmail".to_string()
            } else if lower.contains("password") {
                "enterPassword".to_string()
            } else if lower.contains("username") {
                "enterUsername".to_string()
            } else {
                format!("enter{}", readable)
            }
        }
        ActionKind::Select => format!("select{}", readable),
        ActionKind::Check => {
            if is_toggle(&lower) {
                format!("toggle{}", readable)
            } else {
                format!("check{}", readable)
            }
        }
        ActionKind::Press => format!("pressKeyOn{}", readable),
    }
}

fn is_toggle(lower: &str) -> bool {
    lower.contains("toggle") || lower.contains("switch")
}

/// Drop the first "search" (any case) and re-capitalise what remains.
fn remove_search(readable: &str) -> String {
    let Some(start) = readable.to_ascii_lowercase().find("search") else {
        return readable.to_string();
    };
    let rest = format!("{}{}", &readable[..start], &readable[start + "search".len()..]);
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// Fixed lead-in of parameterized phrases; the value slot follows it.
pub fn value_slot_prefix(kind: ActionKind) -> Option<&'static str> {
    match kind {
        ActionKind::Fill => Some("user enters text"),
        ActionKind::Select => Some("user selects option"),
        _ => None,
    }
}

/// Natural-language step for an action.
pub fn step_phrase(readable: &str, kind: ActionKind) -> String {
    let words = decamelize(readable);
    match kind {
        ActionKind::Navigate => "user navigates to the page".to_string(),
        ActionKind::Click => format!("user clicks on {}", words),
        ActionKind::Fill => format!("user enters text into {}", words),
        ActionKind::Select => format!("user selects option from {}", words),
        ActionKind::Check => {
            if is_toggle(&readable.to_lowercase()) {
                format!("user toggles {}", words)
            } else {
                format!("user checks {}", words)
            }
        }
        ActionKind::Press => format!("user presses key on {}", words),
    }
}

/// Populate all four naming fields of one action.
pub fn resolve(action: &mut Action) {
    let readable = readable_name(action.selector.as_deref(), action.kind);
    action.constant_name = constant_name(&readable, action.sequence_id);
    action.method_name = method_name(&readable, action.kind);
    action.step_phrase = step_phrase(&readable, action.kind);
    action.readable_name = readable;
}

/// Resolve names for every action, in place, once per run.
pub fn resolve_all(actions: &mut [Action]) {
    for action in actions.iter_mut() {
        resolve(action);
    }
}

// ============================================================================
// Step rendering from resolved phrases
// ============================================================================

/// Quote a literal for a Gherkin step line.
pub fn gherkin_literal(value: &str) -> String {
    if value.contains('"') {
        format!("'{}'", value)
    } else {
        format!("\"{}\"", value)
    }
}

fn with_slot(action: &Action, slot: &str) -> String {
    let phrase = &action.step_phrase;
    match value_slot_prefix(action.kind).and_then(|p| phrase.strip_prefix(p).map(|rest| (p, rest))) {
        Some((prefix, rest)) => format!("{} {} {}", prefix, slot, rest.trim_start()),
        None => phrase.clone(),
    }
}

/// Step text as it appears in the specification document.
pub fn step_line(action: &Action) -> String {
    match (&action.value, action.kind.is_parameterized()) {
        (Some(value), true) => with_slot(action, &gherkin_literal(value)),
        (None, true) => with_slot(action, "\"\""),
        _ => action.step_phrase.clone(),
    }
}

/// Cucumber expression matching `step_line` for this action.
pub fn step_expression(action: &Action) -> String {
    if action.kind.is_parameterized() {
        with_slot(action, "{string}")
    } else {
        escape_cucumber_expression(&action.step_phrase)
    }
}

/// Escape characters with special meaning in Cucumber expressions.
pub fn escape_cucumber_expression(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '(' | ')' | '{' | '}' | '/') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Whether a step text (keyword stripped) is bound by this action's expression.
pub fn step_matches(action: &Action, text: &str) -> bool {
    let text = text.trim();
    if !action.kind.is_parameterized() {
        return text == action.step_phrase;
    }
    let Some(prefix) = value_slot_prefix(action.kind) else {
        return false;
    };
    let Some(rest) = action.step_phrase.strip_prefix(prefix).map(str::trim_start) else {
        return false;
    };
    let Some(middle) = text
        .strip_prefix(prefix)
        .and_then(|t| t.strip_suffix(rest))
        .map(str::trim)
    else {
        return false;
    };
    middle.len() >= 2
        && ((middle.starts_with('"') && middle.ends_with('"'))
            || (middle.starts_with('\'') && middle.ends_with('\'')))
}
