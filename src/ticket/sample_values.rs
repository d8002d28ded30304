use crate::model::action::ActionKind;

/// Derive a sensible fill value from an element label.
pub fn guess_value(label: &str) -> String {
    let l = label.to_lowercase();

    // Label-based heuristics (checked in order)
    if l.contains("email") {
        return "user@example.com".into();
    }
    if l.contains("password") {
        return "TestPass123!".into();
    }
    if l.contains("phone") || l.contains("tel") || l.contains("mobile") {
        return "555-0100".into();
    }
    if l.contains("url") || l.contains("website") {
        return "https://example.com".into();
    }
    if l.contains("zip") || l.contains("postal") {
        return "90210".into();
    }
    if l.contains("username") || l.contains("user") {
        return "testuser".into();
    }
    if l.contains("first") {
        return "Jane".into();
    }
    if l.contains("last") || l.contains("surname") {
        return "Doe".into();
    }
    if l.contains("name") {
        return "Jane Doe".into();
    }
    if l.contains("address") {
        return "1 Main Street".into();
    }
    if l.contains("search") || l.contains("query") {
        return "test query".into();
    }
    if l.contains("date") {
        return "2025-01-15".into();
    }
    if l.contains("number") || l.contains("amount") || l.contains("quantity") {
        return "42".into();
    }

    "test".into()
}

/// Option picked for a synthetic select.
pub fn guess_option(label: &str) -> String {
    let l = label.to_lowercase();
    if l.contains("country") {
        return "United States".into();
    }
    "Option 1".into()
}

/// Recorded value for a synthetic action of the given kind.
pub fn sample_value(label: &str, kind: ActionKind) -> Option<String> {
    match kind {
        ActionKind::Fill => Some(guess_value(label)),
        ActionKind::Select => Some(guess_option(label)),
        ActionKind::Press => Some("Enter".into()),
        ActionKind::Navigate | ActionKind::Click | ActionKind::Check => None,
    }
}
