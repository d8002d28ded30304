use crate::pipeline::runner::{GenerationSummary, RunMode};

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a run summary for terminal output.
///
/// Produces output like:
/// ```text
/// === Generated: Login (recording, REQ-1) ===
///
/// ✓ page module             src/test/java/pages/LoginPage.java  (1c2f9a0e)
/// ✓ specification document  src/test/resources/features/login.feature  (77ab31d2)
/// ✓ glue module             src/test/java/steps/LoginSteps.java  (0e9d4c11)
///
///   4 actions, 3 constants, 3 methods, 3 steps, 5 handlers
///   [SKIP] duplicate method 'clickLogin' in page module (action #4)
///
/// === Done: 3 artifacts, 1 duplicate skipped, 0 warnings ===
/// ```
pub fn format_generation_summary(summary: &GenerationSummary) -> String {
    let mut out = String::new();

    let mode = match summary.mode {
        RunMode::Recording => "recording",
        RunMode::Ticket => "ticket",
    };
    if summary.requirement_key.is_empty() {
        out.push_str(&format!("=== Generated: {} ({}) ===\n\n", summary.feature, mode));
    } else {
        out.push_str(&format!(
            "=== Generated: {} ({}, {}) ===\n\n",
            summary.feature, mode, summary.requirement_key
        ));
    }

    for artifact in &summary.artifacts {
        out.push_str(&format!(
            "\u{2713} {:<24}{}  ({})\n",
            artifact.kind.to_string(),
            artifact.path.display(),
            short_fingerprint(&artifact.fingerprint)
        ));
    }

    out.push_str(&format!(
        "\n  {} actions, {} constants, {} methods, {} steps, {} handlers",
        summary.actions, summary.constants, summary.methods, summary.behavior_steps, summary.handlers
    ));
    if summary.mode == RunMode::Ticket {
        out.push_str(&format!(", {} scenarios", summary.scenarios));
    }
    out.push('\n');

    if summary.pending_handlers > 0 {
        out.push_str(&format!(
            "  [TODO] {} step(s) have no page method and were left pending\n",
            summary.pending_handlers
        ));
    }

    for warning in &summary.warnings {
        out.push_str(&format!("  [WARN] {}\n", warning));
    }

    for s in &summary.suppressions {
        match s.sequence_id {
            Some(id) => out.push_str(&format!(
                "  [SKIP] duplicate {} '{}' in {} (action #{})\n",
                s.unit, s.value, s.artifact, id
            )),
            None => out.push_str(&format!(
                "  [SKIP] duplicate {} '{}' in {}\n",
                s.unit, s.value, s.artifact
            )),
        }
    }

    out.push_str(&format!(
        "\n=== Done: {} artifacts, {} {} skipped, {} {} ===\n",
        summary.artifacts.len(),
        summary.suppressions.len(),
        plural(summary.suppressions.len(), "duplicate", "duplicates"),
        summary.warnings.len(),
        plural(summary.warnings.len(), "warning", "warnings"),
    ));

    out
}

fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint.get(..8).unwrap_or(fingerprint)
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
