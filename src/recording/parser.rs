use log::{debug, warn};
use serde::Serialize;

use crate::model::action::Action;
use crate::recording::patterns::{CALL_PATTERNS, CALL_SHAPED, CallPattern, Extracted};

// ============================================================================
// Recording parser
// ============================================================================

/// Non-fatal conditions found while parsing a recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum ParseWarning {
    /// No recognisable interaction; a synthetic navigation was substituted
    Empty,

    /// A line names an interaction but matches no known call shape
    UnrecognizedCall { line: usize, text: String },
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::Empty => {
                write!(f, "no recognisable actions; falling back to a single navigation")
            }
            ParseWarning::UnrecognizedCall { line, text } => {
                write!(f, "line {}: unrecognised call dropped: {}", line, text)
            }
        }
    }
}

/// Ordered actions plus any warnings raised while producing them.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub actions: Vec<Action>,
    pub warnings: Vec<ParseWarning>,
}

impl ParseOutcome {
    pub fn fell_back(&self) -> bool {
        self.warnings.contains(&ParseWarning::Empty)
    }
}

/// Line-oriented scanner over the ordered call-shape table.
pub struct RecordingParser<'a> {
    patterns: &'a [CallPattern],
    fallback_url: String,
}

impl Default for RecordingParser<'static> {
    fn default() -> Self {
        Self {
            patterns: &CALL_PATTERNS,
            fallback_url: "/".to_string(),
        }
    }
}

impl<'a> RecordingParser<'a> {
    /// Parser over a custom pattern table (first match wins, in slice order).
    pub fn with_patterns(patterns: &'a [CallPattern]) -> Self {
        Self {
            patterns,
            fallback_url: "/".to_string(),
        }
    }

    /// URL used by the synthetic navigation when nothing is recognised.
    pub fn fallback_url(mut self, url: &str) -> Self {
        self.fallback_url = url.to_string();
        self
    }

    /// Parse raw recording text into ordered actions with empty names.
    ///
    /// Never fails: an input without any recognisable line yields exactly one
    /// synthetic `Navigate` action and a `ParseWarning::Empty`.
    pub fn parse(&self, raw: &str) -> ParseOutcome {
        let mut actions = Vec::new();
        let mut warnings = Vec::new();
        let mut next_id: u32 = 1;

        for (index, raw_line) in raw.lines().enumerate() {
            let line = raw_line.trim();
            if is_ignorable(line) {
                continue;
            }

            match self.match_line(line) {
                Some((pattern, extracted)) => {
                    debug!("line {} matched {}", index + 1, pattern.name);
                    actions.push(Action::new(
                        next_id,
                        pattern.kind,
                        extracted.selector,
                        extracted.value,
                    ));
                    next_id += 1;
                }
                None if CALL_SHAPED.is_match(line) => {
                    let warning = ParseWarning::UnrecognizedCall {
                        line: index + 1,
                        text: line.to_string(),
                    };
                    warn!("{}", warning);
                    warnings.push(warning);
                }
                None => debug!("line {} skipped: {}", index + 1, line),
            }
        }

        if actions.is_empty() {
            warn!("{}", ParseWarning::Empty);
            warnings.push(ParseWarning::Empty);
            actions.push(Action::navigate(1, &self.fallback_url));
        }

        ParseOutcome { actions, warnings }
    }

    fn match_line(&self, line: &str) -> Option<(&CallPattern, Extracted)> {
        self.patterns
            .iter()
            .find_map(|p| p.extract(line).map(|e| (p, e)))
    }
}

/// Parse with the built-in table.
pub fn parse_recording(raw: &str) -> ParseOutcome {
    RecordingParser::default().parse(raw)
}

/// Blank lines, comments and import/package declarations.
fn is_ignorable(line: &str) -> bool {
    line.is_empty()
        || line.starts_with("//")
        || line.starts_with('#')
        || line.starts_with("/*")
        || line.starts_with('*')
        || line.starts_with("import ")
        || line.starts_with("package ")
        || (line.starts_with("from ") && line.contains(" import "))
}
