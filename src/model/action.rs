use serde::{Deserialize, Serialize};

// ============================================================================
// Recorded interactions
// ============================================================================

/// Interaction kind of a recorded action. Selects the generator branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Navigate,
    Click,
    Fill,
    Select,
    Check,
    Press,
}

impl ActionKind {
    /// Whether the glue handler for this kind receives the recorded value
    /// as a `{string}` parameter.
    pub fn is_parameterized(self) -> bool {
        matches!(self, ActionKind::Fill | ActionKind::Select)
    }
}

/// One parsed interaction.
///
/// `selector` and `value` are filled by the parser; the four naming fields
/// start empty and are populated once by `naming::resolver::resolve_all`.
/// Every generator reads the names from here and never re-derives them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Monotonic id assigned at parse time, starting at 1
    pub sequence_id: u32,

    pub kind: ActionKind,

    /// Locator expression as captured; `None` only for `Navigate`
    pub selector: Option<String>,

    /// Typed text, selected option, key name or navigation URL
    pub value: Option<String>,

    #[serde(default)]
    pub readable_name: String,
    #[serde(default)]
    pub constant_name: String,
    #[serde(default)]
    pub method_name: String,
    #[serde(default)]
    pub step_phrase: String,
}

impl Action {
    pub fn new(sequence_id: u32, kind: ActionKind, selector: Option<String>, value: Option<String>) -> Self {
        Self {
            sequence_id,
            kind,
            selector,
            value,
            readable_name: String::new(),
            constant_name: String::new(),
            method_name: String::new(),
            step_phrase: String::new(),
        }
    }

    pub fn navigate(sequence_id: u32, url: &str) -> Self {
        Self::new(sequence_id, ActionKind::Navigate, None, Some(url.to_string()))
    }

    /// Whether the naming fields have been populated.
    pub fn is_resolved(&self) -> bool {
        !self.readable_name.is_empty() && !self.method_name.is_empty()
    }
}
