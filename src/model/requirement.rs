use serde::{Deserialize, Serialize};

use crate::model::action::ActionKind;

// ============================================================================
// Ticket-driven requirement model
// ============================================================================

/// A UI element detected in requirement text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageElement {
    /// PascalCase element name, e.g. "Username" or "LoginButton"
    pub name: String,
    pub interaction_kind: ActionKind,
    pub description: String,
}

/// A named scenario whose steps are emitted verbatim (keyword included).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<String>,
}

/// Which kinds of verification the generated suite should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOptions {
    pub functional: bool,
    pub ui: bool,
    pub performance: bool,
    pub logging: bool,
    pub performance_threshold_ms: u32,
}

impl Default for VerificationOptions {
    fn default() -> Self {
        Self {
            functional: true,
            ui: false,
            performance: false,
            logging: false,
            performance_threshold_ms: 3000,
        }
    }
}

impl VerificationOptions {
    /// Gherkin tags for the enabled options, in a fixed order.
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.functional {
            tags.push("@functional");
        }
        if self.ui {
            tags.push("@ui");
        }
        if self.performance {
            tags.push("@performance");
        }
        if self.logging {
            tags.push("@logging");
        }
        tags
    }
}

/// Element + scenario + verification structure produced from a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRequirement {
    pub name: String,
    pub description: String,
    pub source_ticket_key: Option<String>,
    pub elements: Vec<PageElement>,
    pub scenarios: Vec<Scenario>,
    pub verification: VerificationOptions,
}
