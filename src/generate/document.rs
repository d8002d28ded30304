use serde::Serialize;

use crate::model::action::ActionKind;

// ============================================================================
// Page module tree
// ============================================================================

/// `private static final String NAME = "selector";`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantDecl {
    pub name: String,
    pub selector: String,
    pub sequence_id: u32,
}

/// The fixed set of operations a page method may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Primitive {
    Click,
    Fill,
    SelectOption,
    Check,
    Press,
}

impl Primitive {
    pub fn for_kind(kind: ActionKind) -> Option<Self> {
        match kind {
            ActionKind::Click => Some(Primitive::Click),
            ActionKind::Fill => Some(Primitive::Fill),
            ActionKind::Select => Some(Primitive::SelectOption),
            ActionKind::Check => Some(Primitive::Check),
            ActionKind::Press => Some(Primitive::Press),
            ActionKind::Navigate => None,
        }
    }

    /// Name of the method's single `String` parameter, if any.
    pub fn parameter(self) -> Option<&'static str> {
        match self {
            Primitive::Fill => Some("text"),
            Primitive::SelectOption => Some("option"),
            Primitive::Press => Some("key"),
            Primitive::Click | Primitive::Check => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMethod {
    pub name: String,
    pub constant: String,
    pub primitive: Primitive,
    pub sequence_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationMethod {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageModule {
    pub package: String,
    pub class_name: String,
    pub navigation: NavigationMethod,
    pub constants: Vec<ConstantDecl>,
    pub methods: Vec<PageMethod>,
}

impl PageModule {
    pub fn has_method(&self, name: &str) -> bool {
        self.navigation.name == name || self.methods.iter().any(|m| m.name == name)
    }

    pub fn has_constant(&self, name: &str) -> bool {
        self.constants.iter().any(|c| c.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&PageMethod> {
        self.methods.iter().find(|m| m.name == name)
    }
}

// ============================================================================
// Specification document tree
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepKeyword {
    Given,
    When,
    Then,
    And,
    But,
}

impl StepKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            StepKeyword::Given => "Given",
            StepKeyword::When => "When",
            StepKeyword::Then => "Then",
            StepKeyword::And => "And",
            StepKeyword::But => "But",
        }
    }

    /// Split "When user clicks" into (When, "user clicks").
    pub fn split(line: &str) -> Option<(StepKeyword, &str)> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace)?;
        let keyword = match word {
            "Given" => StepKeyword::Given,
            "When" => StepKeyword::When,
            "Then" => StepKeyword::Then,
            "And" => StepKeyword::And,
            "But" => StepKeyword::But,
            _ => return None,
        };
        Some((keyword, rest.trim_start()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepLine {
    /// `None` keeps a free-text step exactly as supplied
    pub keyword: Option<StepKeyword>,
    pub text: String,

    /// Source action for behavior lines; `None` for precondition/closing/free text
    pub sequence_id: Option<u32>,
}

impl StepLine {
    pub fn new(keyword: StepKeyword, text: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword),
            text: text.into(),
            sequence_id: None,
        }
    }

    pub fn behavior(keyword: StepKeyword, text: impl Into<String>, sequence_id: u32) -> Self {
        Self {
            keyword: Some(keyword),
            text: text.into(),
            sequence_id: Some(sequence_id),
        }
    }

    /// Keep a scenario step string verbatim, splitting off its keyword if present.
    pub fn verbatim(raw: &str) -> Self {
        match StepKeyword::split(raw) {
            Some((keyword, text)) => Self::new(keyword, text),
            None => Self {
                keyword: None,
                text: raw.trim().to_string(),
                sequence_id: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioBlock {
    pub name: String,
    pub steps: Vec<StepLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecificationDocument {
    pub tags: Vec<String>,
    pub feature: String,
    pub description: Vec<String>,
    pub scenarios: Vec<ScenarioBlock>,
}

impl SpecificationDocument {
    /// Behavior lines (those tied to an action) across all scenarios, in order.
    pub fn behavior_lines(&self) -> impl Iterator<Item = &StepLine> {
        self.scenarios
            .iter()
            .flat_map(|s| s.steps.iter())
            .filter(|l| l.sequence_id.is_some())
    }

    pub fn all_steps(&self) -> impl Iterator<Item = &StepLine> {
        self.scenarios.iter().flat_map(|s| s.steps.iter())
    }
}

// ============================================================================
// Glue module tree
// ============================================================================

/// What a glue handler passes to its page method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HandlerArgument {
    None,
    /// Forward the `{string}` captured by the step expression
    Parameter,
    /// Pass the recorded value as a literal
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HandlerBody {
    /// Delegate to exactly one page method
    Call { method: String, argument: HandlerArgument },
    /// Step without a bound page method
    Pending,
    /// Closing verification placeholder
    PassThrough,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepHandler {
    pub keyword: StepKeyword,
    pub expression: String,
    pub function_name: String,
    pub body: HandlerBody,
}

impl StepHandler {
    pub fn called_method(&self) -> Option<&str> {
        match &self.body {
            HandlerBody::Call { method, .. } => Some(method),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlueModule {
    pub package: String,
    pub class_name: String,
    pub page_package: String,
    pub page_class: String,
    pub page_field: String,
    pub handlers: Vec<StepHandler>,
}

impl GlueModule {
    pub fn called_methods(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().filter_map(StepHandler::called_method)
    }

    pub fn has_pending(&self) -> bool {
        self.handlers.iter().any(|h| h.body == HandlerBody::Pending)
    }

    pub fn uses_keyword(&self, keyword: StepKeyword) -> bool {
        self.handlers.iter().any(|h| h.keyword == keyword)
    }
}
