use std::collections::{HashMap, HashSet};
use std::fmt;

use log::info;
use serde::Serialize;

// ============================================================================
// Run-scoped duplicate gate
// ============================================================================

/// Which generated artifact a decision belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    PageModule,
    Specification,
    Glue,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::PageModule => "page module",
            ArtifactKind::Specification => "specification document",
            ArtifactKind::Glue => "glue module",
        };
        f.write_str(name)
    }
}

/// Kind of unit checked by the deduplicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Selector,
    Constant,
    Method,
    Step,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitKind::Selector => "selector",
            UnitKind::Constant => "constant",
            UnitKind::Method => "method",
            UnitKind::Step => "step",
        };
        f.write_str(name)
    }
}

/// A unit that was dropped because an identical one was already emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suppression {
    pub artifact: ArtifactKind,
    pub unit: UnitKind,
    pub value: String,
    pub sequence_id: Option<u32>,
}

/// Membership sets for one artifact. Each `should_emit_*` answers true
/// exactly once per distinct value.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    selectors: HashSet<String>,
    constants: HashSet<String>,
    methods: HashSet<String>,
    steps: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_emit_selector(&mut self, selector: &str) -> bool {
        self.selectors.insert(selector.to_string())
    }

    pub fn should_emit_constant(&mut self, name: &str) -> bool {
        self.constants.insert(name.to_string())
    }

    pub fn should_emit_method(&mut self, name: &str) -> bool {
        self.methods.insert(name.to_string())
    }

    pub fn should_emit_step(&mut self, phrase: &str) -> bool {
        self.steps.insert(phrase.to_string())
    }

    /// Dispatch on unit kind.
    pub fn should_emit(&mut self, unit: UnitKind, value: &str) -> bool {
        match unit {
            UnitKind::Selector => self.should_emit_selector(value),
            UnitKind::Constant => self.should_emit_constant(value),
            UnitKind::Method => self.should_emit_method(value),
            UnitKind::Step => self.should_emit_step(value),
        }
    }

    /// Whether a value has been emitted, without recording it.
    pub fn has_emitted(&self, unit: UnitKind, value: &str) -> bool {
        match unit {
            UnitKind::Selector => self.selectors.contains(value),
            UnitKind::Constant => self.constants.contains(value),
            UnitKind::Method => self.methods.contains(value),
            UnitKind::Step => self.steps.contains(value),
        }
    }
}

/// All state owned by one generation run.
///
/// Constructed once per run and passed by `&mut` to every generator. Holds
/// one `Deduplicator` per artifact, the selector -> constant binding that
/// keeps page methods pointing at declared constants, and the list of
/// suppressed duplicates reported back to the caller.
#[derive(Debug, Default)]
pub struct GenerationContext {
    page_module: Deduplicator,
    specification: Deduplicator,
    glue: Deduplicator,
    selector_constants: HashMap<String, String>,
    suppressions: Vec<Suppression>,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The deduplicator for one artifact.
    pub fn gate(&mut self, artifact: ArtifactKind) -> &mut Deduplicator {
        match artifact {
            ArtifactKind::PageModule => &mut self.page_module,
            ArtifactKind::Specification => &mut self.specification,
            ArtifactKind::Glue => &mut self.glue,
        }
    }

    /// Ask the artifact's gate; on a repeat, record and log the skip.
    pub fn admit(
        &mut self,
        artifact: ArtifactKind,
        unit: UnitKind,
        value: &str,
        sequence_id: Option<u32>,
    ) -> bool {
        if self.gate(artifact).should_emit(unit, value) {
            return true;
        }

        match sequence_id {
            Some(id) => info!("skipping duplicate {} '{}' in {} (action #{})", unit, value, artifact, id),
            None => info!("skipping duplicate {} '{}' in {}", unit, value, artifact),
        }
        self.suppressions.push(Suppression {
            artifact,
            unit,
            value: value.to_string(),
            sequence_id,
        });
        false
    }

    /// Record which constant declares a selector. First binding wins.
    pub fn bind_constant(&mut self, selector: &str, constant: &str) {
        self.selector_constants
            .entry(selector.to_string())
            .or_insert_with(|| constant.to_string());
    }

    pub fn constant_for(&self, selector: &str) -> Option<&str> {
        self.selector_constants.get(selector).map(String::as_str)
    }

    pub fn suppressions(&self) -> &[Suppression] {
        &self.suppressions
    }

    pub fn into_suppressions(self) -> Vec<Suppression> {
        self.suppressions
    }
}
