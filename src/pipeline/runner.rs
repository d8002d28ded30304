use std::io::Read;

use log::{error, info};
use serde::Serialize;

use crate::error::{GenError, Result, TicketError};
use crate::generate::context::{GenerationContext, Suppression};
use crate::generate::document::HandlerBody;
use crate::generate::target::GenerationTarget;
use crate::generate::{GeneratedArtifacts, generate_artifacts, generate_requirement_artifacts};
use crate::model::action::Action;
use crate::model::requirement::TestRequirement;
use crate::naming::resolver::resolve_all;
use crate::pipeline::writer::{OutputLayout, WrittenArtifact, write_artifacts};
use crate::recording::parser::{ParseWarning, RecordingParser};
use crate::ticket::story::{Story, TicketSource};
use crate::ticket::synthesizer::{RequirementInput, feature_name_from_summary, synthesize_with_actions};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

// ============================================================================
// Run modes and inputs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Recording,
    Ticket,
}

/// Caller-supplied settings for a recording run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingRequest {
    pub feature: String,
    pub base_url: String,
    pub requirement_key: String,
}

/// Read a recording from a file path, or from stdin when the path is "-".
pub fn read_recording(path: &str) -> Result<String> {
    let read = if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        std::fs::read_to_string(path)
    };

    read.map_err(|source| GenError::RecordingRead {
        path: path.to_string(),
        source,
    })
}

// ============================================================================
// Planning (pure)
// ============================================================================

/// Everything a run decided before touching the filesystem.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub mode: RunMode,
    pub target: GenerationTarget,
    pub actions: Vec<Action>,
    pub requirement: Option<TestRequirement>,
    pub artifacts: GeneratedArtifacts,
    pub warnings: Vec<ParseWarning>,
    pub suppressions: Vec<Suppression>,
}

/// Parse, name and generate from recording text.
pub fn plan_recording(raw: &str, target: GenerationTarget) -> GenerationPlan {
    let fallback = if target.base_url.is_empty() { "/" } else { target.base_url.as_str() };
    let outcome = RecordingParser::default().fallback_url(fallback).parse(raw);

    let mut actions = outcome.actions;
    resolve_all(&mut actions);

    let mut ctx = GenerationContext::new();
    let artifacts = generate_artifacts(&actions, &target, &mut ctx);

    GenerationPlan {
        mode: RunMode::Recording,
        target,
        actions,
        requirement: None,
        artifacts,
        warnings: outcome.warnings,
        suppressions: ctx.into_suppressions(),
    }
}

/// Synthesize a requirement from a story and generate from it.
pub fn plan_ticket(story: &Story, base_url: &str, packages: (&str, &str)) -> GenerationPlan {
    let (requirement, actions) = synthesize_with_actions(&RequirementInput::from(story));

    let target = GenerationTarget::new(&feature_name_from_summary(&story.summary), base_url, &story.key)
        .with_packages(packages.0, packages.1);

    let mut ctx = GenerationContext::new();
    let artifacts = generate_requirement_artifacts(&requirement, &actions, &target, &mut ctx);

    GenerationPlan {
        mode: RunMode::Ticket,
        target,
        actions,
        requirement: Some(requirement),
        artifacts,
        warnings: Vec::new(),
        suppressions: ctx.into_suppressions(),
    }
}

// ============================================================================
// Summary
// ============================================================================

/// What a finished run produced, for the console and `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub mode: RunMode,
    pub feature: String,
    pub requirement_key: String,

    pub actions: usize,
    pub constants: usize,
    pub methods: usize,
    pub behavior_steps: usize,
    pub scenarios: usize,
    pub handlers: usize,
    pub pending_handlers: usize,

    pub warnings: Vec<ParseWarning>,
    pub suppressions: Vec<Suppression>,
    pub artifacts: Vec<WrittenArtifact>,
}

impl GenerationSummary {
    fn new(plan: &GenerationPlan, artifacts: Vec<WrittenArtifact>) -> Self {
        let generated = &plan.artifacts;
        Self {
            mode: plan.mode,
            feature: plan.target.feature.clone(),
            requirement_key: plan.target.requirement_key.clone(),
            actions: plan.actions.len(),
            constants: generated.page_module.constants.len(),
            methods: generated.page_module.methods.len(),
            behavior_steps: generated.specification.behavior_lines().count(),
            scenarios: generated.specification.scenarios.len(),
            handlers: generated.glue.handlers.len(),
            pending_handlers: generated
                .glue
                .handlers
                .iter()
                .filter(|h| h.body == HandlerBody::Pending)
                .count(),
            warnings: plan.warnings.clone(),
            suppressions: plan.suppressions.clone(),
            artifacts,
        }
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Runs plans to disk and reports what happened.
pub struct Generator {
    layout: OutputLayout,
    page_package: String,
    steps_package: String,
    tracer: TraceLogger,
}

impl Generator {
    pub fn new(layout: OutputLayout) -> Self {
        Self {
            layout,
            page_package: "pages".to_string(),
            steps_package: "steps".to_string(),
            tracer: TraceLogger::disabled(),
        }
    }

    pub fn with_packages(mut self, page_package: &str, steps_package: &str) -> Self {
        self.page_package = page_package.to_string();
        self.steps_package = steps_package.to_string();
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Recording text -> three files.
    pub fn generate_from_recording(&self, raw: &str, request: &RecordingRequest) -> Result<GenerationSummary> {
        let target = GenerationTarget::new(&request.feature, &request.base_url, &request.requirement_key)
            .with_packages(&self.page_package, &self.steps_package);

        let plan = plan_recording(raw, target);
        for warning in &plan.warnings {
            self.tracer.log(&TraceEvent::parse_warning(warning));
        }
        info!(
            "parsed {} action(s) for feature {}",
            plan.actions.len(),
            plan.target.feature
        );

        self.write(plan)
    }

    /// Ticket key -> story -> requirement -> three files.
    ///
    /// A failed fetch aborts before anything is written.
    pub fn generate_from_ticket(
        &self,
        source: &dyn TicketSource,
        key: &str,
        base_url: &str,
    ) -> Result<GenerationSummary> {
        let story = source.fetch(key).and_then(require_text).map_err(|source| {
            let err = GenError::TicketFetch {
                key: key.to_string(),
                source,
            };
            self.trace_failure("ticket_fetch", &err);
            err
        })?;
        info!("fetched ticket {}: {}", story.key, story.summary);

        let plan = plan_ticket(&story, base_url, (&self.page_package, &self.steps_package));
        if let Some(requirement) = &plan.requirement {
            info!(
                "synthesized {} scenario(s) from {} element(s)",
                requirement.scenarios.len(),
                requirement.elements.len()
            );
        }

        self.write(plan)
    }

    fn write(&self, plan: GenerationPlan) -> Result<GenerationSummary> {
        for suppression in &plan.suppressions {
            self.tracer.log(&TraceEvent::suppressed(suppression));
        }

        let paths = self.layout.resolve(&plan.target);
        let rendered = plan.artifacts.render();
        let written = write_artifacts(&paths, &rendered).inspect_err(|e| self.trace_failure("write", e))?;

        for artifact in &written {
            info!("wrote {} ({} bytes) to {}", artifact.kind, artifact.bytes, artifact.path.display());
            self.tracer.log(
                &TraceEvent::now("artifact_written", "write")
                    .with_artifact(artifact.kind)
                    .with_detail(artifact.path.display())
                    .with_fingerprint(&artifact.fingerprint),
            );
        }

        Ok(GenerationSummary::new(&plan, written))
    }

    fn trace_failure(&self, stage: &str, err: &GenError) {
        error!("{}", err);
        self.tracer
            .log(&TraceEvent::now("run_failed", stage).with_detail(err));
    }
}

/// A story with no text at all gives the synthesizer nothing to work from.
fn require_text(story: Story) -> std::result::Result<Story, TicketError> {
    let empty = story.summary.trim().is_empty()
        && story.description.trim().is_empty()
        && story.acceptance_criteria.iter().all(|c| c.trim().is_empty());
    if empty {
        return Err(TicketError::Malformed(format!("ticket {} has no text", story.key)));
    }
    Ok(story)
}
