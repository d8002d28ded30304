use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::generate::context::Suppression;
use crate::recording::parser::ParseWarning;

/// One line of the JSONL generation trace.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub event: String,
    pub stage: String,

    pub detail: Option<String>,
    pub artifact: Option<String>,
    pub sequence_id: Option<u32>,
    pub fingerprint: Option<String>,
}

impl TraceEvent {
    pub fn now(event: &str, stage: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            event: event.to_string(),
            stage: stage.to_string(),
            detail: None,
            artifact: None,
            sequence_id: None,
            fingerprint: None,
        }
    }

    pub fn parse_warning(warning: &ParseWarning) -> Self {
        Self::now("parse_warning", "parse").with_detail(warning)
    }

    pub fn suppressed(suppression: &Suppression) -> Self {
        Self::now("suppressed", "generate")
            .with_detail(format!("{} '{}'", suppression.unit, suppression.value))
            .with_artifact(suppression.artifact)
            .with_sequence(suppression.sequence_id)
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn with_artifact(mut self, artifact: impl ToString) -> Self {
        self.artifact = Some(artifact.to_string());
        self
    }

    pub fn with_sequence(mut self, sequence_id: Option<u32>) -> Self {
        self.sequence_id = sequence_id;
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: &str) -> Self {
        self.fingerprint = Some(fingerprint.to_string());
        self
    }
}
