use thiserror::Error;

use crate::generate::context::ArtifactKind;

/// Failures of the external ticket source.
#[derive(Debug, Error)]
pub enum TicketError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ticket service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("ticket {0} not found")]
    NotFound(String),

    #[error("malformed ticket payload: {0}")]
    Malformed(String),

    #[error("could not read story file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse story file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("missing ticket service setting: {0}")]
    MissingCredentials(String),
}

/// Fatal failures of a generation run. Each variant names its stage.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("parse stage: could not read recording '{path}': {source}")]
    RecordingRead {
        path: String,
        source: std::io::Error,
    },

    #[error("ticket-fetch stage: could not fetch ticket {key}: {source}")]
    TicketFetch { key: String, source: TicketError },

    #[error("write stage: could not write {artifact} to '{path}': {source}")]
    Write {
        artifact: ArtifactKind,
        path: String,
        source: std::io::Error,
    },

    #[error("render stage: could not serialize {what}: {reason}")]
    Serialize { what: String, reason: String },
}

pub type Result<T> = std::result::Result<T, GenError>;
