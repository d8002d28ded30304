use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TicketError;
use crate::generate::document::StepKeyword;

/// Ticket fields consumed by the requirement synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    #[serde(default)]
    pub key: String,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_issue_type")]
    pub issue_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
}

fn default_issue_type() -> String {
    "Story".to_string()
}

/// Anything that can supply a story for a ticket key.
///
/// Retries, if any, belong to the implementation; the generator calls once.
pub trait TicketSource {
    fn fetch(&self, key: &str) -> Result<Story, TicketError>;
}

/// Offline ticket source reading a single story from a YAML or JSON file.
pub struct FileTicketSource {
    path: PathBuf,
}

impl FileTicketSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TicketSource for FileTicketSource {
    fn fetch(&self, key: &str) -> Result<Story, TicketError> {
        let content = std::fs::read_to_string(&self.path)?;
        let is_json = self.path.extension().is_some_and(|e| e == "json");
        let mut story: Story = if is_json {
            serde_json::from_str(&content).map_err(|e| TicketError::Malformed(e.to_string()))?
        } else {
            serde_yaml::from_str(&content)?
        };

        if story.key.is_empty() {
            story.key = key.to_string();
        } else if !key.is_empty() && story.key != key {
            return Err(TicketError::NotFound(key.to_string()));
        }
        Ok(story)
    }
}

// ============================================================================
// Acceptance-criteria text splitting
// ============================================================================

/// Split free-form acceptance-criteria text into individual criteria.
///
/// Blocks are separated by blank lines. A block containing Given/When/Then
/// lines stays whole; otherwise each bullet or numbered line is one criterion.
pub fn split_criteria(text: &str) -> Vec<String> {
    let mut criteria = Vec::new();

    for block in blocks(text) {
        let has_gherkin = block.iter().any(|l| StepKeyword::split(l).is_some());
        if has_gherkin {
            criteria.push(block.join("\n"));
            continue;
        }

        let mut current: Option<String> = None;
        for line in block {
            match strip_bullet(line) {
                Some(item) => {
                    if let Some(done) = current.take() {
                        criteria.push(done);
                    }
                    current = Some(item.to_string());
                }
                None => match current.as_mut() {
                    Some(c) => {
                        c.push(' ');
                        c.push_str(line);
                    }
                    None => current = Some(line.to_string()),
                },
            }
        }
        if let Some(done) = current {
            criteria.push(done);
        }
    }

    criteria.retain(|c| !c.trim().is_empty());
    criteria
}

fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// "- item", "* item", "• item", "# item", "1. item", "2) item" -> "item"
fn strip_bullet(line: &str) -> Option<&str> {
    for marker in ["- ", "* ", "• ", "# "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.trim());
        }
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(item) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(item.trim());
        }
    }
    None
}

/// Pull an "Acceptance Criteria" section out of a ticket description.
///
/// The section runs from the heading line to the next heading-like line
/// (one ending in ':' or starting with "h<n>.") or the end of the text.
pub fn criteria_section(description: &str) -> Option<String> {
    let lines: Vec<&str> = description.lines().collect();
    let start = lines.iter().position(|l| is_criteria_heading(l))?;

    let mut section = Vec::new();
    for line in &lines[start + 1..] {
        let trimmed = line.trim();
        if is_heading(trimmed) {
            break;
        }
        section.push(trimmed);
    }
    let text = section.join("\n");
    if text.trim().is_empty() { None } else { Some(text) }
}

fn is_criteria_heading(line: &str) -> bool {
    let lower = line.trim().trim_start_matches(|c: char| c == '#' || c == '*').to_lowercase();
    let lower = lower
        .strip_prefix("h1.")
        .or_else(|| lower.strip_prefix("h2."))
        .or_else(|| lower.strip_prefix("h3."))
        .unwrap_or(&lower)
        .trim();
    let lower = lower.trim_end_matches(|c: char| c == ':' || c == '*').trim();
    lower == "acceptance criteria" || lower == "acceptance criterion" || lower == "ac"
}

fn is_heading(line: &str) -> bool {
    let lower = line.to_lowercase();
    (lower.starts_with('h') && lower.chars().nth(1).is_some_and(|c| c.is_ascii_digit()) && lower.chars().nth(2) == Some('.'))
        || (line.ends_with(':') && StepKeyword::split(line).is_none() && !line.starts_with(['-', '*']))
}
