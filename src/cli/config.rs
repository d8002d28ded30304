use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::pipeline::writer::OutputLayout;
use crate::ticket::jira::JiraSettings;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "stepweaver",
    version,
    about = "Generate page objects, feature files and step definitions from recorded browser sessions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: stepweaver.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append a JSONL trace of the run to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate artifacts from a recorded browser session
    Record {
        /// Recording file, or "-" for stdin
        #[arg(long)]
        recording: String,

        /// Feature name, e.g. "Login"
        #[arg(long)]
        feature: String,

        /// URL the page module navigates to
        #[arg(long, default_value = "")]
        base_url: String,

        /// Requirement identifier tagged on the feature file
        #[arg(long, default_value = "")]
        requirement: String,

        /// Output root (overrides config)
        #[arg(long)]
        output_root: Option<String>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate artifacts from a ticket
    Ticket {
        /// Ticket key, e.g. "PROJ-123"
        #[arg(long)]
        key: String,

        /// Read the story from a YAML/JSON file instead of the ticket service
        #[arg(long)]
        story_file: Option<String>,

        /// URL the page module navigates to (overrides config)
        #[arg(long)]
        base_url: Option<String>,

        /// Output root (overrides config)
        #[arg(long)]
        output_root: Option<String>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a recording and print the named actions as YAML
    Parse {
        /// Recording file, or "-" for stdin
        #[arg(long)]
        recording: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `stepweaver.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub ticket: TicketConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_root")]
    pub root: String,

    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    #[serde(default = "default_features_dir")]
    pub features_dir: String,

    #[serde(default = "default_steps_dir")]
    pub steps_dir: String,

    #[serde(default = "default_page_package")]
    pub page_package: String,

    #[serde(default = "default_steps_package")]
    pub steps_package: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            pages_dir: default_pages_dir(),
            features_dir: default_features_dir(),
            steps_dir: default_steps_dir(),
            page_package: default_page_package(),
            steps_package: default_steps_package(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JiraConfig {
    pub base_url: Option<String>,
    pub user: Option<String>,
    pub token: Option<String>,

    /// Custom field holding acceptance criteria, e.g. "customfield_10020"
    pub acceptance_criteria_field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TicketConfig {
    /// URL used for ticket-mode page modules
    pub base_url: Option<String>,
}

// Serde default helpers
fn default_root() -> String { ".".to_string() }
fn default_pages_dir() -> String { "src/test/java/pages".to_string() }
fn default_features_dir() -> String { "src/test/resources/features".to_string() }
fn default_steps_dir() -> String { "src/test/java/steps".to_string() }
fn default_page_package() -> String { "pages".to_string() }
fn default_steps_package() -> String { "steps".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("stepweaver.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Output layout with an optional CLI root override.
pub fn build_output_layout(config: &OutputConfig, output_root: Option<&str>) -> OutputLayout {
    OutputLayout {
        root: output_root.unwrap_or(&config.root).into(),
        pages_dir: config.pages_dir.clone(),
        features_dir: config.features_dir.clone(),
        steps_dir: config.steps_dir.clone(),
    }
}

/// Ticket service settings: config file first, then `JIRA_*` environment
/// variables through `env`.
pub fn build_jira_settings(config: &JiraConfig, env: impl Fn(&str) -> Option<String>) -> JiraSettings {
    let pick = |value: &Option<String>, var: &str| {
        value
            .clone()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| env(var).filter(|v| !v.trim().is_empty()))
    };

    JiraSettings {
        base_url: pick(&config.base_url, "JIRA_BASE_URL").unwrap_or_default(),
        user: pick(&config.user, "JIRA_USER"),
        token: pick(&config.token, "JIRA_TOKEN"),
        acceptance_criteria_field: pick(&config.acceptance_criteria_field, "JIRA_ACCEPTANCE_CRITERIA_FIELD"),
    }
}

/// Map `-v` count to a log filter: 0 warn, 1 info, 2 debug, 3+ trace.
pub fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}
