use log::info;

use crate::cli::config::{AppConfig, build_jira_settings, build_output_layout};
use crate::error::{GenError, Result};
use crate::naming::resolver::resolve_all;
use crate::pipeline::runner::{GenerationSummary, Generator, RecordingRequest, read_recording};
use crate::recording::parser::parse_recording;
use crate::report::console::format_generation_summary;
use crate::ticket::jira::JiraClient;
use crate::ticket::story::{FileTicketSource, TicketSource};
use crate::trace::logger::TraceLogger;

// ============================================================================
// record subcommand
// ============================================================================

pub fn cmd_record(
    config: &AppConfig,
    tracer: TraceLogger,
    recording_path: &str,
    request: &RecordingRequest,
    output_root: Option<&str>,
    json: bool,
) -> Result<()> {
    let raw = read_recording(recording_path)?;
    info!("read {} bytes from {}", raw.len(), recording_path);

    let summary = build_generator(config, tracer, output_root).generate_from_recording(&raw, request)?;
    print_summary(&summary, json)
}

// ============================================================================
// ticket subcommand
// ============================================================================

pub fn cmd_ticket(
    config: &AppConfig,
    tracer: TraceLogger,
    key: &str,
    story_file: Option<&str>,
    base_url: Option<&str>,
    output_root: Option<&str>,
    json: bool,
) -> Result<()> {
    let source = build_ticket_source(config, key, story_file)?;
    let base_url = base_url
        .or(config.ticket.base_url.as_deref())
        .unwrap_or_default();

    let summary = build_generator(config, tracer, output_root).generate_from_ticket(source.as_ref(), key, base_url)?;
    print_summary(&summary, json)
}

// ============================================================================
// parse subcommand
// ============================================================================

/// Print the named action list as YAML. Warnings go to the log.
pub fn cmd_parse(recording_path: &str) -> Result<()> {
    let raw = read_recording(recording_path)?;
    let mut outcome = parse_recording(&raw);
    resolve_all(&mut outcome.actions);

    let yaml = serde_yaml::to_string(&outcome.actions).map_err(|e| GenError::Serialize {
        what: "actions".to_string(),
        reason: e.to_string(),
    })?;
    print!("{}", yaml);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// CLI `--trace` wins over the config file; neither means no tracing.
pub fn build_tracer(cli_path: Option<&str>, config: &AppConfig) -> TraceLogger {
    match cli_path.or(config.trace.path.as_deref()) {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    }
}

fn build_generator(config: &AppConfig, tracer: TraceLogger, output_root: Option<&str>) -> Generator {
    Generator::new(build_output_layout(&config.output, output_root))
        .with_packages(&config.output.page_package, &config.output.steps_package)
        .with_tracer(tracer)
}

/// A story file when given, otherwise the ticket service.
fn build_ticket_source(config: &AppConfig, key: &str, story_file: Option<&str>) -> Result<Box<dyn TicketSource>> {
    if let Some(path) = story_file {
        return Ok(Box::new(FileTicketSource::new(path)));
    }

    let settings = build_jira_settings(&config.jira, |var| std::env::var(var).ok());
    let client = JiraClient::new(settings).map_err(|source| GenError::TicketFetch {
        key: key.to_string(),
        source,
    })?;
    Ok(Box::new(client))
}

fn print_summary(summary: &GenerationSummary, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(summary).map_err(|e| GenError::Serialize {
            what: "run summary".to_string(),
            reason: e.to_string(),
        })?;
        println!("{}", out);
    } else {
        print!("{}", format_generation_summary(summary));
    }
    Ok(())
}
