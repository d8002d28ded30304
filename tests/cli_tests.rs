use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use stepweaver::cli::commands::build_tracer;
use stepweaver::cli::config::{
    AppConfig, Cli, Commands, JiraConfig, build_jira_settings, build_output_layout, load_config,
    log_level,
};

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_record_minimal() {
    let cli = Cli::parse_from([
        "stepweaver",
        "record",
        "--recording",
        "session.py",
        "--feature",
        "Login",
    ]);
    match cli.command {
        Commands::Record {
            recording,
            feature,
            base_url,
            requirement,
            output_root,
            json,
        } => {
            assert_eq!(recording, "session.py");
            assert_eq!(feature, "Login");
            assert_eq!(base_url, "");
            assert_eq!(requirement, "");
            assert!(output_root.is_none());
            assert!(!json);
        }
        _ => panic!("Expected Record command"),
    }
}

#[test]
fn cli_parse_record_all_args() {
    let cli = Cli::parse_from([
        "stepweaver",
        "record",
        "--recording",
        "-",
        "--feature",
        "Checkout",
        "--base-url",
        "https://shop.example",
        "--requirement",
        "REQ-7",
        "--output-root",
        "./generated",
        "--json",
    ]);
    match cli.command {
        Commands::Record {
            recording,
            base_url,
            requirement,
            output_root,
            json,
            ..
        } => {
            assert_eq!(recording, "-");
            assert_eq!(base_url, "https://shop.example");
            assert_eq!(requirement, "REQ-7");
            assert_eq!(output_root, Some("./generated".to_string()));
            assert!(json);
        }
        _ => panic!("Expected Record command"),
    }
}

#[test]
fn cli_parse_ticket() {
    let cli = Cli::parse_from([
        "stepweaver",
        "ticket",
        "--key",
        "PROJ-42",
        "--story-file",
        "story.yaml",
    ]);
    match cli.command {
        Commands::Ticket {
            key,
            story_file,
            base_url,
            output_root,
            json,
        } => {
            assert_eq!(key, "PROJ-42");
            assert_eq!(story_file, Some("story.yaml".to_string()));
            assert!(base_url.is_none());
            assert!(output_root.is_none());
            assert!(!json);
        }
        _ => panic!("Expected Ticket command"),
    }
}

#[test]
fn cli_parse_parse_subcommand() {
    let cli = Cli::parse_from(["stepweaver", "parse", "--recording", "rec.java"]);
    assert!(matches!(cli.command, Commands::Parse { recording } if recording == "rec.java"));
}

#[test]
fn cli_record_requires_feature() {
    let result = Cli::try_parse_from(["stepweaver", "record", "--recording", "a.py"]);
    assert!(result.is_err());
}

#[test]
fn cli_parse_global_flags() {
    let cli = Cli::parse_from(["stepweaver", "-v", "parse", "--recording", "r.py"]);
    assert_eq!(cli.verbose, 1);

    let cli = Cli::parse_from([
        "stepweaver",
        "parse",
        "--recording",
        "r.py",
        "-vvv",
        "--config",
        "custom.yaml",
        "--trace",
        "run.jsonl",
    ]);
    assert_eq!(cli.verbose, 3);
    assert_eq!(cli.config, Some("custom.yaml".to_string()));
    assert_eq!(cli.trace, Some("run.jsonl".to_string()));
}

#[test]
fn verbosity_maps_to_log_level() {
    assert_eq!(log_level(0), log::LevelFilter::Warn);
    assert_eq!(log_level(1), log::LevelFilter::Info);
    assert_eq!(log_level(2), log::LevelFilter::Debug);
    assert_eq!(log_level(5), log::LevelFilter::Trace);
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_load_missing_file() {
    let config = load_config(Some("nonexistent_file_that_does_not_exist.yaml"));
    assert_eq!(config.output.root, ".");
    assert_eq!(config.output.pages_dir, "src/test/java/pages");
    assert!(config.jira.base_url.is_none());
}

#[test]
fn config_load_malformed_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stepweaver.yaml");
    std::fs::write(&path, "output: [not, a, map").unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.output.steps_package, "steps");
}

#[test]
fn config_default_values() {
    let config = AppConfig::default();
    assert_eq!(config.output.features_dir, "src/test/resources/features");
    assert_eq!(config.output.steps_dir, "src/test/java/steps");
    assert_eq!(config.output.page_package, "pages");
    assert_eq!(config.output.steps_package, "steps");
    assert!(config.trace.path.is_none());
    assert!(config.ticket.base_url.is_none());
}

#[test]
fn config_partial_yaml() {
    let yaml = r#"
output:
  root: "./qa"
  page_package: "com.acme.pages"
jira:
  base_url: "https://acme.atlassian.net"
  acceptance_criteria_field: "customfield_10020"
"#;
    let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.output.root, "./qa");
    assert_eq!(config.output.page_package, "com.acme.pages");
    // other output fields get defaults
    assert_eq!(config.output.steps_package, "steps");
    assert_eq!(config.output.pages_dir, "src/test/java/pages");
    assert_eq!(config.jira.acceptance_criteria_field.as_deref(), Some("customfield_10020"));
    assert!(config.jira.token.is_none());
}

#[test]
fn config_yaml_roundtrip() {
    let config = AppConfig::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed.output.root, config.output.root);
    assert_eq!(parsed.output.features_dir, config.output.features_dir);
}

// ============================================================================
// Builder / Helper Tests
// ============================================================================

#[test]
fn output_root_flag_overrides_config() {
    let config = AppConfig::default();
    let layout = build_output_layout(&config.output, Some("/tmp/out"));
    assert_eq!(layout.root, PathBuf::from("/tmp/out"));
    assert_eq!(layout.pages_dir, "src/test/java/pages");

    let layout = build_output_layout(&config.output, None);
    assert_eq!(layout.root, PathBuf::from("."));
}

#[test]
fn jira_settings_prefer_config_over_env() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("JIRA_BASE_URL", "https://env.example"),
        ("JIRA_USER", "env-user"),
        ("JIRA_TOKEN", "env-token"),
    ]);
    let lookup = |var: &str| env.get(var).map(|v| v.to_string());

    let config = JiraConfig {
        base_url: Some("https://config.example".to_string()),
        user: None,
        token: Some(String::new()),
        acceptance_criteria_field: None,
    };
    let settings = build_jira_settings(&config, lookup);
    assert_eq!(settings.base_url, "https://config.example");
    assert_eq!(settings.user.as_deref(), Some("env-user"));
    // blank config values do not shadow the environment
    assert_eq!(settings.token.as_deref(), Some("env-token"));
    assert!(settings.acceptance_criteria_field.is_none());
}

#[test]
fn jira_settings_empty_without_sources() {
    let settings = build_jira_settings(&JiraConfig::default(), |_| None);
    assert_eq!(settings.base_url, "");
    assert!(settings.user.is_none());
    assert!(settings.token.is_none());
}

#[test]
fn tracer_flag_wins_over_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.trace.path = Some(dir.path().join("config.jsonl").display().to_string());

    let flag_path = dir.path().join("flag.jsonl");
    let tracer = build_tracer(flag_path.to_str(), &config);
    assert!(tracer.is_enabled());
    assert!(flag_path.exists());
    assert!(!dir.path().join("config.jsonl").exists());

    assert!(!build_tracer(None, &AppConfig::default()).is_enabled());
}
