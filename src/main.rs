use std::process::ExitCode;

use clap::Parser;
use stepweaver::cli::commands::{build_tracer, cmd_parse, cmd_record, cmd_ticket};
use stepweaver::cli::config::{Cli, Commands, load_config, log_level};
use stepweaver::pipeline::runner::RecordingRequest;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // -v sets the default level; RUST_LOG still overrides it
    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose))
        .parse_default_env()
        .init();

    let config = load_config(cli.config.as_deref());
    let tracer = build_tracer(cli.trace.as_deref(), &config);

    let result = match cli.command {
        Commands::Record {
            recording,
            feature,
            base_url,
            requirement,
            output_root,
            json,
        } => {
            let request = RecordingRequest {
                feature,
                base_url,
                requirement_key: requirement,
            };
            cmd_record(&config, tracer, &recording, &request, output_root.as_deref(), json)
        }
        Commands::Ticket {
            key,
            story_file,
            base_url,
            output_root,
            json,
        } => cmd_ticket(
            &config,
            tracer,
            &key,
            story_file.as_deref(),
            base_url.as_deref(),
            output_root.as_deref(),
            json,
        ),
        Commands::Parse { recording } => cmd_parse(&recording),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
