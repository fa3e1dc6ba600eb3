//! Fieldmap CLI - Command-line interface for declarative field mapping
//!
//! This is the main entry point for the Fieldmap CLI application, providing
//! commands for checking correspondences between profile records, mapping
//! JSON instances between them and describing their fields.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;
use tracing_appender::non_blocking::WorkerGuard;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Configuration errors are reported after logging is up
    let config = Config::load_with_file(cli.config.as_deref());

    let guard = match init_logging(&cli, config.as_ref().ok()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    let use_color = cli.use_color()
        && config.as_ref().map_or(true, |c| c.output.color);
    control::set_override(use_color);

    let result = config.and_then(|config| run(cli, &config, use_color));

    let code = match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, use_color));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            e.exit_code()
        }
    };

    // Flush the log file before exiting
    drop(guard);
    process::exit(code);
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: &Config, use_color: bool) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = cli.output_format(config.output.format);
    let mut output = OutputWriter::new(format, use_color, cli.quiet);
    if !config.output.progress {
        output.hide_progress();
    }

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        format = ?output.format(),
        "Executing command"
    );

    match cli.command {
        Commands::Check(args) => handlers::handle_check(args, config, &mut output),
        Commands::Map(args) => handlers::handle_map(args, config, &mut output),
        Commands::Describe(args) => handlers::handle_describe(args, config, &mut output),
        Commands::Config(args) => handlers::handle_config(args, config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<Option<WorkerGuard>> {
    // Create logging configuration from CLI args, the config file and environment
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    if let Some(config) = config {
        logging_config.apply_settings(&config.logging, cli.verbosity_level());
    }
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
