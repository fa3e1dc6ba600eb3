//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fieldmap CLI - Declarative field mapping between record types
///
/// Checks, runs and describes the field correspondences declared in a
/// profile of record types.
#[derive(Parser, Debug)]
#[command(
    name = "fieldmap",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "FIELDMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: human, or the configured format]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the correspondences between two records and print the plan
    Check(CheckArgs),

    /// Map one instance or a JSON array of instances between two records
    Map(MapArgs),

    /// List the records of a profile and their fields
    Describe(DescribeArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// The pair of records a command works on
#[derive(Parser, Debug, Clone)]
pub struct RecordPair {
    /// Path to the profile (YAML, JSON or TOML); defaults to the configured profile
    #[arg(value_name = "PROFILE")]
    pub profile: Option<PathBuf>,

    /// Class record: the record whose fields are named by the declarations
    #[arg(long = "from", value_name = "RECORD")]
    pub class: String,

    /// View record: the record carrying the `from:` declarations
    #[arg(long = "to", value_name = "RECORD")]
    pub view: String,

    /// Map from the view back to the class
    #[arg(long)]
    pub reverse: bool,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub records: RecordPair,
}

/// Arguments for the map command
#[derive(Parser, Debug)]
pub struct MapArgs {
    #[command(flatten)]
    pub records: RecordPair,

    /// JSON file holding one instance or an array of instances (`-` for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Write the mapped instances to a file instead of stdout
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the describe command
#[derive(Parser, Debug)]
pub struct DescribeArgs {
    /// Path to the profile (YAML, JSON or TOML); defaults to the configured profile
    #[arg(value_name = "PROFILE")]
    pub profile: Option<PathBuf>,

    /// Only describe this record
    #[arg(short, long, value_name = "RECORD")]
    pub record: Option<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration values
    Show(ConfigShowArgs),

    /// Write a configuration file with default values
    Init(ConfigInitArgs),

    /// Print the configuration file locations that are searched
    Path,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file [default: the user config location]
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Force overwrite existing config files
    #[arg(long)]
    pub force: bool,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable formatted output
    #[default]
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }

    /// Output format from the flag, falling back to the configured one
    pub fn output_format(&self, configured: OutputFormat) -> OutputFormat {
        self.output.unwrap_or(configured)
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verify that the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: None,
            no_color: false,
            command: Commands::Describe(DescribeArgs {
                profile: Some(PathBuf::from("profile.yaml")),
                record: None,
            }),
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            verbose: 2,
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_record_pair_flags() {
        let cli = Cli::parse_from([
            "fieldmap", "check", "profile.yaml", "--from", "Customer", "--to", "CustomerView",
            "--reverse",
        ]);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.records.class, "Customer");
                assert_eq!(args.records.view, "CustomerView");
                assert!(args.records.reverse);
                assert_eq!(args.records.profile, Some(PathBuf::from("profile.yaml")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_output_format_falls_back_to_config() {
        let cli = Cli::parse_from(["fieldmap", "describe"]);
        assert_eq!(cli.output_format(OutputFormat::Yaml), OutputFormat::Yaml);

        let cli = Cli::parse_from(["fieldmap", "-o", "json-pretty", "describe"]);
        assert_eq!(cli.output_format(OutputFormat::Yaml), OutputFormat::JsonPretty);
    }
}
