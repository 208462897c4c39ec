use clap::{Args, Parser, Subcommand, ValueEnum};
use owo_colors::Style;
use std::path::PathBuf;

use crate::core::markup::{Hosting, Markup};

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
}

impl AppContext {
    /// `style`, or no styling at all under --no-color.
    pub fn style(&self, style: Style) -> Style {
        if self.no_color { Style::new() } else { style }
    }
}

#[derive(Parser)]
#[command(name = "crier")]
#[command(about = "Render news fragments into a release entry and add it to the changelog")]
#[command(version, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a crier.toml config file and the news file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments of the default (release) command.
#[derive(Args, Debug, Clone)]
pub struct ReleaseArgs {
    /// Version being released, e.g. v1.1.0
    #[arg(value_name = "NEW", required = true)]
    pub new: Option<String>,

    /// Previous version, used for the compare link
    #[arg(value_name = "PREVIOUS", required = true)]
    pub previous: Option<String>,

    /// Path to the config file
    #[arg(
        short,
        long,
        env = "CRIER_CONFIG",
        default_value = ".crier.d/crier.toml",
        value_parser = expand_path
    )]
    pub config: PathBuf,

    /// Release date (YYYY-MM-DD); defaults to today (UTC)
    #[arg(long, env = "CRIER_DATE", value_parser = parse_date)]
    pub date: Option<chrono::NaiveDate>,

    /// Write to the news file and remove the fragments instead of printing a preview
    #[arg(long, env = "CRIER_RELEASE")]
    pub release: bool,

    /// Preview format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, conflicts_with = "release")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The rendered release entry
    Text,
    /// The release record passed to templates
    Json,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Project directory to initialize
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,

    /// Repository as owner/name or an http(s) URL
    #[arg(short, long)]
    pub repository: String,

    /// Markup of the news file and fragments
    #[arg(long, value_enum, default_value_t = Markup::Markdown)]
    pub markup: Markup,

    /// Hosting provider, decides the link layout
    #[arg(long, value_enum, default_value_t = Hosting::Github)]
    pub hosting: Hosting,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}

fn expand_path(s: &str) -> Result<PathBuf, String> {
    shellexpand::full(s)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| e.to_string())
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
