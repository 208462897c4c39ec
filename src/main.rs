use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use crier::cli::{AppContext, Cli, Commands};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color || !std::io::stdout().is_terminal(),
    };

    match cli.command {
        None => crier::release_run(cli.release, &ctx),
        Some(Commands::Init(args)) => crier::infra::config::init(args, &ctx),
        Some(Commands::Completions(args)) => crier::completion::run(args, &ctx),
    }
}

/// Log to stderr.
///
/// `RUST_LOG` wins when set. Otherwise:
/// - `--quiet`: errors only
/// - default: warnings (invalid fragments, cleanup failures)
/// - `-v`: info
/// - `-vv` and up: debug
fn init_tracing(cli: &Cli) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) if cli.quiet => "error".to_string(),
        Err(_) => match cli.verbose {
            0 => "warn".to_string(),
            1 => "warn,crier=info".to_string(),
            _ => "info,crier=debug".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let ansi = !cli.no_color && std::io::stderr().is_terminal();

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(ansi)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
