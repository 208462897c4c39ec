use clap::Parser;
use crier::cli::{Cli, Commands, InitArgs, OutputFormat};
use crier::core::markup::{Hosting, Markup};

#[test]
fn release_is_the_default_command() {
    // Given
    let argv = vec!["crier", "--config", "changes/crier.toml", "--format", "json", "v2.0.0", "v1.9.0"];

    // When
    let cli = Cli::parse_from(argv);

    // Then
    assert!(cli.command.is_none());
    assert_eq!(cli.release.new.as_deref(), Some("v2.0.0"));
    assert_eq!(cli.release.previous.as_deref(), Some("v1.9.0"));
    assert!(cli.release.config.ends_with("changes/crier.toml"));
    assert_eq!(cli.release.format, OutputFormat::Json);
    assert!(!cli.release.release);
}

#[test]
fn init_flags_parse() {
    let cli = Cli::parse_from(["crier", "init", "proj", "-r", "owner/repo", "--markup", "rst", "--hosting", "gitlab", "--force"]);

    match cli.command {
        Some(Commands::Init(InitArgs { path, repository, markup, hosting, force })) => {
            assert_eq!(path.to_string_lossy(), "proj");
            assert_eq!(repository, "owner/repo");
            assert_eq!(markup, Markup::Rst);
            assert_eq!(hosting, Hosting::Gitlab);
            assert!(force);
        }
        _ => panic!("expected Init command"),
    }
}

#[test]
fn versions_and_subcommand_do_not_mix() {
    assert!(Cli::try_parse_from(["crier", "v2", "v1", "init", "-r", "o/r"]).is_err());
}
