//! Shared test utilities for integration tests
//!
//! Builds throwaway projects with a config file, a news file and a set
//! of fragments, and a `crier` command pointed at them.

#![allow(dead_code)]

use std::process::Command;

use assert_cmd::prelude::*;
use assert_fs::prelude::*;

pub const MARKER: &str = "<!-- crier output starts -->";

/// Config with the two sections used by most tests.
pub const CONFIG: &str = r#"[crier]
repository = "owner/repo"

[[crier.sections]]
name = "Added"
short_name = "feature"

[[crier.sections]]
name = "Fixed"
short_name = "fix"
"#;

/// A news file with a header, the marker and one older release.
pub fn news_file() -> String
{
    format!("# Changelog\n\n{MARKER}\n\n## v1.0.0\n\n- Initial release.\n")
}

/// Temp project with `config` and the default news file.
pub fn project(config: &str) -> assert_fs::TempDir
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child(".crier.d/crier.toml")
        .write_str(config)
        .expect("write config");
    tmp.child("CHANGELOG.md")
        .write_str(&news_file())
        .expect("write news file");

    tmp
}

/// Write a fragment file into the default fragment directory.
pub fn fragment(
    tmp: &assert_fs::TempDir,
    name: &str,
    text: &str,
)
{
    tmp.child(format!(".crier.d/{name}"))
        .write_str(text)
        .expect("write fragment");
}

/// `crier` running inside `tmp`, isolated from the caller's environment.
pub fn crier(tmp: &assert_fs::TempDir) -> Command
{
    let mut cmd = Command::cargo_bin("crier").expect("crier binary");
    cmd.current_dir(tmp.path())
        .env_remove("CRIER_CONFIG")
        .env_remove("CRIER_DATE")
        .env_remove("CRIER_RELEASE")
        .env_remove("RUST_LOG");
    cmd
}
