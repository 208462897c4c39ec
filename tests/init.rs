//! `crier init` followed by a first release.

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;

mod util;
use util::{MARKER, crier};

#[test]
fn init_then_release() {
    let tmp = assert_fs::TempDir::new().unwrap();

    crier(&tmp)
        .args(["init", "-r", "https://example.com/owner/repo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file"));

    tmp.child(".crier.d/crier.toml")
        .assert(predicate::str::contains("repository = \"https://example.com/owner/repo\""))
        .assert(predicate::str::contains("short_name = \"fix\""));
    tmp.child("CHANGELOG.md").assert(predicate::str::ends_with(format!("{MARKER}\n")));

    tmp.child(".crier.d/12.fix.md").write_str("Handle empty input.").unwrap();
    crier(&tmp)
        .args(["v0.2.0", "v0.1.0", "--date", "2022-02-02", "--release"])
        .assert()
        .success();

    tmp.child("CHANGELOG.md").assert(predicate::str::contains(format!(
        "{MARKER}\n## [v0.2.0](https://example.com/owner/repo/compare/v0.1.0...v0.2.0) - 2022-02-02\n\n### Fixed\n\n- Handle empty input. ([#12](https://example.com/owner/repo/issues/12))\n"
    )));
}

#[test]
fn init_keeps_existing_news_file() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("CHANGELOG.md").write_str("mine\n").unwrap();

    crier(&tmp).args(["init", "-r", "owner/repo", "-q"]).assert().success().stdout("");

    tmp.child("CHANGELOG.md").assert("mine\n");
    crier(&tmp)
        .args(["init", "-r", "owner/repo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn init_rst_gitlab() {
    let tmp = assert_fs::TempDir::new().unwrap();

    crier(&tmp)
        .args(["init", "-r", "group/project", "--markup", "rst", "--hosting", "gitlab", "--quiet"])
        .assert()
        .success();

    tmp.child("CHANGELOG.rst").assert(predicate::str::ends_with(".. crier output starts\n"));
    tmp.child(".crier.d/crier.toml").assert(predicate::str::contains("markup = \"rst\""));
}

#[test]
fn init_rst_then_release_separates_directive() {
    let tmp = assert_fs::TempDir::new().unwrap();

    crier(&tmp)
        .args(["init", "-r", "owner/repo", "--markup", "rst", "-q"])
        .assert()
        .success();
    tmp.child(".crier.d/12.fix.rst").write_str("Handle empty input.").unwrap();

    crier(&tmp)
        .args(["v0.2.0", "v0.1.0", "--date", "2022-02-02", "--release", "-q"])
        .assert()
        .success();

    // a paragraph glued to the directive would become part of the comment
    tmp.child("CHANGELOG.rst")
        .assert(predicate::str::contains(".. crier output starts\n\n`v0.2.0`_ - 2022-02-02\n"));
}

#[test]
fn first_release_without_news_file_matches_init() {
    for markup in ["markdown", "rst"] {
        let ext = if markup == "rst" { "rst" } else { "md" };
        let news_file = format!("CHANGELOG.{ext}");

        let initialized = assert_fs::TempDir::new().unwrap();
        let bootstrapped = assert_fs::TempDir::new().unwrap();
        for tmp in [&initialized, &bootstrapped] {
            crier(tmp)
                .args(["init", "-r", "owner/repo", "--markup", markup, "-q"])
                .assert()
                .success();
            tmp.child(format!(".crier.d/7.fix.{ext}")).write_str("Fix it.").unwrap();
        }
        fs::remove_file(bootstrapped.path().join(&news_file)).unwrap();

        for tmp in [&initialized, &bootstrapped] {
            crier(tmp)
                .args(["v1.0.0", "v0.9.0", "--date", "2023-03-03", "--release", "-q"])
                .assert()
                .success();
        }

        assert_eq!(
            fs::read_to_string(bootstrapped.path().join(&news_file)).unwrap(),
            fs::read_to_string(initialized.path().join(&news_file)).unwrap(),
            "{markup}"
        );
    }
}
