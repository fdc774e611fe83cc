//! CLI behavior tests
//!
//! Drives the promptreg binary end to end: install, list, commit-mode
//! moves, uninstall and validation against real temp repositories.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn promptreg_cmd() -> Command {
    Command::cargo_bin("promptreg").unwrap()
}

fn simple_bundle() -> Vec<(&'static str, &'static str)> {
    vec![
        ("prompts/review.prompt.md", "# Review prompt"),
        ("rust.instructions.md", "Prefer iterators."),
    ]
}

#[test]
fn test_version_runs_outside_repo() {
    promptreg_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("promptreg"));
}

#[test]
fn test_completions_run_outside_repo() {
    promptreg_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("promptreg"));
}

#[test]
fn test_list_fails_outside_git_repo() {
    let workspace = common::TestWorkspace::without_git();

    promptreg_cmd()
        .current_dir(&workspace.path)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in a git repository"));
}

#[test]
fn test_list_empty_repository() {
    let workspace = common::TestWorkspace::new();

    promptreg_cmd()
        .current_dir(&workspace.path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No bundles installed"));
}

#[test]
fn test_install_records_bundle_in_committed_lockfile() {
    let workspace = common::TestWorkspace::new();
    let staged = workspace.stage_bundle(&simple_bundle());

    promptreg_cmd()
        .current_dir(&workspace.path)
        .args([
            "install",
            staged.path().to_str().unwrap(),
            "--id",
            "code-review",
            "--version",
            "1.0.0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed"));

    assert!(workspace.file_exists("prompt-registry.lock.json"));
    assert!(!workspace.file_exists("prompt-registry.local.lock.json"));
    assert!(workspace.file_exists(".github/prompts/review.prompt.md"));
    assert!(workspace.file_exists(".github/instructions/rust.instructions.md"));

    let lockfile = workspace.read_file("prompt-registry.lock.json");
    assert!(lockfile.contains("\"code-review\""));
    assert!(!lockfile.contains("commitMode"));

    promptreg_cmd()
        .current_dir(&workspace.path)
        .args(["list", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("code-review"))
        .stdout(predicate::str::contains("commit"));
}

#[test]
fn test_local_only_install_is_git_excluded() {
    let workspace = common::TestWorkspace::new();
    let staged = workspace.stage_bundle(&simple_bundle());

    promptreg_cmd()
        .current_dir(&workspace.path)
        .args([
            "install",
            staged.path().to_str().unwrap(),
            "--id",
            "scratch",
            "--local-only",
        ])
        .assert()
        .success();

    assert!(workspace.file_exists("prompt-registry.local.lock.json"));
    assert!(!workspace.file_exists("prompt-registry.lock.json"));

    let exclude = workspace.read_file(".git/info/exclude");
    let occurrences = exclude
        .lines()
        .filter(|line| *line == "prompt-registry.local.lock.json")
        .count();
    assert_eq!(
        occurrences, 1,
        "exclude entry must appear exactly once:\n{exclude}"
    );
}

#[test]
fn test_mode_moves_bundle_between_lockfiles() {
    let workspace = common::TestWorkspace::new();
    let staged = workspace.stage_bundle(&simple_bundle());

    promptreg_cmd()
        .current_dir(&workspace.path)
        .args([
            "install",
            staged.path().to_str().unwrap(),
            "--id",
            "code-review",
        ])
        .assert()
        .success();

    promptreg_cmd()
        .current_dir(&workspace.path)
        .args(["mode", "code-review", "local-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("local-only"));

    assert!(!workspace.file_exists("prompt-registry.lock.json"));
    let local = workspace.read_file("prompt-registry.local.lock.json");
    assert!(local.contains("\"code-review\""));

    promptreg_cmd()
        .current_dir(&workspace.path)
        .args(["mode", "code-review", "commit"])
        .assert()
        .success();

    assert!(workspace.file_exists("prompt-registry.lock.json"));
    assert!(!workspace.file_exists("prompt-registry.local.lock.json"));
}

#[test]
fn test_mode_rejects_bundle_missing_from_source_lockfile() {
    let workspace = common::TestWorkspace::new();

    promptreg_cmd()
        .current_dir(&workspace.path)
        .args(["mode", "ghost", "local-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"))
        .stderr(predicate::str::contains("not found in commit lockfile"));
}

#[test]
fn test_uninstall_removes_files_and_record() {
    let workspace = common::TestWorkspace::new();
    let staged = workspace.stage_bundle(&simple_bundle());

    promptreg_cmd()
        .current_dir(&workspace.path)
        .args([
            "install",
            staged.path().to_str().unwrap(),
            "--id",
            "code-review",
        ])
        .assert()
        .success();

    promptreg_cmd()
        .current_dir(&workspace.path)
        .args(["uninstall", "code-review", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Uninstalled"));

    assert!(!workspace.file_exists("prompt-registry.lock.json"));
    assert!(!workspace.file_exists(".github/prompts/review.prompt.md"));
}

#[test]
fn test_uninstall_unknown_bundle_fails() {
    let workspace = common::TestWorkspace::new();

    promptreg_cmd()
        .current_dir(&workspace.path)
        .args(["uninstall", "ghost", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_validate_reports_missing_then_valid_lockfile() {
    let workspace = common::TestWorkspace::new();

    promptreg_cmd()
        .current_dir(&workspace.path)
        .arg("validate")
        .assert()
        .failure();

    let staged = workspace.stage_bundle(&simple_bundle());
    promptreg_cmd()
        .current_dir(&workspace.path)
        .args([
            "install",
            staged.path().to_str().unwrap(),
            "--id",
            "code-review",
        ])
        .assert()
        .success();

    promptreg_cmd()
        .current_dir(&workspace.path)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn test_install_with_mcp_servers_merges_workspace_config() {
    let workspace = common::TestWorkspace::new();
    let staged = workspace.stage_bundle(&[
        ("prompts/review.prompt.md", "# Review"),
        (
            "mcp.json",
            r#"{"servers": {"search": {"command": "npx", "args": ["-y", "@acme/search"]}}}"#,
        ),
    ]);

    promptreg_cmd()
        .current_dir(&workspace.path)
        .args([
            "install",
            staged.path().to_str().unwrap(),
            "--id",
            "code-review",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("search"));

    let config = workspace.read_file(".vscode/mcp.json");
    assert!(config.contains("\"search\""));
    let tracking = workspace.read_file(".vscode/mcp-servers.lock.json");
    assert!(tracking.contains("code-review"));

    promptreg_cmd()
        .current_dir(&workspace.path)
        .args(["uninstall", "code-review", "-y"])
        .assert()
        .success();

    let config = workspace.read_file(".vscode/mcp.json");
    assert!(!config.contains("\"search\""));
    assert!(!workspace.file_exists(".vscode/mcp-servers.lock.json"));
}

#[test]
fn test_corrupted_lockfile_reads_as_empty() {
    let workspace = common::TestWorkspace::new();
    workspace.write_file("prompt-registry.lock.json", "{ definitely not json");

    promptreg_cmd()
        .current_dir(&workspace.path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No bundles installed"));
}
