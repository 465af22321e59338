// tests/integration_test.rs
use git2::{Oid, Repository as Git2Repo, Signature};
use git_ccs::analyzer::ChangeMapping;
use git_ccs::cli::Ccs;
use git_ccs::domain::VersionFilter;
use git_ccs::git::{Git2Repository, Repository};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn commit(repo: &Git2Repo, message: &str) -> Oid {
    let signature = Signature::now("Test", "test@example.com").unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap()
}

fn annotated_tag(repo: &Git2Repo, name: &str, oid: Oid) {
    let signature = Signature::now("Test", "test@example.com").unwrap();
    let object = repo.find_object(oid, None).unwrap();
    repo.tag(name, &object, &signature, name, false).unwrap();
}

fn lightweight_tag(repo: &Git2Repo, name: &str, oid: Oid) {
    let object = repo.find_object(oid, None).unwrap();
    repo.tag_lightweight(name, &object, false).unwrap();
}

/// `feat: a` (v1.0.0) - `fix: b` (v1.0.1-RC.1) - `feat: c`
fn sample_repository() -> (TempDir, Git2Repo) {
    let dir = TempDir::new().unwrap();
    let git = Git2Repo::init(dir.path()).unwrap();
    let first = commit(&git, "feat: a");
    annotated_tag(&git, "v1.0.0", first);
    let second = commit(&git, "fix: b");
    lightweight_tag(&git, "v1.0.1-RC.1", second);
    commit(&git, "feat: c");
    (dir, git)
}

fn git_ccs(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-ccs"))
        .args(args)
        .arg("--repo")
        .arg(dir)
        .current_dir(dir)
        .env_remove("GIT_CCS_LOG")
        .output()
        .expect("Failed to execute git-ccs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_git2_next_versions() {
    let (_dir, git) = sample_repository();
    let ccs = Ccs::new(Git2Repository::from_git2(git));
    let mapping = ChangeMapping::default();

    assert_eq!(ccs.next_release(&mapping).unwrap().to_string(), "1.1.0");
    let rc = git_ccs::domain::CounterStrategy::default();
    assert_eq!(
        ccs.next_pre_release(&rc, &mapping).unwrap().to_string(),
        "1.1.0-RC.1"
    );
}

#[test]
fn test_git2_branch_tags_are_ignored() {
    let (_dir, git) = sample_repository();
    let original = git.head().unwrap().name().unwrap().to_string();
    let head = git.head().unwrap().peel_to_commit().unwrap();
    git.branch("side", &head, false).unwrap();
    git.set_head("refs/heads/side").unwrap();
    let side = commit(&git, "feat: side work");
    lightweight_tag(&git, "v9.0.0", side);
    git.set_head(&original).unwrap();
    drop(head);

    let repo = Git2Repository::from_git2(git);
    let latest = repo.latest_version_tag(&VersionFilter::Any).unwrap().unwrap();
    assert_eq!(latest.to_string(), "v1.0.1-RC.1");
}

#[test]
fn test_git2_changes_between_tags() {
    let (_dir, git) = sample_repository();
    let ccs = Ccs::new(Git2Repository::from_git2(git));
    let messages: Vec<String> = ccs
        .changes(true, None)
        .unwrap()
        .iter()
        .map(|c| c.message().to_string())
        .collect();
    assert_eq!(messages, vec!["fix: b", "feat: c"]);
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    let output = git_ccs(dir.path(), &["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Conventional Commits"));
}

#[test]
fn test_cli_next_release() {
    let (dir, _git) = sample_repository();
    let output = git_ccs(dir.path(), &["next", "release"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "1.1.0");

    let output = git_ccs(dir.path(), &["next", "release", "-m", "fix", "-p", "feat"]);
    assert_eq!(stdout(&output).trim(), "1.0.1");
}

#[test]
fn test_cli_next_pre_release() {
    let (dir, _git) = sample_repository();
    let output = git_ccs(dir.path(), &["next", "pre-release"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "1.1.0-SNAPSHOT.1");

    let output = git_ccs(dir.path(), &["next", "pre-release", "-c", "beta", "-s"]);
    assert_eq!(stdout(&output).trim(), "1.1.0-beta.1.SNAPSHOT");
}

#[test]
fn test_cli_latest() {
    let (dir, _git) = sample_repository();
    let output = git_ccs(dir.path(), &["latest"]);
    assert_eq!(stdout(&output).trim(), "1.0.1-RC.1");

    let output = git_ccs(dir.path(), &["latest", "--release"]);
    assert_eq!(stdout(&output).trim(), "1.0.0");

    let output = git_ccs(dir.path(), &["latest", "-t", "1.0.0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no version found"));
}

#[test]
fn test_cli_log_and_changes() {
    let (dir, _git) = sample_repository();
    let output = git_ccs(dir.path(), &["log", "-r"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert_eq!(value[1]["conventional"]["type"], "feat");

    let output = git_ccs(dir.path(), &["changes", "-r", "-s", "New=feat", "-l", "1"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "# New\n\n* c\n\n");
}

#[test]
fn test_cli_reports_errors() {
    let dir = TempDir::new().unwrap();
    let output = git_ccs(dir.path(), &["changes", "-l", "9"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR"));
}
