//! Integration tests for `gantry release:<type>`

use crate::helpers::{TestProject, git, init_repo, run_gantry, run_gantry_ok, stderr};
use anyhow::Result;

const RELEASE_COMMANDS: &str = r#"
[commands]
lint = ["true"]
json = ["true"]
test = ["true"]
coverage = ["true"]
bundle = ["true"]

[release]
bump = ["git", "tag", "v1.1.0"]
publish = ["touch", "published"]
branch = "main"

[site]
repo = "../site"
"#;

#[test]
fn test_release_halts_when_tests_fail() -> Result<()> {
  let project = TestProject::new()?;
  project.add_complete_rule("semi")?;
  project.write(
    "gantry.toml",
    r#"
[commands]
lint = ["true"]
json = ["true"]
test = ["false"]
coverage = ["true"]
bundle = ["true"]

[release]
bump = ["touch", "bumped"]
publish = ["touch", "published"]
"#,
  )?;

  let output = run_gantry(&project.path, &["release:patch"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(!project.file_exists("bumped"));
  assert!(!project.file_exists("published"));
  let err = stderr(&output);
  assert!(err.contains("aborted at validate&test"), "{}", err);
  Ok(())
}

#[test]
fn test_full_release_pushes_publishes_and_republishes() -> Result<()> {
  let project = TestProject::new()?;
  project.add_complete_rule("semi")?;
  project.write("gantry.toml", RELEASE_COMMANDS)?;
  project.commit_as("Build: first release", "Ada", "2026-01-01T10:00:00Z")?;
  project.tag("v1.0.0")?;
  project.commit_as("New: semi rule", "Grace", "2026-02-01T10:00:00Z")?;

  // Bare remote for the project
  let remote = project.sibling("project.git");
  git(&project.path, &["clone", "--bare", ".", &remote.to_string_lossy()])?;
  git(&project.path, &["remote", "add", "origin", &remote.to_string_lossy()])?;

  // Site checkout with its own bare remote
  let site = project.sibling("site");
  std::fs::create_dir_all(&site)?;
  init_repo(&site)?;
  std::fs::write(site.join("CNAME"), "example.com\n")?;
  git(&site, &["add", "."])?;
  git(&site, &["commit", "-m", "Site"])?;
  let site_remote = project.sibling("site.git");
  git(&site, &["clone", "--bare", ".", &site_remote.to_string_lossy()])?;
  git(&site, &["remote", "add", "origin", &site_remote.to_string_lossy()])?;

  run_gantry_ok(&project.path, &["release:minor"])?;

  assert!(project.file_exists("published"));
  assert!(project.read_file("CHANGELOG.md")?.contains("* New: semi rule (Grace)"));
  assert_eq!(project.git_log(1)?, vec!["Build: changelog update for v1.1.0".to_string()]);

  let tags = git(&remote, &["tag", "--list"])?;
  assert!(String::from_utf8_lossy(&tags.stdout).contains("v1.1.0"));

  let site_log = git(&site_remote, &["log", "-1", "--format=%s", "main"])?;
  assert!(String::from_utf8_lossy(&site_log.stdout).starts_with("Autogenerated new docs at"));
  assert!(site.join("docs/rules/semi.md").exists());
  Ok(())
}
