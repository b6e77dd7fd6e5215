//! Integration tests for `gantry docs`

use crate::helpers::{PASSING_COMMANDS, TestProject, git, init_repo, run_gantry, run_gantry_ok, stdout};
use anyhow::Result;
use std::path::PathBuf;

/// Site checkout next to the project, tracking a bare remote on `main`
fn site_with_remote(project: &TestProject) -> Result<(PathBuf, PathBuf)> {
  let site = project.sibling("site");
  std::fs::create_dir_all(site.join("docs"))?;
  init_repo(&site)?;
  std::fs::write(site.join("docs/stale.md"), "old page\n")?;
  git(&site, &["add", "."])?;
  git(&site, &["commit", "-m", "Site"])?;

  let remote = project.sibling("site.git");
  git(&site, &["clone", "--bare", ".", &remote.to_string_lossy()])?;
  git(&site, &["remote", "add", "origin", &remote.to_string_lossy()])?;
  Ok((site, remote))
}

fn project_with_docs() -> Result<TestProject> {
  let project = TestProject::new()?;
  project.write("gantry.toml", &format!("{}\n[site]\nrepo = \"../site\"\n", PASSING_COMMANDS))?;
  project.write("docs/README.md", "# Docs\n\n* [semi](rules/semi.md)\n")?;
  project.write("docs/rules/semi.md", "# semi\n\nBack to [index](../README.md#rules).\n")?;
  Ok(project)
}

#[test]
fn test_docs_are_rewritten_committed_and_pushed() -> Result<()> {
  let project = project_with_docs()?;
  let (site, remote) = site_with_remote(&project)?;

  run_gantry_ok(&project.path, &["docs"])?;

  let index = std::fs::read_to_string(site.join("docs/index.md"))?;
  assert!(index.starts_with("---\nlayout: doc\n---\n"));
  assert!(index.contains("[semi](rules/semi.html)"));

  let page = std::fs::read_to_string(site.join("docs/rules/semi.md"))?;
  assert!(page.contains("[index](../index.html#rules)"));
  assert!(!site.join("docs/stale.md").exists());
  assert!(!site.join("docs/README.md").exists());

  let log = git(&remote, &["log", "-1", "--format=%s", "main"])?;
  assert!(String::from_utf8_lossy(&log.stdout).starts_with("Autogenerated new docs at"));
  Ok(())
}

#[test]
fn test_unchanged_docs_skip_commit() -> Result<()> {
  let project = project_with_docs()?;
  let (site, _remote) = site_with_remote(&project)?;

  run_gantry_ok(&project.path, &["docs"])?;
  let before = git(&site, &["rev-parse", "HEAD"])?;

  let output = run_gantry_ok(&project.path, &["docs"])?;
  let after = git(&site, &["rev-parse", "HEAD"])?;

  assert_eq!(before.stdout, after.stdout);
  assert!(stdout(&output).contains("nothing to commit"));
  Ok(())
}

#[test]
fn test_missing_site_checkout_fails() -> Result<()> {
  let project = project_with_docs()?;
  let output = run_gantry(&project.path, &["docs"])?;
  assert_eq!(output.status.code(), Some(1));
  Ok(())
}
