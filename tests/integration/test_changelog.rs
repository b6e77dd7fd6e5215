//! Integration tests for `gantry changelog`

use crate::helpers::{TestProject, run_gantry, run_gantry_ok};
use anyhow::Result;

fn tagged_project() -> Result<TestProject> {
  let project = TestProject::new()?;
  project.commit_as("Build: first release", "Ada", "2026-01-01T10:00:00Z")?;
  project.tag("v1.0.0")?;
  project.commit_as("New: add quotes rule", "Ada", "2026-02-01T10:00:00Z")?;
  project.commit_as("Merge pull request #41 from ada/quotes", "Ada", "2026-02-02T10:00:00Z")?;
  project.commit_as("Fix: semi autofix", "Grace", "2026-02-03T10:00:00Z")?;
  project.tag("v1.1.0")?;
  Ok(project)
}

#[test]
fn test_entry_lists_range_without_merges() -> Result<()> {
  let project = tagged_project()?;
  project.write("CHANGELOG.md", "v0.9.0 - December 1, 2025\n\n* old entry (Ada)\n\n")?;

  run_gantry_ok(&project.path, &["changelog"])?;

  let changelog = project.read_file("CHANGELOG.md")?;
  let lines: Vec<&str> = changelog.lines().collect();
  assert!(lines[0].starts_with("v1.0.0 - "), "{}", changelog);
  assert_eq!(lines[1], "");
  assert_eq!(lines[2], "* Fix: semi autofix (Grace)");
  assert_eq!(lines[3], "* New: add quotes rule (Ada)");
  assert!(!changelog.contains("Merge pull request"));
  assert!(!changelog.contains("first release"));
  assert!(changelog.ends_with("* old entry (Ada)\n\n"));
  Ok(())
}

#[test]
fn test_rerun_prepends_again() -> Result<()> {
  let project = tagged_project()?;

  run_gantry_ok(&project.path, &["changelog"])?;
  run_gantry_ok(&project.path, &["changelog"])?;

  let changelog = project.read_file("CHANGELOG.md")?;
  assert_eq!(changelog.matches("* Fix: semi autofix (Grace)").count(), 2);
  Ok(())
}

#[test]
fn test_single_tag_fails() -> Result<()> {
  let project = TestProject::new()?;
  project.tag("v1.0.0")?;

  let output = run_gantry(&project.path, &["changelog"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(!project.file_exists("CHANGELOG.md"));
  Ok(())
}
