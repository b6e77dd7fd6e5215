//! Integration tests for `gantry check-rules`

use crate::helpers::{PASSING_COMMANDS, TestProject, run_gantry, run_gantry_ok, stderr};
use anyhow::Result;

#[test]
fn test_consistent_project_passes() -> Result<()> {
  let project = TestProject::new()?;
  project.add_complete_rule("semi")?;
  project.add_complete_rule("quotes")?;
  project.write("gantry.toml", PASSING_COMMANDS)?;

  run_gantry_ok(&project.path, &["check-rules"])?;
  Ok(())
}

#[test]
fn test_every_violation_is_reported_before_failing() -> Result<()> {
  let project = TestProject::new()?;
  project.add_complete_rule("semi")?;
  project.add_complete_rule("quotes")?;
  project.write("gantry.toml", PASSING_COMMANDS)?;

  // quotes loses its doc page, semi its test
  std::fs::remove_file(project.path.join("docs/rules/quotes.md"))?;
  std::fs::remove_file(project.path.join("tests/lib/rules/semi.js"))?;

  let output = run_gantry(&project.path, &["check-rules"])?;
  assert_eq!(output.status.code(), Some(1));

  let err = stderr(&output);
  assert!(err.contains("Missing documentation for rule quotes"), "{}", err);
  assert!(err.contains("Missing tests for rule semi"), "{}", err);
  assert!(err.contains("2 error(s) across 2 rule(s)"), "{}", err);
  Ok(())
}

#[test]
fn test_unlinked_doc_and_missing_default() -> Result<()> {
  let project = TestProject::new()?;
  project.add_complete_rule("semi")?;
  project.write("gantry.toml", PASSING_COMMANDS)?;
  project.write("README.md", "# project\n")?;
  project.write("conf/rules.json", "{}")?;

  let output = run_gantry(&project.path, &["check-rules"])?;
  assert_eq!(output.status.code(), Some(1));

  let err = stderr(&output);
  assert!(err.contains("Missing link to documentation for rule semi"), "{}", err);
  assert!(err.contains("Missing default setting for rule semi"), "{}", err);
  Ok(())
}
