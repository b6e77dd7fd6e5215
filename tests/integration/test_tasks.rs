//! Integration tests for task selection, listing and planning

use crate::helpers::{PASSING_COMMANDS, TestProject, run_gantry, run_gantry_ok, stderr, stdout};
use anyhow::Result;

#[test]
fn test_list_shows_builtin_tasks() -> Result<()> {
  let project = TestProject::new()?;
  let output = run_gantry_ok(&project.path, &["--list"])?;
  let out = stdout(&output);

  for task in ["lint", "check-rules", "unit", "bundle", "test", "perf", "changelog", "docs", "release:patch", "all"] {
    assert!(out.contains(task), "missing task {} in:\n{}", task, out);
  }
  assert!(out.contains("after: lint, check-rules, unit, bundle"));
  Ok(())
}

#[test]
fn test_dry_run_prints_plan_without_running() -> Result<()> {
  let project = TestProject::new()?;
  project.write("gantry.toml", "[commands]\nbundle = [\"touch\", \"bundled\"]\n")?;

  let output = run_gantry_ok(&project.path, &["--dry-run", "test"])?;
  let out = stdout(&output);

  let order: Vec<&str> = ["1. lint", "2. check-rules", "3. unit", "4. bundle", "5. test"]
    .into_iter()
    .filter(|line| out.contains(line))
    .collect();
  assert_eq!(order.len(), 5, "unexpected plan:\n{}", out);
  assert!(!project.file_exists("bundled"));
  Ok(())
}

#[test]
fn test_unknown_task_fails_with_exit_one() -> Result<()> {
  let project = TestProject::new()?;
  let output = run_gantry(&project.path, &["tset"])?;

  assert_eq!(output.status.code(), Some(1));
  let err = stderr(&output);
  assert!(err.contains("Unknown task 'tset'"));
  assert!(err.contains("Available tasks:"));
  Ok(())
}

#[test]
fn test_invalid_config_fails_with_exit_one() -> Result<()> {
  let project = TestProject::new()?;
  project.write("gantry.toml", "[coverage]\nlines = 140\n")?;

  let output = run_gantry(&project.path, &["--list"])?;
  assert_eq!(output.status.code(), Some(1));
  Ok(())
}

#[test]
fn test_failing_command_halts_chain_with_exit_one() -> Result<()> {
  let project = TestProject::new()?;
  project.add_complete_rule("semi")?;
  project.write(
    "gantry.toml",
    r#"
[commands]
lint = ["false"]
json = ["touch", "json-ran"]
test = ["true"]
coverage = ["true"]
bundle = ["true"]
"#,
  )?;

  let output = run_gantry(&project.path, &[])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("`false` failed with exit code 1"));
  assert!(!project.file_exists("json-ran"));
  Ok(())
}

#[test]
fn test_default_task_runs_full_chain() -> Result<()> {
  let project = TestProject::new()?;
  project.add_complete_rule("semi")?;
  project.add_complete_rule("quotes")?;
  project.write(
    "gantry.toml",
    &PASSING_COMMANDS.replace("bundle = [\"true\"]", "bundle = [\"touch\", \"bundled\"]"),
  )?;

  let output = run_gantry_ok(&project.path, &[])?;
  assert!(stdout(&output).contains("2 rule(s) consistent"));
  assert!(project.file_exists("bundled"));
  Ok(())
}

#[test]
fn test_dir_flag_selects_project_root() -> Result<()> {
  let project = TestProject::new()?;
  project.add_complete_rule("semi")?;
  project.write("gantry.toml", PASSING_COMMANDS)?;

  let elsewhere = tempfile::tempdir()?;
  let dir = project.path.to_string_lossy().to_string();
  run_gantry_ok(elsewhere.path(), &["-C", &dir, "check-rules"])?;
  Ok(())
}
