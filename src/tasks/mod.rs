//! Task registry and scheduler
//!
//! - **registry**: task declarations, graph validation and planning
//!
//! The `Orchestrator` executes a plan strictly in order and halts at the first
//! failing task. It is also the release driver: release steps that reuse whole
//! tasks (`test`, `changelog`, `docs`) are planned and run through the same
//! registry. Completed tasks are remembered across every plan the orchestrator
//! runs, so a task body executes at most once per invocation.

pub mod registry;

pub use registry::{TaskAction, TaskDef, TaskRegistry};

use crate::commands;
use crate::core::context::GateContext;
use crate::core::error::GateResult;
use crate::release::{ReleaseDriver, ReleasePipeline, ReleaseStep, ReleaseType};
use std::cell::RefCell;
use std::collections::HashSet;

/// Runs planned tasks against one context
pub struct Orchestrator<'a> {
  ctx: &'a GateContext,
  registry: &'a TaskRegistry,
  completed: RefCell<HashSet<String>>,
}

impl<'a> Orchestrator<'a> {
  pub fn new(ctx: &'a GateContext, registry: &'a TaskRegistry) -> Self {
    Self {
      ctx,
      registry,
      completed: RefCell::new(HashSet::new()),
    }
  }

  /// Plan and run the requested tasks
  pub fn run<S: AsRef<str>>(&self, requested: &[S]) -> GateResult<()> {
    let plan = self.registry.plan(requested)?;
    for task in plan {
      self.run_task(task)?;
    }
    Ok(())
  }

  fn run_task(&self, task: &TaskDef) -> GateResult<()> {
    if self.completed.borrow().contains(&task.name) {
      log::debug!("skipping '{}': already ran", task.name);
      return Ok(());
    }
    self.run_action(task)?;
    self.completed.borrow_mut().insert(task.name.clone());
    Ok(())
  }

  fn run_action(&self, task: &TaskDef) -> GateResult<()> {
    if task.action != TaskAction::Group {
      println!("\n🔧 {}", task.name);
    }

    let ctx = self.ctx;
    match task.action {
      TaskAction::Group => Ok(()),
      TaskAction::Lint => commands::run_lint(ctx),
      TaskAction::CheckRules => commands::run_check_rules(ctx),
      TaskAction::Unit => commands::run_unit(ctx),
      TaskAction::Bundle => commands::run_bundle(ctx),
      TaskAction::Perf => commands::run_perf(ctx),
      TaskAction::Changelog => commands::run_changelog(ctx),
      TaskAction::Docs => commands::run_docs(ctx),
      TaskAction::Release(level) => ReleasePipeline::new(level).run(self),
    }
  }
}

impl ReleaseDriver for Orchestrator<'_> {
  fn execute(&self, step: ReleaseStep, level: ReleaseType) -> GateResult<()> {
    match step {
      ReleaseStep::ValidateAndTest => self.run(&["test"]),
      ReleaseStep::BumpVersion => commands::release::bump_version(self.ctx, level),
      ReleaseStep::UpdateChangelog => {
        self.run(&["changelog"])?;
        commands::release::commit_changelog(self.ctx)
      }
      ReleaseStep::PushTags => commands::release::push_tags(self.ctx),
      ReleaseStep::PublishPackage => commands::release::publish_package(self.ctx),
      ReleaseStep::RepublishSite => self.run(&["docs"]),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::commands::testing::{RecordingRunner, context, scripted_config};
  use std::fs;

  /// A project with no rules: every gate passes trivially
  fn empty_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("conf")).unwrap();
    fs::write(dir.path().join("conf/rules.json"), "{}").unwrap();
    dir
  }

  #[test]
  fn test_chain_runs_commands_in_plan_order() {
    let dir = empty_project();
    let runner = RecordingRunner::default();
    let ctx = context(dir.path(), scripted_config(), &runner);
    let registry = TaskRegistry::builtin(&ctx.config).unwrap();

    Orchestrator::new(&ctx, &registry).run(&["all"]).unwrap();

    assert_eq!(
      runner.calls(),
      vec!["style", "jsoncheck conf/rules.json", "unit-tests", "coverage --lines=99", "bundler"]
    );
  }

  #[test]
  fn test_failure_halts_the_chain() {
    let dir = empty_project();
    let runner = RecordingRunner::failing_on("unit-tests");
    let ctx = context(dir.path(), scripted_config(), &runner);
    let registry = TaskRegistry::builtin(&ctx.config).unwrap();

    assert!(Orchestrator::new(&ctx, &registry).run(&["test"]).is_err());
    assert_eq!(runner.calls().last().map(String::as_str), Some("unit-tests"));
    assert!(!runner.calls().iter().any(|c| c == "bundler"));
  }

  #[test]
  fn test_release_halts_when_tests_fail() {
    let dir = empty_project();
    let runner = RecordingRunner::failing_on("unit-tests");
    let ctx = context(dir.path(), scripted_config(), &runner);
    let registry = TaskRegistry::builtin(&ctx.config).unwrap();

    assert!(Orchestrator::new(&ctx, &registry).run(&["release:patch"]).is_err());

    let calls = runner.calls();
    assert!(!calls.iter().any(|c| c.starts_with("bump")));
    assert!(!calls.iter().any(|c| c == "publish"));
  }

  #[test]
  fn test_release_bumps_after_tests_pass() {
    let dir = empty_project();
    let runner = RecordingRunner::default();
    let ctx = context(dir.path(), scripted_config(), &runner);
    let registry = TaskRegistry::builtin(&ctx.config).unwrap();

    // Not a git repository, so the changelog step stops the release
    assert!(Orchestrator::new(&ctx, &registry).run(&["release:major"]).is_err());

    let calls = runner.calls();
    assert_eq!(calls.last().map(String::as_str), Some("bump major"));
    assert!(!calls.iter().any(|c| c == "publish"));
  }

  #[test]
  fn test_release_after_test_reuses_completed_chain() {
    let dir = empty_project();
    let runner = RecordingRunner::default();
    let ctx = context(dir.path(), scripted_config(), &runner);
    let registry = TaskRegistry::builtin(&ctx.config).unwrap();

    assert!(Orchestrator::new(&ctx, &registry).run(&["test", "release:patch"]).is_err());

    let calls = runner.calls();
    assert_eq!(calls.iter().filter(|c| *c == "unit-tests").count(), 1);
    assert_eq!(calls.iter().filter(|c| *c == "bundler").count(), 1);
    assert_eq!(calls.last().map(String::as_str), Some("bump patch"));
  }

  #[test]
  fn test_completed_tasks_persist_across_runs() {
    let dir = empty_project();
    let runner = RecordingRunner::default();
    let ctx = context(dir.path(), scripted_config(), &runner);
    let registry = TaskRegistry::builtin(&ctx.config).unwrap();
    let orchestrator = Orchestrator::new(&ctx, &registry);

    orchestrator.run(&["lint"]).unwrap();
    orchestrator.run(&["test"]).unwrap();

    assert_eq!(
      runner.calls(),
      vec!["style", "jsoncheck conf/rules.json", "unit-tests", "coverage --lines=99", "bundler"]
    );
  }

  #[test]
  fn test_failed_task_is_not_marked_complete() {
    let dir = empty_project();
    let runner = RecordingRunner::failing_on("bundler");
    let ctx = context(dir.path(), scripted_config(), &runner);
    let registry = TaskRegistry::builtin(&ctx.config).unwrap();
    let orchestrator = Orchestrator::new(&ctx, &registry);

    assert!(orchestrator.run(&["bundle"]).is_err());
    assert!(orchestrator.run(&["bundle"]).is_err());
    assert_eq!(runner.calls(), vec!["bundler", "bundler"]);
  }
}
