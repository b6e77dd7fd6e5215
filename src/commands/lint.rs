//! `gantry lint` - style-check sources, validate JSON
//!
//! Runs the style checker over the rule implementation files and their tests
//! in one invocation, then the JSON validator over every configured JSON file.

use super::command_for;
use crate::core::context::GateContext;
use crate::core::error::GateResult;
use crate::core::exec::Vars;
use crate::core::files::FileSet;

/// Run the lint task
pub fn run_lint(ctx: &GateContext) -> GateResult<()> {
  let files = &ctx.config.files;
  let commands = &ctx.config.commands;

  let sources = FileSet::resolve_all(ctx.root(), [&files.rules, &files.tests])?;
  if sources.is_empty() {
    log::warn!("no files under {} or {}", files.rules.dir.display(), files.tests.dir.display());
  }
  println!("🔍 Style-checking {} file(s)", sources.len());
  let style = command_for("lint", "commands.lint", &commands.lint, ctx.root(), sources.paths(), &Vars::new())?;
  ctx.runner.run(&style)?;

  let json = FileSet::resolve_all(ctx.root(), &files.json)?;
  println!("🔍 Validating {} JSON file(s)", json.len());
  let validator = command_for("lint", "commands.json", &commands.json, ctx.root(), json.paths(), &Vars::new())?;
  ctx.runner.run(&validator)?;

  println!("✅ Lint passed");
  Ok(())
}
