//! `gantry unit` - unit tests with coverage enforcement
//!
//! The test runner collects coverage; a separate coverage command enforces the
//! four configured thresholds afterwards.

use super::command_for;
use crate::core::context::GateContext;
use crate::core::error::GateResult;
use crate::core::exec::Vars;
use crate::core::files::FileSet;

/// Run the unit test task
pub fn run_unit(ctx: &GateContext) -> GateResult<()> {
  let commands = &ctx.config.commands;
  let coverage = &ctx.config.coverage;

  let tests = FileSet::resolve(ctx.root(), &ctx.config.files.tests)?;
  println!("🧪 Running {} test file(s)", tests.len());
  let runner = command_for("unit", "commands.test", &commands.test, ctx.root(), tests.paths(), &Vars::new())?;
  ctx.runner.run(&runner)?;

  let thresholds = Vars::new()
    .set("statements", coverage.statements)
    .set("branches", coverage.branches)
    .set("functions", coverage.functions)
    .set("lines", coverage.lines);
  println!(
    "📊 Enforcing coverage (statements {}%, branches {}%, functions {}%, lines {}%)",
    coverage.statements, coverage.branches, coverage.functions, coverage.lines
  );
  let check = command_for("unit", "commands.coverage", &commands.coverage, ctx.root(), &[], &thresholds)?;
  ctx.runner.run(&check)?;

  println!("✅ Unit tests passed");
  Ok(())
}
