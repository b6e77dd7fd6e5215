//! `gantry bundle` - browser bundle

use super::command_for;
use crate::core::context::GateContext;
use crate::core::error::GateResult;
use crate::core::exec::Vars;

/// Run the bundler
pub fn run_bundle(ctx: &GateContext) -> GateResult<()> {
  println!("📦 Bundling");
  let bundle = command_for(
    "bundle",
    "commands.bundle",
    &ctx.config.commands.bundle,
    ctx.root(),
    &[],
    &Vars::new(),
  )?;
  ctx.runner.run(&bundle)?;
  println!("✅ Bundle built");
  Ok(())
}
