//! `gantry docs` - regenerate docs and republish the site

use crate::core::context::GateContext;
use crate::core::error::GateResult;
use crate::core::exec::{CommandSpec, Vars};
use crate::release::site::SitePublisher;

/// Run the optional doc generator, then publish the docs tree
pub fn run_docs(ctx: &GateContext) -> GateResult<()> {
  if let Some(generator) = CommandSpec::from_template(&ctx.config.commands.docs, ctx.root(), &[], &Vars::new()) {
    println!("📚 Generating docs");
    ctx.runner.run(&generator)?;
  }

  let publisher = SitePublisher::new(ctx.root(), &ctx.config.site);
  println!("🌐 Republishing site at {}", publisher.site_root().display());
  publisher.publish()?;

  println!("✅ Site published");
  Ok(())
}
