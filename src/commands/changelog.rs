//! `gantry changelog` - prepend an entry for the latest tag range

use crate::core::context::GateContext;
use crate::core::error::GateResult;
use crate::core::vcs::SystemGit;
use crate::quality::changelog;

/// Generate the changelog entry
///
/// Also the first half of the release's update-changelog step, which then
/// commits the file.
pub fn run_changelog(ctx: &GateContext) -> GateResult<()> {
  let git = SystemGit::open(ctx.root())?;
  println!("📝 Generating changelog");
  let entry = changelog::generate(&git, ctx.root(), &ctx.config.changelog)?;
  println!(
    "✅ {} change(s) under \"{}\" in {}",
    entry.lines.len(),
    entry.header,
    ctx.config.changelog.path.display()
  );
  Ok(())
}
