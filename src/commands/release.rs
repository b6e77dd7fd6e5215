//! Release steps with side effects
//!
//! Each function is one state of the release pipeline; sequencing and the
//! halt-on-failure policy live in `release::pipeline`.

use super::command_for;
use crate::core::context::GateContext;
use crate::core::error::GateResult;
use crate::core::exec::Vars;
use crate::core::vcs::SystemGit;
use crate::release::ReleaseType;
use crate::release::version::version_from_tag;

/// Bump the package version with the configured command
///
/// The expected next version is announced from the latest tag when it parses.
pub fn bump_version(ctx: &GateContext, level: ReleaseType) -> GateResult<()> {
  announce_next_version(ctx, level);

  let vars = Vars::new().set("level", level);
  let bump = command_for(
    &format!("release:{}", level),
    "release.bump",
    &ctx.config.release.bump,
    ctx.root(),
    &[],
    &vars,
  )?;
  ctx.runner.run(&bump)?;
  println!("✅ Version bumped ({})", level);
  Ok(())
}

fn announce_next_version(ctx: &GateContext, level: ReleaseType) {
  let latest = SystemGit::open(ctx.root()).and_then(|git| git.latest_tag());
  match latest {
    Ok(Some(tag)) => match version_from_tag(&tag, &ctx.config.release.tag_prefix) {
      Ok(current) => println!("📦 {} → {} ({})", current, level.apply(&current), level),
      Err(e) => log::warn!("latest tag '{}' is not a version: {}", tag, e),
    },
    Ok(None) => println!("📦 First {} release", level),
    Err(e) => log::warn!("could not read tags: {}", e),
  }
}

/// Commit the changelog file after the entry has been prepended
pub fn commit_changelog(ctx: &GateContext) -> GateResult<()> {
  let git = SystemGit::open(ctx.root())?;
  let tag = git.latest_tag()?.unwrap_or_default();
  git.add_paths(&[ctx.config.changelog.path.as_path()])?;
  git.commit(&format!("Build: changelog update for {}", tag))?;
  println!("✅ Committed {}", ctx.config.changelog.path.display());
  Ok(())
}

/// Push the release branch together with its tags
pub fn push_tags(ctx: &GateContext) -> GateResult<()> {
  let git = SystemGit::open(ctx.root())?;
  let release = &ctx.config.release;
  let branch = match &release.branch {
    Some(branch) => branch.clone(),
    None => git.current_branch()?,
  };
  git.push_with_tags(&release.remote, &branch)
}

/// Publish the package to its registry
pub fn publish_package(ctx: &GateContext) -> GateResult<()> {
  let publish = command_for(
    "release",
    "release.publish",
    &ctx.config.release.publish,
    ctx.root(),
    &[],
    &Vars::new(),
  )?;
  println!("🚀 Publishing package");
  ctx.runner.run(&publish)?;
  println!("✅ Package published");
  Ok(())
}
