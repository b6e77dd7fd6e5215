//! Release state machine
//!
//! ```text
//! validate&test → bump-version → update-changelog → push-tags → publish-package → republish-site
//! ```
//!
//! Strictly forward, no skips, no retries. The first failing step aborts the
//! release; steps already performed are not undone.

use crate::core::error::GateResult;
use crate::release::version::ReleaseType;
use std::fmt;

/// One state of the release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStep {
  ValidateAndTest,
  BumpVersion,
  UpdateChangelog,
  PushTags,
  PublishPackage,
  RepublishSite,
}

impl ReleaseStep {
  /// Every step, in execution order
  pub const ORDER: [ReleaseStep; 6] = [
    ReleaseStep::ValidateAndTest,
    ReleaseStep::BumpVersion,
    ReleaseStep::UpdateChangelog,
    ReleaseStep::PushTags,
    ReleaseStep::PublishPackage,
    ReleaseStep::RepublishSite,
  ];

  pub fn label(&self) -> &'static str {
    match self {
      ReleaseStep::ValidateAndTest => "validate&test",
      ReleaseStep::BumpVersion => "bump-version",
      ReleaseStep::UpdateChangelog => "update-changelog",
      ReleaseStep::PushTags => "push-tags",
      ReleaseStep::PublishPackage => "publish-package",
      ReleaseStep::RepublishSite => "republish-site",
    }
  }

  /// Whether the step is visible outside this machine once done
  pub fn is_external(&self) -> bool {
    matches!(
      self,
      ReleaseStep::PushTags | ReleaseStep::PublishPackage | ReleaseStep::RepublishSite
    )
  }
}

impl fmt::Display for ReleaseStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Performs the action behind each step
pub trait ReleaseDriver {
  fn execute(&self, step: ReleaseStep, level: ReleaseType) -> GateResult<()>;
}

/// A release of one type, run step by step over a driver
#[derive(Debug, Clone, Copy)]
pub struct ReleasePipeline {
  level: ReleaseType,
}

impl ReleasePipeline {
  pub fn new(level: ReleaseType) -> Self {
    Self { level }
  }

  /// Run every step in order, halting at the first failure
  pub fn run(&self, driver: &dyn ReleaseDriver) -> GateResult<()> {
    let total = ReleaseStep::ORDER.len();

    for (i, step) in ReleaseStep::ORDER.iter().enumerate() {
      println!("\n▶ [{}/{}] {}", i + 1, total, step);
      if let Err(err) = driver.execute(*step, self.level) {
        let skipped: Vec<&str> = ReleaseStep::ORDER[i + 1..].iter().map(|s| s.label()).collect();
        let published: Vec<&str> = ReleaseStep::ORDER[..i]
          .iter()
          .filter(|s| s.is_external())
          .map(|s| s.label())
          .collect();
        eprintln!("❌ Release ({}) aborted at {}", self.level, step);
        if !published.is_empty() {
          eprintln!("   Already done, not undone: {}", published.join(", "));
        }
        if !skipped.is_empty() {
          eprintln!("   Not run: {}", skipped.join(", "));
        }
        return Err(err);
      }
    }

    println!("\n✅ Release ({}) completed", self.level);
    Ok(())
  }
}
