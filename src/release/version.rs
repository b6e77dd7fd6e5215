//! Release types and version arithmetic

use crate::core::error::GateResult;
use semver::Version;
use std::fmt;

/// Which version component a release increments
///
/// The bump itself is done by the configured external command; gantry only
/// uses this to fill `{level}` and to announce the expected next version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseType {
  Patch,
  Minor,
  Major,
}

impl ReleaseType {
  pub const ALL: [ReleaseType; 3] = [ReleaseType::Patch, ReleaseType::Minor, ReleaseType::Major];

  pub fn as_str(&self) -> &'static str {
    match self {
      ReleaseType::Patch => "patch",
      ReleaseType::Minor => "minor",
      ReleaseType::Major => "major",
    }
  }

  /// Apply the bump to a version (pre-release and build metadata are dropped)
  pub fn apply(&self, current: &Version) -> Version {
    match self {
      ReleaseType::Patch => Version::new(current.major, current.minor, current.patch + 1),
      ReleaseType::Minor => Version::new(current.major, current.minor + 1, 0),
      ReleaseType::Major => Version::new(current.major + 1, 0, 0),
    }
  }
}

impl fmt::Display for ReleaseType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Parse a tag such as `v1.2.3` into a version
pub fn version_from_tag(tag: &str, prefix: &str) -> GateResult<Version> {
  let raw = tag.strip_prefix(prefix).unwrap_or(tag);
  Ok(Version::parse(raw)?)
}
