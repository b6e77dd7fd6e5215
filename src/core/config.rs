use crate::core::error::{ConfigError, GateError, GateResult, ResultExt};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Configuration for gantry
/// Searched in order: gantry.toml, .gantry.toml, .config/gantry.toml
///
/// Every field has a default, so a project without a config file still gets
/// the conventional layout (`lib/rules`, `docs/rules`, `tests/lib/rules`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GateConfig {
  pub files: FilesConfig,
  pub commands: CommandsConfig,
  pub coverage: CoverageConfig,
  pub perf: PerfConfig,
  pub changelog: ChangelogConfig,
  pub release: ReleaseConfig,
  pub site: SiteConfig,
}

/// A directory + extension predicate selecting one FileSet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileSelector {
  pub dir: PathBuf,
  /// Extension without the leading dot
  pub ext: String,
}

impl FileSelector {
  pub fn new(dir: impl Into<PathBuf>, ext: impl Into<String>) -> Self {
    Self {
      dir: dir.into(),
      ext: ext.into(),
    }
  }

  /// Drop `.` components so `./docs/rules/` and `docs/rules` select the same paths
  pub fn normalize(&mut self) {
    self.dir = self
      .dir
      .components()
      .filter(|c| !matches!(c, Component::CurDir))
      .collect();
  }

  fn validate(&self) -> GateResult<()> {
    if self.dir.as_os_str().is_empty() || self.ext.is_empty() {
      return Err(GateError::message("File selectors need both `dir` and `ext`"));
    }
    if self
      .dir
      .components()
      .any(|c| matches!(c, Component::RootDir | Component::Prefix(_) | Component::ParentDir))
    {
      return Err(GateError::message(format!(
        "Selector dir '{}' must be relative to the project root",
        self.dir.display()
      )));
    }
    if self.ext.starts_with('.') {
      return Err(GateError::message(format!(
        "Extension '{}' must be given without the leading dot",
        self.ext
      )));
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
  /// Rule implementation files
  pub rules: FileSelector,
  /// Rule documentation pages
  pub docs: FileSelector,
  /// Rule test files
  pub tests: FileSelector,
  /// JSON config files handed to the JSON validator
  pub json: Vec<FileSelector>,
  /// Documentation index that must link every rule page
  pub docs_index: PathBuf,
  /// JSON file mapping rule name to its default settings
  pub rule_defaults: PathBuf,
}

impl FilesConfig {
  fn selectors_mut(&mut self) -> impl Iterator<Item = &mut FileSelector> {
    [&mut self.rules, &mut self.docs, &mut self.tests]
      .into_iter()
      .chain(self.json.iter_mut())
  }

  pub fn normalize(&mut self) {
    self.selectors_mut().for_each(FileSelector::normalize);
  }
}

impl Default for FilesConfig {
  fn default() -> Self {
    Self {
      rules: FileSelector::new("lib/rules", "js"),
      docs: FileSelector::new("docs/rules", "md"),
      tests: FileSelector::new("tests/lib/rules", "js"),
      json: vec![FileSelector::new("conf", "json")],
      docs_index: PathBuf::from("README.md"),
      rule_defaults: PathBuf::from("conf/rules.json"),
    }
  }
}

/// Argv templates for the external collaborators
///
/// Placeholders: `{files}` (one argument per path in the task's FileSet),
/// `{statements}` `{branches}` `{functions}` `{lines}` (coverage thresholds).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
  pub lint: Vec<String>,
  pub json: Vec<String>,
  pub test: Vec<String>,
  pub coverage: Vec<String>,
  pub bundle: Vec<String>,
  /// Optional documentation generator, run before the site is republished
  pub docs: Vec<String>,
}

fn argv(parts: &[&str]) -> Vec<String> {
  parts.iter().map(|s| s.to_string()).collect()
}

impl Default for CommandsConfig {
  fn default() -> Self {
    Self {
      lint: argv(&["npx", "eslint", "{files}"]),
      json: argv(&["npx", "jsonlint", "-q", "{files}"]),
      test: argv(&["npx", "istanbul", "cover", "npx", "_mocha", "--", "-R", "dot", "{files}"]),
      coverage: argv(&[
        "npx",
        "istanbul",
        "check-coverage",
        "--statement",
        "{statements}",
        "--branch",
        "{branches}",
        "--function",
        "{functions}",
        "--lines",
        "{lines}",
      ]),
      bundle: argv(&["npx", "browserify", "-r", "./build/bundle.js:project", "-o", "build/project.js"]),
      docs: Vec::new(),
    }
  }
}

/// Minimum coverage percentages, enforced by a separate coverage invocation
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
  pub statements: f64,
  pub branches: f64,
  pub functions: f64,
  pub lines: f64,
}

impl Default for CoverageConfig {
  fn default() -> Self {
    Self {
      statements: 99.0,
      branches: 98.0,
      functions: 99.0,
      lines: 99.0,
    }
  }
}

impl CoverageConfig {
  /// Validate that every threshold is a percentage
  pub fn validate(&self) -> GateResult<()> {
    for (name, value) in [
      ("statements", self.statements),
      ("branches", self.branches),
      ("functions", self.functions),
      ("lines", self.lines),
    ] {
      if !(0.0..=100.0).contains(&value) {
        return Err(GateError::message(format!(
          "Coverage threshold '{}' must be between 0 and 100 (got {})",
          name, value
        )));
      }
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PerfConfig {
  /// Workload timed by the performance gate
  pub command: Vec<String>,
  /// Threshold constant in ms·MHz; the limit is `multiplier / cpu_mhz`
  pub multiplier: f64,
  /// Override for the detected processor clock speed
  pub cpu_mhz: Option<f64>,
  /// Run the gate as part of `test`
  pub in_test_pipeline: bool,
}

impl Default for PerfConfig {
  fn default() -> Self {
    Self {
      command: argv(&["node", "bin/cli.js", "lib", "tests"]),
      multiplier: 13_000_000.0,
      cpu_mhz: None,
      in_test_pipeline: false,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
  pub path: PathBuf,
  /// Subjects matching any of these are dropped as merge noise
  pub merge_patterns: Vec<String>,
  /// chrono format for the header date
  pub date_format: String,
}

impl Default for ChangelogConfig {
  fn default() -> Self {
    Self {
      path: PathBuf::from("CHANGELOG.md"),
      merge_patterns: vec!["^Merge pull request".to_string(), "^Merge branch".to_string()],
      date_format: "%B %-d, %Y".to_string(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
  /// Version bump; `{level}` expands to patch, minor or major
  pub bump: Vec<String>,
  pub publish: Vec<String>,
  pub remote: String,
  /// Branch to push (default: current branch)
  pub branch: Option<String>,
  pub tag_prefix: String,
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      bump: argv(&["npm", "version", "{level}"]),
      publish: argv(&["npm", "publish"]),
      remote: "origin".to_string(),
      branch: None,
      tag_prefix: "v".to_string(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
  /// Checkout of the external site repository (relative to the project root)
  pub repo: PathBuf,
  /// Documentation tree copied into the site
  pub source: PathBuf,
  /// Directory inside the site repository that is cleared and repopulated
  pub target: PathBuf,
  pub link_from: String,
  pub link_to: String,
  pub index_from: String,
  pub index_to: String,
  pub front_matter: String,
  pub remote: String,
  pub branch: String,
  /// `{date}` expands to the current date
  pub commit_message: String,
}

impl Default for SiteConfig {
  fn default() -> Self {
    Self {
      repo: PathBuf::from("../site"),
      source: PathBuf::from("docs"),
      target: PathBuf::from("docs"),
      link_from: ".md".to_string(),
      link_to: ".html".to_string(),
      index_from: "README".to_string(),
      index_to: "index".to_string(),
      front_matter: "---\nlayout: doc\n---\n<!-- Note: This file is generated. Edit the source docs instead. -->\n\n"
        .to_string(),
      remote: "origin".to_string(),
      branch: "main".to_string(),
      commit_message: "Autogenerated new docs at {date}".to_string(),
    }
  }
}

impl GateConfig {
  /// Find config file in search order: gantry.toml, .gantry.toml, .config/gantry.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("gantry.toml"),
      path.join(".gantry.toml"),
      path.join(".config").join("gantry.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config for a project root, falling back to defaults when no file exists
  pub fn load(root: &Path) -> GateResult<Self> {
    match Self::find_config_path(root) {
      Some(path) => Self::load_from(&path),
      None => {
        log::debug!("no gantry.toml under {}, using defaults", root.display());
        Ok(Self::default())
      }
    }
  }

  /// Load config from an explicit file
  pub fn load_from(config_path: &Path) -> GateResult<Self> {
    if !config_path.exists() {
      return Err(GateError::Config(ConfigError::NotFound {
        path: config_path.to_path_buf(),
      }));
    }

    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let mut config: GateConfig = toml_edit::de::from_str(&content).map_err(|e| {
      GateError::Config(ConfigError::Invalid {
        path: config_path.to_path_buf(),
        reason: e.to_string(),
      })
    })?;

    config.files.normalize();
    config.validate().map_err(|e| {
      GateError::Config(ConfigError::Invalid {
        path: config_path.to_path_buf(),
        reason: e.to_string(),
      })
    })?;

    log::debug!("loaded config from {}", config_path.display());
    Ok(config)
  }

  /// Validate values serde cannot check on its own
  pub fn validate(&self) -> GateResult<()> {
    self.coverage.validate()?;

    for pattern in &self.changelog.merge_patterns {
      regex::Regex::new(pattern)?;
    }

    let selectors = [&self.files.rules, &self.files.docs, &self.files.tests]
      .into_iter()
      .chain(self.files.json.iter());
    for selector in selectors {
      selector.validate()?;
    }

    if self.perf.multiplier <= 0.0 {
      return Err(GateError::message("[perf] multiplier must be positive"));
    }
    if let Some(mhz) = self.perf.cpu_mhz
      && mhz <= 0.0
    {
      return Err(GateError::message("[perf] cpu_mhz must be positive"));
    }

    Ok(())
  }
}
