//! Per-run context - build once, pass everywhere
//!
//! ```text
//! main.rs:
//!   GateContext::build() -> &GateContext
//!   |
//!   v
//! commands/*.rs:
//!   fn run_x(ctx: &GateContext)
//! ```

use crate::core::config::GateConfig;
use crate::core::error::GateResult;
use crate::core::exec::{CommandRunner, SystemRunner};
use std::path::{Path, PathBuf};

/// Everything a task body needs: where the project lives, how it is
/// configured, and how to run external commands.
pub struct GateContext {
  /// Project root directory (absolute path)
  pub root: PathBuf,

  pub config: GateConfig,

  pub runner: Box<dyn CommandRunner>,
}

impl GateContext {
  /// Build the context for a project root
  ///
  /// `config_path` overrides the gantry.toml search.
  pub fn build(root: &Path, config_path: Option<&Path>) -> GateResult<Self> {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let config = match config_path {
      Some(path) => GateConfig::load_from(path)?,
      None => GateConfig::load(&root)?,
    };

    Ok(Self::with_runner(root, config, Box::new(SystemRunner)))
  }

  /// Assemble a context from parts (tests swap in their own runner)
  pub fn with_runner(root: PathBuf, config: GateConfig, runner: Box<dyn CommandRunner>) -> Self {
    Self { root, config, runner }
  }

  /// Get project root as Path reference (convenience)
  pub fn root(&self) -> &Path {
    &self.root
  }
}
