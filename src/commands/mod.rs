//! Task bodies
//!
//! One file per built-in task. Every body takes the shared `&GateContext`,
//! runs its external commands through the context's runner and returns on the
//! first failure:
//!
//! - **lint**: style checker over rule and rule-test files, JSON validator
//! - **check_rules**: cross-artifact consistency of every rule
//! - **unit**: test runner, then coverage threshold enforcement
//! - **bundle**: browser bundle
//! - **perf**: median-of-three performance gate
//! - **changelog**: changelog entry from the two latest tags
//! - **docs**: optional doc generator, then site republish
//! - **release**: the individual release steps (bump, changelog commit, push, publish)

pub mod bundle;
pub mod changelog;
pub mod check_rules;
pub mod docs;
pub mod lint;
pub mod perf;
pub mod release;
pub mod unit;

pub use bundle::run_bundle;
pub use changelog::run_changelog;
pub use check_rules::run_check_rules;
pub use docs::run_docs;
pub use lint::run_lint;
pub use perf::run_perf;
pub use unit::run_unit;

use crate::core::error::{ConfigError, GateError, GateResult};
use crate::core::exec::{CommandSpec, Vars};
use std::path::{Path, PathBuf};

/// Expand a configured argv template, failing if it is empty
pub(crate) fn command_for(
  task: &str,
  key: &str,
  template: &[String],
  cwd: &Path,
  files: &[PathBuf],
  vars: &Vars,
) -> GateResult<CommandSpec> {
  CommandSpec::from_template(template, cwd, files, vars).ok_or_else(|| {
    GateError::Config(ConfigError::MissingCommand {
      task: task.to_string(),
      key: key.to_string(),
    })
  })
}
