//! External command execution
//!
//! Every collaborator (style checker, JSON validator, test runner, bundler,
//! package registry client) is an opaque argv template. This module expands the
//! template, runs it synchronously and turns a non-zero exit into a
//! `CommandError`. No two commands ever run at the same time.

use crate::core::error::{CommandError, GateError, GateResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A fully expanded command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: PathBuf,
}

impl CommandSpec {
  pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.into(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  /// Expand an argv template
  ///
  /// A template element that is exactly `{files}` is replaced by one argument
  /// per path. Other `{key}` occurrences are substituted textually from `vars`.
  /// Returns `None` for an empty template.
  pub fn from_template(template: &[String], cwd: &Path, files: &[PathBuf], vars: &Vars) -> Option<Self> {
    let mut expanded = Vec::with_capacity(template.len() + files.len());

    for part in template {
      if part == "{files}" {
        expanded.extend(files.iter().map(|f| f.to_string_lossy().to_string()));
        continue;
      }
      expanded.push(vars.substitute(part));
    }

    let mut parts = expanded.into_iter();
    let program = parts.next()?;
    Some(Self {
      program,
      args: parts.collect(),
      cwd: cwd.to_path_buf(),
    })
  }

  /// Human-readable command line (for logs and error messages)
  pub fn display(&self) -> String {
    if self.args.is_empty() {
      self.program.clone()
    } else {
      format!("{} {}", self.program, self.args.join(" "))
    }
  }

  fn to_command(&self) -> Command {
    let mut cmd = Command::new(&self.program);
    cmd.args(&self.args).current_dir(&self.cwd);
    cmd
  }
}

/// Placeholder values for argv templates
#[derive(Debug, Clone, Default)]
pub struct Vars {
  values: HashMap<&'static str, String>,
}

impl Vars {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(mut self, key: &'static str, value: impl ToString) -> Self {
    self.values.insert(key, value.to_string());
    self
  }

  /// Replace every `{key}` in `text` with its value; unknown keys are left as-is
  pub fn substitute(&self, text: &str) -> String {
    let mut out = text.to_string();
    for (key, value) in &self.values {
      out = out.replace(&format!("{{{}}}", key), value);
    }
    out
  }
}

/// Runs external commands
///
/// The seam between task bodies and the host: task code never touches
/// `std::process` directly, so tests can substitute a recording runner.
pub trait CommandRunner {
  /// Run with inherited stdio; a non-zero exit is an error
  fn run(&self, spec: &CommandSpec) -> GateResult<()>;

  /// Run with captured output and return stdout; a non-zero exit is an error
  fn capture(&self, spec: &CommandSpec) -> GateResult<String>;
}

/// Runner backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, spec: &CommandSpec) -> GateResult<()> {
    log::debug!("exec: {} (cwd {})", spec.display(), spec.cwd.display());

    let status = spec
      .to_command()
      .stdin(Stdio::inherit())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .status()
      .map_err(|e| spawn_error(spec, e))?;

    if !status.success() {
      return Err(GateError::Command(CommandError::Failed {
        command: spec.display(),
        code: status.code(),
        stderr: String::new(),
      }));
    }

    Ok(())
  }

  fn capture(&self, spec: &CommandSpec) -> GateResult<String> {
    log::debug!("exec (captured): {} (cwd {})", spec.display(), spec.cwd.display());

    let output = spec
      .to_command()
      .stdin(Stdio::null())
      .output()
      .map_err(|e| spawn_error(spec, e))?;

    if !output.status.success() {
      return Err(GateError::Command(CommandError::Failed {
        command: spec.display(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }
}

fn spawn_error(spec: &CommandSpec, err: std::io::Error) -> GateError {
  GateError::Command(CommandError::Spawn {
    command: spec.display(),
    reason: err.to_string(),
  })
}
