//! Error types for gantry with contextual messages and exit codes
//!
//! Every failure in a task chain ends up here. The categories mirror the ways a
//! chain can halt: an external command exiting non-zero, a git plumbing call
//! failing, a gate rejecting the project (consistency, performance, changelog
//! anomalies), or the task graph itself being malformed.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for gantry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// Any failure: bad config or task name, a failed command or gate
  Failure = 1,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for gantry
#[derive(Debug)]
pub enum GateError {
  /// Configuration errors
  Config(ConfigError),

  /// External command failures
  Command(CommandError),

  /// Git operation errors
  Git(GitError),

  /// Task registry errors
  Task(TaskError),

  /// Gate rejections (consistency, performance, changelog)
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl GateError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    GateError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      GateError::Message { message, context, help } => GateError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      GateError::Io(err) => GateError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the exit code for this error
  ///
  /// A run either succeeds or fails; every category exits with the same code.
  pub fn exit_code(&self) -> ExitCode {
    ExitCode::Failure
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      GateError::Config(e) => e.help_message(),
      GateError::Command(e) => e.help_message(),
      GateError::Git(e) => e.help_message(),
      GateError::Task(e) => e.help_message(),
      GateError::Validation(e) => e.help_message(),
      GateError::Message { help, .. } => help.clone(),
      GateError::Io(_) => None,
    }
  }
}

impl fmt::Display for GateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GateError::Config(e) => write!(f, "{}", e),
      GateError::Command(e) => write!(f, "{}", e),
      GateError::Git(e) => write!(f, "{}", e),
      GateError::Task(e) => write!(f, "{}", e),
      GateError::Validation(e) => write!(f, "{}", e),
      GateError::Io(e) => write!(f, "I/O error: {}", e),
      GateError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for GateError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      GateError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for GateError {
  fn from(err: io::Error) -> Self {
    GateError::Io(err)
  }
}

impl From<ValidationError> for GateError {
  fn from(err: ValidationError) -> Self {
    GateError::Validation(err)
  }
}

impl From<String> for GateError {
  fn from(msg: String) -> Self {
    GateError::message(msg)
  }
}

impl From<&str> for GateError {
  fn from(msg: &str) -> Self {
    GateError::message(msg)
  }
}

impl From<toml_edit::de::Error> for GateError {
  fn from(err: toml_edit::de::Error) -> Self {
    GateError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for GateError {
  fn from(err: serde_json::Error) -> Self {
    GateError::message(format!("JSON error: {}", err))
  }
}

impl From<regex::Error> for GateError {
  fn from(err: regex::Error) -> Self {
    GateError::message(format!("Invalid pattern: {}", err))
  }
}

impl From<glob::PatternError> for GateError {
  fn from(err: glob::PatternError) -> Self {
    GateError::message(format!("Invalid file pattern: {}", err))
  }
}

impl From<semver::Error> for GateError {
  fn from(err: semver::Error) -> Self {
    GateError::message(format!("Invalid version: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Config file given explicitly but absent
  NotFound { path: PathBuf },

  /// Config file present but unusable
  Invalid { path: PathBuf, reason: String },

  /// A task needs a command template that is empty
  MissingCommand { task: String, key: String },

  /// Host processor speed could not be determined
  CpuSpeedUnknown,
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Omit --config to use gantry.toml from the project root, or defaults if absent.".to_string())
      }
      ConfigError::MissingCommand { key, .. } => Some(format!(
        "Set `{}` under [commands] (or the matching section) in gantry.toml.",
        key
      )),
      ConfigError::CpuSpeedUnknown => Some("Set `cpu_mhz` under [perf] in gantry.toml.".to_string()),
      ConfigError::Invalid { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "Config file not found: {}", path.display())
      }
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
      ConfigError::MissingCommand { task, key } => {
        write!(f, "Task '{}' has no command configured ({})", task, key)
      }
      ConfigError::CpuSpeedUnknown => {
        write!(f, "Could not detect the processor clock speed")
      }
    }
  }
}

/// External command failures
#[derive(Debug)]
pub enum CommandError {
  /// The program could not be started at all
  Spawn { command: String, reason: String },

  /// The program ran and exited non-zero (or was killed by a signal)
  Failed {
    command: String,
    code: Option<i32>,
    stderr: String,
  },
}

impl CommandError {
  fn help_message(&self) -> Option<String> {
    match self {
      CommandError::Spawn { command, .. } => {
        let program = command.split_whitespace().next().unwrap_or(command);
        Some(format!("Check that `{}` is installed and on PATH.", program))
      }
      CommandError::Failed { .. } => None,
    }
  }
}

impl fmt::Display for CommandError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CommandError::Spawn { command, reason } => {
        write!(f, "Failed to execute `{}`: {}", command, reason)
      }
      CommandError::Failed { command, code, stderr } => {
        match code {
          Some(code) => write!(f, "`{}` failed with exit code {}", command, code)?,
          None => write!(f, "`{}` was terminated by a signal", command)?,
        }
        let stderr = stderr.trim();
        if !stderr.is_empty() {
          write!(f, "\n{}", stderr)?;
        }
        Ok(())
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed {
    remote: String,
    branch: String,
    reason: String,
  },

  /// Rebase onto upstream failed (never auto-resolved)
  RebaseFailed {
    remote: String,
    branch: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("non-fast-forward") {
          Some("The remote has commits you don't have. Pull first, then rerun the task.".to_string())
        } else if reason.contains("permission denied") || reason.contains("403") {
          Some("Check your SSH key permissions and remote access.".to_string())
        } else {
          None
        }
      }
      GitError::RebaseFailed { .. } => {
        Some("Resolve the conflicts in the site checkout by hand (or `git rebase --abort`), then rerun `gantry docs`.".to_string())
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Initialize the repository first or check the path: {}",
        path.display()
      )),
      GitError::CommandFailed { .. } => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed { remote, branch, reason } => {
        write!(f, "Push to {}/{} failed: {}", remote, branch, reason)
      }
      GitError::RebaseFailed { remote, branch, reason } => {
        write!(f, "Rebase onto {}/{} failed: {}", remote, branch, reason)
      }
    }
  }
}

/// Task registry errors
#[derive(Debug)]
pub enum TaskError {
  /// No task registered under this name
  Unknown { name: String, available: Vec<String> },

  /// A task lists a prerequisite that is not registered
  UnknownDependency { task: String, dependency: String },

  /// The prerequisite graph contains a cycle through this task
  Cycle { task: String },
}

impl TaskError {
  fn help_message(&self) -> Option<String> {
    match self {
      TaskError::Unknown { available, .. } => Some(format!("Available tasks: {}", available.join(", "))),
      TaskError::Cycle { .. } => Some("Remove one of the prerequisites forming the loop.".to_string()),
      TaskError::UnknownDependency { .. } => None,
    }
  }
}

impl fmt::Display for TaskError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TaskError::Unknown { name, .. } => write!(f, "Unknown task '{}'", name),
      TaskError::UnknownDependency { task, dependency } => {
        write!(f, "Task '{}' depends on unknown task '{}'", task, dependency)
      }
      TaskError::Cycle { task } => write!(f, "Task dependency cycle detected involving '{}'", task),
    }
  }
}

/// Gate rejections
#[derive(Debug)]
pub enum ValidationError {
  /// One or more rule artifacts are missing
  Consistency { errors: usize, rules: usize },

  /// Median trial duration exceeded the machine-normalized limit
  PerformanceRegression { median_ms: f64, limit_ms: f64 },

  /// Not enough version tags to bound a changelog range
  NotEnoughTags { found: usize },

  /// A statistic was requested over zero samples
  NoSamples,
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::Consistency { .. } => {
        Some("Every rule needs a doc page linked from the index, a default config entry and a test file.".to_string())
      }
      ValidationError::NotEnoughTags { .. } => {
        Some("The changelog is mined between the two most recent tags; tag at least two releases first.".to_string())
      }
      ValidationError::PerformanceRegression { .. } | ValidationError::NoSamples => None,
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::Consistency { errors, rules } => {
        write!(f, "Rule consistency check failed: {} error(s) across {} rule(s)", errors, rules)
      }
      ValidationError::PerformanceRegression { median_ms, limit_ms } => {
        write!(
          f,
          "Performance budget exceeded: median {:.0}ms > limit {:.0}ms",
          median_ms, limit_ms
        )
      }
      ValidationError::NotEnoughTags { found } => {
        write!(f, "Need at least two tags to generate a changelog (found {})", found)
      }
      ValidationError::NoSamples => write!(f, "No performance samples were collected"),
    }
  }
}

/// Result type alias for gantry
pub type GateResult<T> = Result<T, GateError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> GateResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> GateResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<GateError>,
{
  fn context(self, ctx: impl Into<String>) -> GateResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> GateResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &GateError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
