//! Additional operations for SystemGit (tags, log ranges, commit, push, rebase)

use super::LogEntry;
use super::system_git::SystemGit;
use crate::core::error::{GateError, GateResult, GitError};
use std::path::Path;

/// Field separator inside one `git log` line (ASCII unit separator)
const FIELD_SEP: char = '\u{1f}';

impl SystemGit {
  /// List all tags, oldest first by creation date
  pub fn tags_by_creation(&self) -> GateResult<Vec<String>> {
    let stdout = self.run(&["tag", "--list", "--sort=creatordate"])?;
    Ok(
      stdout
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect(),
    )
  }

  /// Most recently created tag, if any
  pub fn latest_tag(&self) -> GateResult<Option<String>> {
    Ok(self.tags_by_creation()?.pop())
  }

  /// Subject and author for every commit in `older..newer`
  ///
  /// Excludes `older`, includes `newer`; newest first, like `git log`.
  pub fn log_range(&self, older: &str, newer: &str) -> GateResult<Vec<LogEntry>> {
    let range = format!("{}..{}", older, newer);
    let format = format!("--format=%s{}%an", FIELD_SEP);
    let stdout = self.run(&["log", &format, &range])?;
    Ok(parse_log_output(&stdout))
  }

  /// Stage specific paths
  pub fn add_paths(&self, paths: &[&Path]) -> GateResult<()> {
    let mut args = vec!["add".to_string(), "--".to_string()];
    args.extend(paths.iter().map(|p| p.to_string_lossy().to_string()));
    let args: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    self.run(&args)?;
    Ok(())
  }

  /// Stage everything, including deletions
  pub fn add_all(&self) -> GateResult<()> {
    self.run(&["add", "-A"])?;
    Ok(())
  }

  /// Whether the index has staged changes
  pub fn has_staged_changes(&self) -> GateResult<bool> {
    let output = self
      .git_cmd()
      .args(["diff", "--cached", "--quiet"])
      .output()
      .map_err(|e| GateError::message(format!("Failed to run git diff: {}", e)))?;

    match output.status.code() {
      Some(0) => Ok(false),
      Some(1) => Ok(true),
      _ => Err(GateError::Git(GitError::CommandFailed {
        command: "git diff --cached --quiet".to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      })),
    }
  }

  /// Commit the index
  pub fn commit(&self, message: &str) -> GateResult<()> {
    self.run(&["commit", "-m", message])?;
    Ok(())
  }

  /// Push a branch together with all tags
  pub fn push_with_tags(&self, remote: &str, branch: &str) -> GateResult<()> {
    println!("   Pushing {} and tags to '{}'...", branch, remote);
    self.push_args(remote, branch, &["push", remote, branch, "--tags"])?;
    println!("   ✅ Pushed to {}/{}", remote, branch);
    Ok(())
  }

  /// Push a branch
  pub fn push(&self, remote: &str, branch: &str) -> GateResult<()> {
    println!("   Pushing to remote '{}'...", remote);
    self.push_args(remote, branch, &["push", remote, branch])?;
    println!("   ✅ Pushed to {}/{}", remote, branch);
    Ok(())
  }

  fn push_args(&self, remote: &str, branch: &str, args: &[&str]) -> GateResult<()> {
    self.run(args).map(|_| ()).map_err(|err| match err {
      GateError::Git(GitError::CommandFailed { stderr, .. }) => GateError::Git(GitError::PushFailed {
        remote: remote.to_string(),
        branch: branch.to_string(),
        reason: stderr,
      }),
      other => other,
    })
  }

  /// Fetch and rebase local commits onto the upstream branch
  ///
  /// Conflicts are not resolved here; the rebase is left for the operator.
  pub fn pull_rebase(&self, remote: &str, branch: &str) -> GateResult<()> {
    println!("   Rebasing onto {}/{}...", remote, branch);
    self.run(&["pull", "--rebase", remote, branch]).map(|_| ()).map_err(|err| match err {
      GateError::Git(GitError::CommandFailed { stderr, .. }) => GateError::Git(GitError::RebaseFailed {
        remote: remote.to_string(),
        branch: branch.to_string(),
        reason: stderr,
      }),
      other => other,
    })
  }
}

/// Parse `git log --format=%s<US>%an` output
fn parse_log_output(stdout: &str) -> Vec<LogEntry> {
  stdout
    .lines()
    .filter(|line| !line.trim().is_empty())
    .map(|line| match line.split_once(FIELD_SEP) {
      Some((subject, author)) => LogEntry {
        subject: subject.trim().to_string(),
        author: author.trim().to_string(),
      },
      None => LogEntry {
        subject: line.trim().to_string(),
        author: String::new(),
      },
    })
    .collect()
}
