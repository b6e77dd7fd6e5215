pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

/// One commit in a log range, as mined for the changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
  pub subject: String,
  pub author: String,
}
