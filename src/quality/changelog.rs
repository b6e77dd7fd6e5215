//! Changelog generation from git history
//!
//! Mines commit subjects and authors between the two most recent tags, drops
//! merge noise, and prepends one formatted block to the changelog file:
//!
//! ```text
//! v1.0.0 - October 18, 2026
//!
//! * New: add `semi` rule (Ada Lovelace)
//! * Fix: crash on empty file (Grace Hopper)
//!
//! ```
//!
//! The file only ever grows at the top. Nothing is deduplicated: generating
//! twice for the same range writes the block twice, so callers run this once
//! per release.

use crate::core::config::ChangelogConfig;
use crate::core::error::{GateResult, ResultExt, ValidationError};
use crate::core::vcs::{LogEntry, SystemGit};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Subject patterns treated as merge noise
#[derive(Debug, Clone)]
pub struct MergeFilter {
  patterns: Vec<Regex>,
}

impl MergeFilter {
  pub fn new(patterns: &[String]) -> GateResult<Self> {
    let patterns = patterns.iter().map(|p| Regex::new(p)).collect::<Result<Vec<_>, _>>()?;
    Ok(Self { patterns })
  }

  pub fn is_merge(&self, subject: &str) -> bool {
    self.patterns.iter().any(|p| p.is_match(subject))
  }
}

/// Tag boundaries of the mined range: `older..newer`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRange {
  pub older: String,
  pub newer: String,
}

impl TagRange {
  /// The two most recent tags, given tags oldest-first
  pub fn latest(tags: &[String]) -> GateResult<Self> {
    match tags {
      [.., older, newer] => Ok(Self {
        older: older.clone(),
        newer: newer.clone(),
      }),
      _ => Err(ValidationError::NotEnoughTags { found: tags.len() }.into()),
    }
  }
}

/// One block of the changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
  pub header: String,
  pub lines: Vec<String>,
}

impl ChangelogEntry {
  /// Build an entry headed by the previous tag and the given date
  pub fn build(range: &TagRange, date: &str, log: &[LogEntry], filter: &MergeFilter) -> Self {
    let lines = log
      .iter()
      .filter(|entry| !filter.is_merge(&entry.subject))
      .map(|entry| format!("* {} ({})", entry.subject, entry.author))
      .collect();

    Self {
      header: format!("{} - {}", range.older, date),
      lines,
    }
  }

  /// Header, blank line, one line per commit, trailing blank line
  pub fn render(&self) -> String {
    let mut out = String::new();
    out.push_str(&self.header);
    out.push_str("\n\n");
    for line in &self.lines {
      out.push_str(line);
      out.push('\n');
    }
    out.push('\n');
    out
  }
}

/// Write `block` before the existing content of `path` (creating it if absent)
pub fn prepend(path: &Path, block: &str) -> GateResult<()> {
  let existing = if path.exists() {
    fs::read_to_string(path).with_context(|| format!("Failed to read changelog {}", path.display()))?
  } else {
    String::new()
  };

  fs::write(path, format!("{}{}", block, existing))
    .with_context(|| format!("Failed to write changelog {}", path.display()))?;
  Ok(())
}

/// Mine the latest tag range of `git` and prepend the entry to the changelog
///
/// Returns the entry that was written.
pub fn generate(git: &SystemGit, root: &Path, config: &ChangelogConfig) -> GateResult<ChangelogEntry> {
  let tags = git.tags_by_creation()?;
  let range = TagRange::latest(&tags)?;
  log::debug!("changelog range {}..{}", range.older, range.newer);

  let log = git.log_range(&range.older, &range.newer)?;
  let filter = MergeFilter::new(&config.merge_patterns)?;
  let date = chrono::Local::now().format(&config.date_format).to_string();

  let entry = ChangelogEntry::build(&range, &date, &log, &filter);
  if entry.lines.is_empty() {
    log::warn!(
      "no changelog-worthy commits between {} and {}; writing header only",
      range.older,
      range.newer
    );
  }

  prepend(&root.join(&config.path), &entry.render())?;
  Ok(entry)
}
