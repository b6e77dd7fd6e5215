//! Progress indicators for long-running operations
//!
//! Uses `linya` for allocation-free progress bars drawn to stderr.

use linya::{Bar, Progress};

/// Progress bar wrapper for file operations
///
/// A zero-length job draws nothing.
pub struct FileProgress {
  inner: Option<(Progress, Bar)>,
}

impl FileProgress {
  /// Create a new progress bar for file transformations
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    if total == 0 {
      return Self { inner: None };
    }
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self {
      inner: Some((progress, bar)),
    }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    if let Some((progress, bar)) = self.inner.as_mut() {
      progress.inc_and_draw(bar, 1);
    }
  }
}
