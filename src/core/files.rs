//! File set resolution
//!
//! A FileSet is the ordered, de-duplicated list of files directly inside a
//! directory with a given extension. Sets are resolved fresh every time a task
//! asks for one; nothing is cached between tasks.

use crate::core::config::FileSelector;
use crate::core::error::{GateError, GateResult};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Resolved files for one selector, relative to the project root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
  paths: Vec<PathBuf>,
}

impl FileSet {
  /// Resolve a selector against the project root
  ///
  /// A missing directory yields an empty set.
  pub fn resolve(root: &Path, selector: &FileSelector) -> GateResult<Self> {
    let dir = root.join(&selector.dir);
    if !dir.is_dir() {
      log::debug!("file set {}/*.{} is empty (no directory)", selector.dir.display(), selector.ext);
      return Ok(Self::default());
    }

    let dir_str = dir
      .to_str()
      .ok_or_else(|| GateError::message(format!("Non UTF-8 path: {}", dir.display())))?;
    let pattern = format!(
      "{}{}*.{}",
      glob::Pattern::escape(dir_str),
      std::path::MAIN_SEPARATOR,
      glob::Pattern::escape(&selector.ext)
    );

    let mut paths = BTreeSet::new();
    for entry in glob::glob(&pattern)? {
      let path = entry.map_err(|e| GateError::message(format!("Failed to read {}: {}", e.path().display(), e)))?;
      if !path.is_file() {
        continue;
      }
      let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
      paths.insert(relative);
    }

    Ok(Self {
      paths: paths.into_iter().collect(),
    })
  }

  /// Resolve several selectors into one set (union, still ordered)
  pub fn resolve_all<'a>(root: &Path, selectors: impl IntoIterator<Item = &'a FileSelector>) -> GateResult<Self> {
    let mut merged = BTreeSet::new();
    for selector in selectors {
      merged.extend(Self::resolve(root, selector)?.paths);
    }
    Ok(Self {
      paths: merged.into_iter().collect(),
    })
  }

  pub fn paths(&self) -> &[PathBuf] {
    &self.paths
  }

  pub fn len(&self) -> usize {
    self.paths.len()
  }

  pub fn is_empty(&self) -> bool {
    self.paths.is_empty()
  }

  /// File stems (base names without extension), in set order
  pub fn stems(&self) -> Vec<String> {
    self
      .paths
      .iter()
      .filter_map(|p| p.file_stem())
      .map(|s| s.to_string_lossy().to_string())
      .collect()
  }

  pub fn contains(&self, path: &Path) -> bool {
    self.paths.binary_search_by(|p| p.as_path().cmp(path)).is_ok()
  }
}
