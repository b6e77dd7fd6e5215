//! Cross-artifact consistency validation
//!
//! Every rule implementation must have a documentation page linked from the
//! docs index, a default entry in the rule defaults config, and a test file.
//! All rules are checked in one pass; violations are reported as they are found
//! and the caller fails once at the end.

use crate::core::config::{FileSelector, FilesConfig};
use crate::core::error::{GateError, GateResult, ResultExt};
use crate::core::files::FileSet;
use crate::utils::path_to_git_format;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Expected artifacts for one rule implementation file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
  pub name: String,
  pub doc_path: PathBuf,
  pub test_path: PathBuf,
}

impl RuleRecord {
  fn derive(name: &str, docs: &FileSelector, tests: &FileSelector) -> Self {
    Self {
      name: name.to_string(),
      doc_path: docs.dir.join(format!("{}.{}", name, docs.ext)),
      test_path: tests.dir.join(format!("{}.{}", name, tests.ext)),
    }
  }
}

/// What is missing for a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
  MissingDoc,
  UnlinkedDoc,
  MissingDefault,
  MissingTest,
}

/// A single consistency violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
  pub rule: String,
  pub kind: ViolationKind,
  /// The artifact that was expected, when there is one
  pub path: Option<PathBuf>,
}

impl fmt::Display for Violation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match (self.kind, &self.path) {
      (ViolationKind::MissingDoc, Some(path)) => {
        write!(f, "Missing documentation for rule {} ({})", self.rule, path.display())
      }
      (ViolationKind::UnlinkedDoc, Some(path)) => {
        write!(f, "Missing link to documentation for rule {} ({})", self.rule, path.display())
      }
      (ViolationKind::MissingTest, Some(path)) => {
        write!(f, "Missing tests for rule {} ({})", self.rule, path.display())
      }
      (ViolationKind::MissingDefault, _) => {
        write!(f, "Missing default setting for rule {}", self.rule)
      }
      (kind, None) => write!(f, "{:?} for rule {}", kind, self.rule),
    }
  }
}

/// Outcome of one validation pass
#[derive(Debug, Clone, Default)]
pub struct ConsistencyReport {
  /// Number of rule implementation files checked
  pub rules_checked: usize,
  pub violations: Vec<Violation>,
}

impl ConsistencyReport {
  pub fn passed(&self) -> bool {
    self.violations.is_empty()
  }

  pub fn error_count(&self) -> usize {
    self.violations.len()
  }
}

/// Everything the validator cross-checks
pub struct ConsistencyInputs<'a> {
  pub rules: &'a FileSet,
  pub docs: &'a FileSet,
  pub tests: &'a FileSet,
  pub docs_selector: &'a FileSelector,
  pub tests_selector: &'a FileSelector,
  /// Documentation index text and its location (for relative links)
  pub index_text: &'a str,
  pub index_path: &'a Path,
  /// Rule names that have a default configuration entry
  pub defaults: &'a BTreeSet<String>,
}

/// Check every rule; `on_violation` sees each violation the moment it is found
pub fn validate(inputs: &ConsistencyInputs<'_>, mut on_violation: impl FnMut(&Violation)) -> ConsistencyReport {
  let mut report = ConsistencyReport::default();

  for name in inputs.rules.stems() {
    let record = RuleRecord::derive(&name, inputs.docs_selector, inputs.tests_selector);
    report.rules_checked += 1;

    let mut push = |kind: ViolationKind, path: Option<PathBuf>| {
      let violation = Violation {
        rule: record.name.clone(),
        kind,
        path,
      };
      on_violation(&violation);
      report.violations.push(violation);
    };

    if !inputs.docs.contains(&record.doc_path) {
      push(ViolationKind::MissingDoc, Some(record.doc_path.clone()));
    } else if !index_links_to(inputs.index_text, inputs.index_path, &record.doc_path) {
      push(ViolationKind::UnlinkedDoc, Some(record.doc_path.clone()));
    }

    if !inputs.defaults.contains(&record.name) {
      push(ViolationKind::MissingDefault, None);
    }

    if !inputs.tests.contains(&record.test_path) {
      push(ViolationKind::MissingTest, Some(record.test_path.clone()));
    }
  }

  report
}

/// Whether the index text links to `doc_path`
///
/// Accepts inline `[text](path)` and reference `[id]: path` links, with the
/// path written relative to the index file's directory.
pub fn index_links_to(index_text: &str, index_path: &Path, doc_path: &Path) -> bool {
  let base = index_path.parent().unwrap_or(Path::new(""));
  let relative = doc_path.strip_prefix(base).unwrap_or(doc_path);
  let target = path_to_git_format(relative);

  [format!("]({})", target), format!("]({}#", target), format!("]: {}", target)]
    .iter()
    .any(|needle| index_text.contains(needle.as_str()))
}

/// Rule names with a default entry in the defaults JSON
///
/// Accepts either a flat object keyed by rule name or an object whose `rules`
/// key holds that map.
pub fn load_rule_defaults(path: &Path) -> GateResult<BTreeSet<String>> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  parse_rule_defaults(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_rule_defaults(content: &str) -> GateResult<BTreeSet<String>> {
  let value: serde_json::Value = serde_json::from_str(content)?;
  let map = match value.get("rules").and_then(|r| r.as_object()) {
    Some(rules) => rules,
    None => value
      .as_object()
      .ok_or_else(|| GateError::message("Rule defaults must be a JSON object"))?,
  };
  Ok(map.keys().cloned().collect())
}

/// Resolve every input from disk and validate
pub fn check_project(root: &Path, files: &FilesConfig, on_violation: impl FnMut(&Violation)) -> GateResult<ConsistencyReport> {
  let rules = FileSet::resolve(root, &files.rules)?;
  let docs = FileSet::resolve(root, &files.docs)?;
  let tests = FileSet::resolve(root, &files.tests)?;

  let index_abs = root.join(&files.docs_index);
  let index_text = if index_abs.is_file() {
    fs::read_to_string(&index_abs).with_context(|| format!("Failed to read {}", index_abs.display()))?
  } else {
    log::warn!("docs index {} not found; every rule will be reported as unlinked", files.docs_index.display());
    String::new()
  };

  let defaults = load_rule_defaults(&root.join(&files.rule_defaults))?;

  let inputs = ConsistencyInputs {
    rules: &rules,
    docs: &docs,
    tests: &tests,
    docs_selector: &files.docs,
    tests_selector: &files.tests,
    index_text: &index_text,
    index_path: &files.docs_index,
    defaults: &defaults,
  };

  Ok(validate(&inputs, on_violation))
}
