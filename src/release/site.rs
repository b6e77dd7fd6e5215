//! Documentation site publisher
//!
//! Copies the project's docs tree into a checkout of the external site
//! repository, rewrites each page for the site (link extensions, README →
//! index, front matter), then commits, rebases onto upstream and pushes.

use crate::core::config::SiteConfig;
use crate::core::error::{GateError, GateResult, ResultExt};
use crate::core::vcs::SystemGit;
use crate::ui::progress::FileProgress;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};

/// Stages and publishes the docs tree
pub struct SitePublisher<'a> {
  project_root: &'a Path,
  config: &'a SiteConfig,
}

impl<'a> SitePublisher<'a> {
  pub fn new(project_root: &'a Path, config: &'a SiteConfig) -> Self {
    Self { project_root, config }
  }

  /// Absolute path of the site checkout
  pub fn site_root(&self) -> PathBuf {
    self.project_root.join(&self.config.repo)
  }

  /// Clear the target directory and repopulate it with rewritten docs
  ///
  /// Returns the number of pages rewritten.
  pub fn stage(&self) -> GateResult<usize> {
    let source = self.project_root.join(&self.config.source);
    if !source.is_dir() {
      return Err(GateError::message(format!("Docs directory not found: {}", source.display())));
    }
    let target = self.site_root().join(&self.config.target);

    if target.exists() {
      fs::remove_dir_all(&target).with_context(|| format!("Failed to clear {}", target.display()))?;
    }
    let copied = copy_tree(&source, &target)?;

    let root_readme = target.join(format!("{}{}", self.config.index_from, self.config.link_from));
    if root_readme.is_file() {
      let index = target.join(format!("{}{}", self.config.index_to, self.config.link_from));
      fs::rename(&root_readme, &index).with_context(|| format!("Failed to rename {}", root_readme.display()))?;
    }

    let pages: Vec<PathBuf> = list_files(&target)?
      .into_iter()
      .filter(|p| p.to_string_lossy().ends_with(&self.config.link_from))
      .collect();

    let rewriter = PageRewriter::new(self.config)?;
    let mut progress = FileProgress::new(pages.len(), "Rewriting docs");
    for page in &pages {
      let text = fs::read_to_string(page).with_context(|| format!("Failed to read {}", page.display()))?;
      fs::write(page, rewriter.rewrite(&text)).with_context(|| format!("Failed to write {}", page.display()))?;
      progress.inc();
    }

    log::debug!("staged {} files ({} pages) into {}", copied, pages.len(), target.display());
    Ok(pages.len())
  }

  /// Stage, commit, rebase onto upstream and push
  pub fn publish(&self) -> GateResult<()> {
    let git = SystemGit::open(&self.site_root())?;
    let pages = self.stage()?;
    println!("   Staged {} page(s) into {}", pages, self.site_root().join(&self.config.target).display());

    git.add_all()?;
    if !git.has_staged_changes()? {
      println!("   Site already up to date, nothing to commit");
      return Ok(());
    }

    let date = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    git.commit(&self.config.commit_message.replace("{date}", &date))?;
    git.pull_rebase(&self.config.remote, &self.config.branch)?;
    git.push(&self.config.remote, &self.config.branch)?;
    Ok(())
  }
}

/// Rewrites one markdown page for the site
pub struct PageRewriter<'a> {
  config: &'a SiteConfig,
  inline: Regex,
  reference: Regex,
}

impl<'a> PageRewriter<'a> {
  pub fn new(config: &'a SiteConfig) -> GateResult<Self> {
    let ext = regex::escape(&config.link_from);
    // [text](target.md#anchor) and [id]: target.md#anchor
    let inline = Regex::new(&format!(r"\]\(([^)\s]*?){}(#[^)\s]*)?\)", ext))?;
    let reference = Regex::new(&format!(r"(?m)^(\s*\[[^\]]+\]:\s*)(\S*?){}(#\S*)?$", ext))?;
    Ok(Self {
      config,
      inline,
      reference,
    })
  }

  /// Front matter followed by the page with intra-doc links rewritten
  pub fn rewrite(&self, text: &str) -> String {
    let body = self.inline.replace_all(text, |caps: &Captures<'_>| {
      let anchor = caps.get(2).map_or("", |m| m.as_str());
      format!("]({}{})", self.retarget(&caps[1]), anchor)
    });
    let body = self.reference.replace_all(&body, |caps: &Captures<'_>| {
      let anchor = caps.get(3).map_or("", |m| m.as_str());
      format!("{}{}{}", &caps[1], self.retarget(&caps[2]), anchor)
    });

    format!("{}{}", self.config.front_matter, body)
  }

  /// `path/README` → `path/index.html`; external URLs stay untouched
  fn retarget(&self, stem_path: &str) -> String {
    if stem_path.contains("://") {
      return format!("{}{}", stem_path, self.config.link_from);
    }
    let (dir, stem) = match stem_path.rsplit_once('/') {
      Some((dir, stem)) => (format!("{}/", dir), stem),
      None => (String::new(), stem_path),
    };
    let stem = if stem == self.config.index_from {
      self.config.index_to.as_str()
    } else {
      stem
    };
    format!("{}{}{}", dir, stem, self.config.link_to)
  }
}

/// Recursively copy `from` into `to`, returning the number of files copied
fn copy_tree(from: &Path, to: &Path) -> GateResult<usize> {
  fs::create_dir_all(to).with_context(|| format!("Failed to create {}", to.display()))?;
  let mut copied = 0;

  for entry in fs::read_dir(from).with_context(|| format!("Failed to read {}", from.display()))? {
    let entry = entry?;
    let file_type = entry.file_type()?;
    let dest = to.join(entry.file_name());
    if file_type.is_dir() {
      copied += copy_tree(&entry.path(), &dest)?;
    } else if file_type.is_file() {
      fs::copy(entry.path(), &dest).with_context(|| format!("Failed to copy {}", entry.path().display()))?;
      copied += 1;
    }
  }

  Ok(copied)
}

/// Every regular file below `dir`, sorted
fn list_files(dir: &Path) -> GateResult<Vec<PathBuf>> {
  let mut files = Vec::new();
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    let path = entry.path();
    if entry.file_type()?.is_dir() {
      files.extend(list_files(&path)?);
    } else {
      files.push(path);
    }
  }
  files.sort();
  Ok(files)
}
