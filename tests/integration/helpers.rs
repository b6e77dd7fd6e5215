//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Commands that always succeed, so only the gate under test can fail
pub const PASSING_COMMANDS: &str = r#"
[commands]
lint = ["true"]
json = ["true"]
test = ["true"]
coverage = ["true"]
bundle = ["true"]
"#;

/// A throwaway project inside a git repository
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Create an empty project with one initial commit
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("project");
    std::fs::create_dir_all(&path)?;

    init_repo(&path)?;
    std::fs::write(path.join("README.md"), "# project\n")?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial commit"])?;

    Ok(Self { _root: root, path })
  }

  /// Directory next to the project (for site checkouts and remotes)
  pub fn sibling(&self, name: &str) -> PathBuf {
    self.path.parent().map(|p| p.join(name)).unwrap_or_else(|| PathBuf::from(name))
  }

  /// Write a file, creating parent directories
  pub fn write(&self, rel: &str, content: &str) -> Result<()> {
    let path = self.path.join(rel);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
  }

  /// A rule with implementation, doc page, index link, default and test
  pub fn add_complete_rule(&self, name: &str) -> Result<()> {
    self.write(&format!("lib/rules/{}.js", name), "module.exports = {};\n")?;
    self.write(&format!("docs/rules/{}.md", name), &format!("# {}\n", name))?;
    self.write(&format!("tests/lib/rules/{}.js", name), "// tests\n")?;

    let index = self.read_file("README.md").unwrap_or_default();
    self.write(
      "README.md",
      &format!("{}* [{}](docs/rules/{}.md)\n", index, name, name),
    )?;

    let defaults_path = self.path.join("conf/rules.json");
    let mut defaults: serde_json::Map<String, serde_json::Value> = if defaults_path.exists() {
      serde_json::from_str(&std::fs::read_to_string(&defaults_path)?)?
    } else {
      serde_json::Map::new()
    };
    defaults.insert(name.to_string(), serde_json::json!(2));
    self.write("conf/rules.json", &serde_json::to_string_pretty(&defaults)?)?;
    Ok(())
  }

  /// Commit everything with a fixed author and date
  pub fn commit_as(&self, message: &str, author: &str, date: &str) -> Result<()> {
    git(&self.path, &["add", "-A"])?;
    let output = Command::new("git")
      .current_dir(&self.path)
      .args(["commit", "--allow-empty", "-m", message])
      .env("GIT_AUTHOR_NAME", author)
      .env("GIT_AUTHOR_EMAIL", "author@example.com")
      .env("GIT_AUTHOR_DATE", date)
      .env("GIT_COMMITTER_DATE", date)
      .output()
      .context("Failed to run git commit")?;
    if !output.status.success() {
      anyhow::bail!("git commit failed: {}", String::from_utf8_lossy(&output.stderr));
    }
    Ok(())
  }

  pub fn tag(&self, name: &str) -> Result<()> {
    git(&self.path, &["tag", name])?;
    Ok(())
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Subjects of the last `n` commits, newest first
  pub fn git_log(&self, n: usize) -> Result<Vec<String>> {
    let output = git(&self.path, &["log", &format!("-{}", n), "--format=%s"])?;
    Ok(String::from_utf8_lossy(&output.stdout).lines().map(String::from).collect())
  }
}

/// `git init` on main with a local identity
pub fn init_repo(path: &Path) -> Result<()> {
  git(path, &["init", "--initial-branch=main"])?;
  git(path, &["config", "user.name", "Test User"])?;
  git(path, &["config", "user.email", "test@example.com"])?;
  Ok(())
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the gantry binary; the caller inspects the exit status
pub fn run_gantry(cwd: &Path, args: &[&str]) -> Result<Output> {
  let gantry_bin = env!("CARGO_BIN_EXE_gantry");

  Command::new(gantry_bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run gantry")
}

/// Run the gantry binary and require success
pub fn run_gantry_ok(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_gantry(cwd, args)?;
  if !output.status.success() {
    anyhow::bail!(
      "gantry {} failed\nstdout: {}\nstderr: {}",
      args.join(" "),
      String::from_utf8_lossy(&output.stdout),
      String::from_utf8_lossy(&output.stderr)
    );
  }
  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
