//! Utility functions for cross-platform path handling

use std::path::Path;

/// Convert a path to link/Git format (always forward slashes)
///
/// Markdown links and Git both expect forward slashes, even on Windows.
pub fn path_to_git_format(path: &Path) -> String {
  // On Windows, convert backslashes to forward slashes
  // On Unix, this is a no-op since paths already use forward slashes
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}
