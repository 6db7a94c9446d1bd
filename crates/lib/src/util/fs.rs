//! Blocking filesystem helpers shared by the build stages.
//!
//! Every helper is synchronous; async stages call them through
//! `tokio::task::spawn_blocking`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum FsError {
  #[error("failed to {op} {}: {source}", path.display())]
  Io {
    op: &'static str,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to walk {}: {message}", path.display())]
  Walk { path: PathBuf, message: String },
}

impl FsError {
  pub fn io(op: &'static str, path: &Path, source: std::io::Error) -> Self {
    FsError::Io {
      op,
      path: path.to_path_buf(),
      source,
    }
  }
}

/// Path of `path` relative to `root`, `/`-separated on every platform.
///
/// Used as the key for filters, archive entries and fingerprints.
pub fn relative_key(root: &Path, path: &Path) -> String {
  let rel = path.strip_prefix(root).unwrap_or(path);
  rel
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}

/// Copy every file below `src` into `dest`, keeping relative paths.
///
/// Existing files in `dest` are overwritten whole; nothing in `src` is
/// modified. `keep` receives the relative key of each file and directory
/// and can veto it (a vetoed directory is not descended into).
/// Returns the number of files copied.
pub fn copy_tree(src: &Path, dest: &Path, keep: &dyn Fn(&str) -> bool) -> Result<usize, FsError> {
  let mut copied = 0;

  let walker = WalkDir::new(src)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|e| e.depth() == 0 || keep(&relative_key(src, e.path())));

  for entry in walker {
    let entry = entry.map_err(|e| FsError::Walk {
      path: src.to_path_buf(),
      message: e.to_string(),
    })?;
    let rel = relative_key(src, entry.path());
    let target = if rel.is_empty() { dest.to_path_buf() } else { dest.join(&rel) };

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).map_err(|e| FsError::io("create directory", &target, e))?;
    } else if entry.file_type().is_file() {
      if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| FsError::io("create directory", parent, e))?;
      }
      fs::copy(entry.path(), &target).map_err(|e| FsError::io("copy", entry.path(), e))?;
      copied += 1;
    }
  }

  debug!(src = %src.display(), dest = %dest.display(), files = copied, "copied tree");
  Ok(copied)
}

/// Remove a directory tree. Returns `false` when there was nothing to remove.
pub fn remove_dir_if_exists(path: &Path) -> Result<bool, FsError> {
  match fs::remove_dir_all(path) {
    Ok(()) => Ok(true),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
    Err(e) => Err(FsError::io("remove", path, e)),
  }
}

/// All regular files below `root`, sorted by path.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>, FsError> {
  let mut files = Vec::new();
  for entry in WalkDir::new(root).sort_by_file_name() {
    let entry = entry.map_err(|e| FsError::Walk {
      path: root.to_path_buf(),
      message: e.to_string(),
    })?;
    if entry.file_type().is_file() {
      files.push(entry.into_path());
    }
  }
  Ok(files)
}

/// Write `contents`, creating parent directories as needed.
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), FsError> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(|e| FsError::io("create directory", parent, e))?;
  }
  fs::write(path, contents).map_err(|e| FsError::io("write", path, e))
}
