//! Seed a theme's sources from another theme.
//!
//! Backs the `theme kickstart` command: the asset folders of an existing
//! theme (`css`, `images`, `js`, `templates` under its `src/`) are copied
//! into the working theme's `src/`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{ASSET_DIRS, SRC_DIR};
use crate::util::fs::{FsError, list_files, relative_key};

#[derive(Debug, Error)]
pub enum KickstartError {
  #[error("theme not found: {}", path.display())]
  ThemeNotFound { path: PathBuf },

  #[error("{} has no css, images, js or templates to copy", path.display())]
  NoAssets { path: PathBuf },

  #[error("{} file(s) already exist, first: {}", paths.len(), paths[0].display())]
  Conflicts { paths: Vec<PathBuf> },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Fs(#[from] FsError),
}

/// Options for kickstarting a theme.
pub struct KickstartOptions {
  /// Root of the theme to copy from (the directory holding its `src/`).
  pub theme_path: PathBuf,
  /// Root of the working theme.
  pub project_dir: PathBuf,
  /// Overwrite files that already exist.
  pub force: bool,
}

/// Result of a kickstart.
#[derive(Debug)]
pub struct KickstartResult {
  pub source_dir: PathBuf,
  pub target_dir: PathBuf,
  /// Copied files, relative to `src/`.
  pub copied: Vec<String>,
  /// Existing files that were overwritten.
  pub overwritten: Vec<PathBuf>,
}

/// One file to copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KickstartFile {
  pub relative: String,
  pub from: PathBuf,
  pub to: PathBuf,
}

/// Files that a kickstart from `theme_path` would copy into `project_dir`.
pub fn plan(theme_path: &Path, project_dir: &Path) -> Result<Vec<KickstartFile>, KickstartError> {
  let source_dir = theme_path.join(SRC_DIR);
  if !theme_path.is_dir() {
    return Err(KickstartError::ThemeNotFound {
      path: theme_path.to_path_buf(),
    });
  }
  let target_dir = project_dir.join(SRC_DIR);

  let mut files = Vec::new();
  for kind in ASSET_DIRS {
    let dir = source_dir.join(kind);
    if !dir.is_dir() {
      debug!(path = %dir.display(), "no {kind} to kickstart from");
      continue;
    }
    for from in list_files(&dir)? {
      let relative = relative_key(&source_dir, &from);
      files.push(KickstartFile {
        to: target_dir.join(&relative),
        relative,
        from,
      });
    }
  }

  if files.is_empty() {
    return Err(KickstartError::NoAssets { path: source_dir });
  }
  Ok(files)
}

/// Planned files whose target already exists.
pub fn conflicts(files: &[KickstartFile]) -> Vec<PathBuf> {
  files.iter().filter(|f| f.to.exists()).map(|f| f.to.clone()).collect()
}

/// Copy a theme's assets into the working theme.
///
/// # Errors
///
/// Returns [`KickstartError::Conflicts`] without copying anything when a
/// target file exists and `force` is not set.
pub fn kickstart(options: &KickstartOptions) -> Result<KickstartResult, KickstartError> {
  let files = plan(&options.theme_path, &options.project_dir)?;

  let overwritten = conflicts(&files);
  if !overwritten.is_empty() && !options.force {
    return Err(KickstartError::Conflicts { paths: overwritten });
  }

  let mut copied = Vec::with_capacity(files.len());
  for file in files {
    if let Some(parent) = file.to.parent() {
      fs::create_dir_all(parent).map_err(|e| FsError::io("create directory", parent, e))?;
    }
    fs::copy(&file.from, &file.to).map_err(|source| KickstartError::Copy {
      from: file.from.clone(),
      to: file.to.clone(),
      source,
    })?;
    copied.push(file.relative);
  }

  let result = KickstartResult {
    source_dir: options.theme_path.join(SRC_DIR),
    target_dir: options.project_dir.join(SRC_DIR),
    copied,
    overwritten,
  };
  info!(
    from = %result.source_dir.display(),
    files = result.copied.len(),
    overwritten = result.overwritten.len(),
    "kickstarted theme"
  );
  Ok(result)
}
