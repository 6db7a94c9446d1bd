//! Copying a built archive into an application server's deploy directory.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::ThemeConfig;
use crate::consts::DEPLOY_PATH_ENV;

use super::PackageError;

/// Pick the deploy directory: an explicit choice, then the
/// `THEMEFORGE_DEPLOY_PATH` environment variable, then `deployPath` from
/// the descriptor (relative to the project root).
pub fn resolve_deploy_dir(explicit: Option<&Path>, config: &ThemeConfig, project_root: &Path) -> Option<PathBuf> {
  if let Some(dir) = explicit {
    return Some(dir.to_path_buf());
  }
  if let Ok(dir) = std::env::var(DEPLOY_PATH_ENV)
    && !dir.trim().is_empty()
  {
    return Some(PathBuf::from(dir));
  }
  config.deploy_path.as_ref().map(|p| project_root.join(p))
}

/// Copy `archive` into `deploy_dir`, creating it if needed.
///
/// Returns the path of the deployed copy.
pub async fn deploy_archive(archive: &Path, deploy_dir: &Path) -> Result<PathBuf, PackageError> {
  if !archive.is_file() {
    return Err(PackageError::MissingArchive {
      path: archive.to_path_buf(),
    });
  }
  let file_name = archive.file_name().ok_or_else(|| PackageError::MissingArchive {
    path: archive.to_path_buf(),
  })?;

  tokio::fs::create_dir_all(deploy_dir)
    .await
    .map_err(|source| PackageError::Destination {
      path: deploy_dir.to_path_buf(),
      source,
    })?;

  let target = deploy_dir.join(file_name);
  tokio::fs::copy(archive, &target)
    .await
    .map_err(|source| PackageError::Destination {
      path: target.clone(),
      source,
    })?;

  info!(archive = %archive.display(), target = %target.display(), "archive deployed");
  Ok(target)
}
