//! Implementation of the `theme deploy` command.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use themeforge_lib::config::ThemeConfig;
use themeforge_lib::config::ThemePaths;
use themeforge_lib::package::{PackageError, deploy_archive, resolve_deploy_dir};

use crate::output::{print_stat, print_success};

/// Copy the last built archive into the deploy directory.
///
/// The directory comes from `--to`, then `THEMEFORGE_DEPLOY_PATH`, then
/// `deployPath` in `package.json`.
pub fn cmd_deploy(dir: &Path, to: Option<&Path>) -> Result<()> {
  let config = ThemeConfig::load(dir).context("Failed to load theme")?;
  let paths = ThemePaths::new(dir, &config);
  let archive = paths.archive(&config);

  let target_dir = resolve_deploy_dir(to, &config, dir).ok_or(PackageError::NoDeployTarget)?;
  debug!(archive = %archive.display(), target = %target_dir.display(), "deploying");

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let deployed = rt
    .block_on(deploy_archive(&archive, &target_dir))
    .context("Deploy failed")?;

  print_success(&format!("Deployed {}", config.name));
  print_stat("Archive", &archive.display().to_string());
  print_stat("Target", &deployed.display().to_string());
  Ok(())
}
