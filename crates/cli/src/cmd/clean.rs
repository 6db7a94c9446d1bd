//! Implementation of the `theme clean` command.

use std::path::Path;

use anyhow::{Context, Result};

use themeforge_lib::pipeline::{BuildContext, BuildOptions, Pipeline, Stage};

use crate::output::print_success;

/// Remove the build directory. The archive in the distribution directory is kept.
pub fn cmd_clean(dir: &Path) -> Result<()> {
  let ctx = BuildContext::load(dir, BuildOptions::default()).context("Failed to load theme")?;

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(async {
    let pipeline = Pipeline::new(&ctx)?;
    pipeline.run_stage(Stage::Clean).await
  })
  .context("Clean failed")?;

  print_success(&format!("Removed {}", ctx.paths.build.display()));
  Ok(())
}
