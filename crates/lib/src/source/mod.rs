//! Source layer resolution.
//!
//! The build directory is populated from layers: every ancestor theme's
//! `src/` (farthest ancestor first), then the working theme's own `src/`.
//! Later layers overwrite earlier ones file by file; file contents are
//! never merged. `src/WEB-INF` is left to the metadata stages.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::consts::{KNOWN_TEMPLATE_LANGUAGES, SRC_DIR, TEMPLATES_DIR, WEB_INF_DIR};
use crate::pipeline::{BuildContext, StageError, StageOutcome};
use crate::util::fs::{FsError, copy_tree};

/// Remove the build directory. Missing is fine.
pub async fn clean(ctx: &BuildContext) -> Result<StageOutcome, StageError> {
  let build = &ctx.paths.build;
  match fs::remove_dir_all(build).await {
    Ok(()) => info!(path = %build.display(), "removed build directory"),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      debug!(path = %build.display(), "build directory absent, nothing to clean")
    }
    Err(e) => return Err(FsError::io("remove", build, e).into()),
  }
  Ok(StageOutcome::default())
}

/// Create the build directory and copy every ancestor theme into it.
pub async fn base_copy(ctx: &BuildContext) -> Result<StageOutcome, StageError> {
  ensure_build_dir(ctx).await?;

  let mut outcome = StageOutcome::default();
  for layer in &ctx.ancestors {
    let src = layer.root.join(SRC_DIR);
    if !src.is_dir() {
      warn!(theme = %layer.name, path = %src.display(), "parent theme sources not found, skipping");
      outcome.skip(format!("parent theme `{}` has no sources at {}", layer.name, src.display()));
      continue;
    }
    outcome.files += copy_layer(ctx, src).await?;
  }
  Ok(outcome)
}

/// Copy the working theme's own sources over the ancestors.
pub async fn src_overlay(ctx: &BuildContext) -> Result<StageOutcome, StageError> {
  ensure_build_dir(ctx).await?;

  let mut outcome = StageOutcome::default();
  let src = ctx.paths.src.clone();
  if !src.is_dir() {
    warn!(path = %src.display(), "theme has no sources, skipping overlay");
    outcome.skip(format!("no sources at {}", src.display()));
    return Ok(outcome);
  }
  outcome.files = copy_layer(ctx, src).await?;
  Ok(outcome)
}

async fn ensure_build_dir(ctx: &BuildContext) -> Result<(), StageError> {
  let build = &ctx.paths.build;
  fs::create_dir_all(build)
    .await
    .map_err(|e| FsError::io("create directory", build, e))?;
  Ok(())
}

async fn copy_layer(ctx: &BuildContext, src: PathBuf) -> Result<usize, StageError> {
  let dest = ctx.paths.build.clone();
  let languages = ctx.config.template_languages.clone();

  let copied = tokio::task::spawn_blocking(move || {
    copy_tree(&src, &dest, &|rel| keep_layer_entry(rel, &languages))
  })
  .await??;
  Ok(copied)
}

/// Whether a `src/`-relative entry belongs in the build tree.
fn keep_layer_entry(rel: &str, template_languages: &[String]) -> bool {
  if rel == WEB_INF_DIR {
    return false;
  }

  let in_templates = rel
    .strip_prefix(TEMPLATES_DIR)
    .is_some_and(|rest| rest.starts_with('/'));
  if !in_templates {
    return true;
  }

  match Path::new(rel).extension().and_then(|e| e.to_str()) {
    Some(ext) if KNOWN_TEMPLATE_LANGUAGES.contains(&ext) => template_languages.iter().any(|l| l == ext),
    _ => true,
  }
}
