//! Stylesheet stages.
//!
//! `css/` is moved aside to `_css/`, compiled into `.styles/`, and the
//! compiled tree is then swapped in as the new `css/`. Themelet outputs are
//! written next to it as `<name>.css` plus the `themelet.css` bundle.

pub mod compile;

use std::path::Path;

use tokio::fs;
use tracing::{debug, info};

use crate::consts::THEMELET_BUNDLE;
use crate::pipeline::{BuildContext, StageError, StageOutcome};
use crate::util::fs::{FsError, remove_dir_if_exists};

use self::compile::{MAIN_OUT_DIR, THEMELETS_OUT_DIR};

/// Move `build/css` to the escape directory.
pub async fn rename_style_dir(ctx: &BuildContext) -> Result<StageOutcome, StageError> {
  let css = ctx.paths.build_css();
  let escape = ctx.paths.css_escape();

  if !css.is_dir() {
    if escape.is_dir() {
      debug!(path = %escape.display(), "stylesheets already escaped");
    } else {
      debug!(path = %css.display(), "no stylesheet directory to rename");
    }
    return Ok(StageOutcome::default());
  }

  remove_blocking(escape.clone()).await?;
  rename(&css, &escape).await?;
  debug!(from = %css.display(), to = %escape.display(), "escaped stylesheet directory");
  Ok(StageOutcome::default())
}

/// Compile the escaped stylesheets and staged themelets into `.styles/`.
pub async fn compile_styles(ctx: &BuildContext) -> Result<StageOutcome, StageError> {
  let out = ctx.paths.styles_out();
  remove_blocking(out.clone()).await?;

  let escape = ctx.paths.css_escape();
  let staging = ctx.paths.themelet_staging();
  let themelets = ctx.themelets.clone();
  let plan_out = out.clone();
  let plan = tokio::task::spawn_blocking(move || compile::plan(&escape, &staging, &themelets, &plan_out)).await??;

  if plan.jobs.is_empty() && plan.carried.is_empty() {
    debug!("no stylesheets to compile");
    return Ok(StageOutcome::default());
  }

  let carried = plan.carried;
  let carried_count = carried.len();
  tokio::task::spawn_blocking(move || {
    for (from, to) in carried {
      if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).map_err(|e| FsError::io("create directory", parent, e))?;
      }
      std::fs::copy(&from, &to).map_err(|e| FsError::io("copy", &from, e))?;
    }
    Ok::<_, FsError>(())
  })
  .await??;

  let compiled = match compile::run_jobs(plan.jobs, ctx.options.parallelism).await {
    Ok(n) => n,
    Err(e) => {
      remove_blocking(out).await?;
      return Err(e.into());
    }
  };

  info!(compiled, carried = carried_count, "stylesheets compiled");
  Ok(StageOutcome::files(compiled + carried_count))
}

/// Swap the compiled output in as `build/css`.
pub async fn consolidate_styles(ctx: &BuildContext) -> Result<StageOutcome, StageError> {
  let css = ctx.paths.build_css();
  let escape = ctx.paths.css_escape();
  let out = ctx.paths.styles_out();

  if !out.is_dir() {
    if !css.exists() && escape.is_dir() {
      rename(&escape, &css).await?;
      debug!(path = %css.display(), "nothing compiled, restored stylesheet directory");
    }
    return Ok(StageOutcome::default());
  }

  remove_blocking(css.clone()).await?;
  let main = out.join(MAIN_OUT_DIR);
  if main.is_dir() {
    rename(&main, &css).await?;
  } else {
    create_dir(&css).await?;
  }

  let mut files = 0;
  let mut bundle = String::new();
  for themelet in &ctx.themelets {
    let compiled = out.join(THEMELETS_OUT_DIR).join(format!("{}.css", themelet.name));
    if !compiled.is_file() {
      continue;
    }
    let content = fs::read_to_string(&compiled)
      .await
      .map_err(|e| FsError::io("read", &compiled, e))?;
    let target = css.join(format!("{}.css", themelet.name));
    write(&target, &content).await?;
    files += 1;

    bundle.push_str(&content);
    if !content.ends_with('\n') {
      bundle.push('\n');
    }
  }

  if files > 0 {
    write(&css.join(THEMELET_BUNDLE), &bundle).await?;
    files += 1;
  }

  remove_blocking(out).await?;
  info!(themelets = ctx.themelets.len(), path = %css.display(), "stylesheets consolidated");
  Ok(StageOutcome::files(files))
}

/// Delete the escape and themelet staging directories.
pub async fn remove_escape_dir(ctx: &BuildContext) -> Result<StageOutcome, StageError> {
  for dir in [ctx.paths.css_escape(), ctx.paths.themelet_staging()] {
    if remove_blocking(dir.clone()).await? {
      debug!(path = %dir.display(), "removed scratch directory");
    }
  }
  Ok(StageOutcome::default())
}

async fn remove_blocking(path: std::path::PathBuf) -> Result<bool, StageError> {
  Ok(tokio::task::spawn_blocking(move || remove_dir_if_exists(&path)).await??)
}

async fn rename(from: &Path, to: &Path) -> Result<(), FsError> {
  fs::rename(from, to).await.map_err(|e| FsError::io("rename", from, e))
}

async fn create_dir(path: &Path) -> Result<(), FsError> {
  fs::create_dir_all(path)
    .await
    .map_err(|e| FsError::io("create directory", path, e))
}

async fn write(path: &Path, content: &str) -> Result<(), FsError> {
  fs::write(path, content).await.map_err(|e| FsError::io("write", path, e))
}
