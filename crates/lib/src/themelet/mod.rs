//! Themelet merging.
//!
//! Each themelet's assets go under its own name: scripts, templates and
//! images into `<kind>/<name>/`, stylesheets into the staging directory
//! for `compile-styles`. Themelets are copied concurrently.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::ThemeletUnit;
use crate::consts::{CSS_DIR, IMAGES_DIR, JS_DIR, SRC_DIR, TEMPLATES_DIR};
use crate::pipeline::{BuildContext, StageError, StageOutcome};
use crate::util::fs::{FsError, copy_tree};

/// One subtree copy for a themelet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTarget {
  pub from: PathBuf,
  pub to: PathBuf,
}

/// Where each of a themelet's subtrees lands.
pub fn merge_targets(ctx: &BuildContext, themelet: &ThemeletUnit) -> Vec<MergeTarget> {
  let src = themelet.root.join(SRC_DIR);
  let build = &ctx.paths.build;

  let mut targets: Vec<MergeTarget> = [JS_DIR, TEMPLATES_DIR, IMAGES_DIR]
    .into_iter()
    .map(|kind| MergeTarget {
      from: src.join(kind),
      to: build.join(kind).join(&themelet.name),
    })
    .collect();
  targets.push(MergeTarget {
    from: src.join(CSS_DIR),
    to: ctx.paths.themelet_staging().join(&themelet.name),
  });
  targets
}

/// Copy every declared themelet into the build tree.
pub async fn merge_themelets(ctx: &BuildContext) -> Result<StageOutcome, StageError> {
  let mut outcome = StageOutcome::default();
  let semaphore = Arc::new(Semaphore::new(ctx.options.parallelism.max(1)));
  let mut join_set = JoinSet::new();

  for themelet in &ctx.themelets {
    if !themelet.root.is_dir() {
      warn!(themelet = %themelet.name, path = %themelet.root.display(), "themelet not found, skipping");
      outcome.skip(format!("themelet `{}` not found at {}", themelet.name, themelet.root.display()));
      continue;
    }

    let name = themelet.name.clone();
    let targets = merge_targets(ctx, themelet);
    let semaphore = semaphore.clone();
    join_set.spawn(async move {
      let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|e| StageError::Task(e.to_string()))?;

      let copied = tokio::task::spawn_blocking(move || {
        let mut copied = 0;
        for target in targets {
          if !target.from.is_dir() {
            debug!(themelet = %name, path = %target.from.display(), "themelet subtree absent");
            continue;
          }
          copied += copy_tree(&target.from, &target.to, &|_| true)?;
        }
        debug!(themelet = %name, files = copied, "merged themelet");
        Ok::<_, FsError>(copied)
      })
      .await??;
      Ok::<_, StageError>(copied)
    });
  }

  let mut first_error = None;
  while let Some(joined) = join_set.join_next().await {
    let result = joined.map_err(StageError::from).and_then(|r| r);
    match result {
      Ok(copied) => outcome.files += copied,
      Err(e) => {
        warn!(error = %e, "themelet merge failed");
        first_error.get_or_insert(e);
      }
    }
  }

  match first_error {
    Some(e) => Err(e),
    None => Ok(outcome),
  }
}
