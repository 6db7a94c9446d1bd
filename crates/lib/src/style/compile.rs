//! SCSS compilation with grass.
//!
//! Compilation is planned first (which sources produce which outputs), then
//! run as a bounded fan-out. Outputs always land under the staging
//! directory, never next to their sources.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::config::ThemeletUnit;
use crate::consts::THEMELET_BUNDLE;
use crate::util::fs::{FsError, list_files, relative_key, write_file};

/// Main theme output, relative to the staging directory.
pub const MAIN_OUT_DIR: &str = "main";

/// Per-themelet output (`<name>.css`), relative to the staging directory.
pub const THEMELETS_OUT_DIR: &str = "themelets";

/// Entry stylesheets looked up in a staged themelet, first match wins.
const THEMELET_ENTRIES: &[&str] = &["custom.scss", "custom.css"];

#[derive(Debug, Error)]
pub enum CompileError {
  #[error("failed to compile {}: {message}", path.display())]
  Stylesheet { path: PathBuf, message: String },

  #[error("themelet `{themelet}` would overwrite the theme's own {}", stylesheet.display())]
  ThemeletClash { themelet: String, stylesheet: PathBuf },

  #[error("the themelet bundle would overwrite the theme's own {}", stylesheet.display())]
  BundleClash { stylesheet: PathBuf },

  #[error(transparent)]
  Fs(#[from] FsError),

  #[error("compile task failed: {0}")]
  Task(String),
}

/// One stylesheet to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileJob {
  pub source: PathBuf,
  pub output: PathBuf,
  pub load_paths: Vec<PathBuf>,
}

/// Everything `compile-styles` will produce.
#[derive(Debug, Default)]
pub struct CompilePlan {
  pub jobs: Vec<CompileJob>,

  /// Non-stylesheet files copied through unchanged, `(from, to)`.
  pub carried: Vec<(PathBuf, PathBuf)>,
}

fn is_stylesheet(path: &Path) -> bool {
  matches!(path.extension().and_then(|e| e.to_str()), Some("scss" | "css"))
}

fn is_partial(path: &Path) -> bool {
  path
    .file_name()
    .and_then(|n| n.to_str())
    .is_some_and(|n| n.starts_with('_'))
}

fn is_scss(path: &Path) -> bool {
  path.extension().is_some_and(|e| e == "scss")
}

/// Work out the compile jobs for the escaped stylesheet directory and the
/// staged themelets.
///
/// `escape_dir` may be missing (nothing to compile for the main theme);
/// themelets without an entry stylesheet are left out. When `x.css` and
/// `x.scss` sit side by side only `x.scss` is compiled. A themelet whose
/// output name matches one of the theme's own stylesheets is an error, as
/// is a theme stylesheet named like the themelet bundle.
pub fn plan(
  escape_dir: &Path,
  staging: &Path,
  themelets: &[ThemeletUnit],
  out_dir: &Path,
) -> Result<CompilePlan, CompileError> {
  let mut plan = CompilePlan::default();
  let main_out = out_dir.join(MAIN_OUT_DIR);
  let mut main_jobs: BTreeMap<PathBuf, CompileJob> = BTreeMap::new();

  if escape_dir.is_dir() {
    for file in list_files(escape_dir)? {
      let rel = relative_key(escape_dir, &file);
      if !is_stylesheet(&file) {
        plan.carried.push((file, main_out.join(&rel)));
        continue;
      }
      if is_partial(&file) {
        continue;
      }
      let mut load_paths = Vec::new();
      if let Some(parent) = file.parent()
        && parent != escape_dir
      {
        load_paths.push(parent.to_path_buf());
      }
      load_paths.push(escape_dir.to_path_buf());

      let job = CompileJob {
        output: main_out.join(&rel).with_extension("css"),
        source: file,
        load_paths,
      };
      match main_jobs.entry(job.output.clone()) {
        Entry::Vacant(slot) => {
          slot.insert(job);
        }
        Entry::Occupied(mut slot) => {
          let ignored = if is_scss(&job.source) && !is_scss(&slot.get().source) {
            slot.insert(job).source
          } else {
            job.source
          };
          warn!(
            compiled = %slot.get().source.display(),
            ignored = %ignored.display(),
            "stylesheets share an output, compiling the scss source only"
          );
        }
      }
    }
  }

  let mut themelet_jobs = Vec::new();
  for themelet in themelets {
    let dir = staging.join(&themelet.name);
    let Some(entry) = THEMELET_ENTRIES.iter().map(|e| dir.join(e)).find(|p| p.is_file()) else {
      debug!(themelet = %themelet.name, "themelet has no stylesheet entry");
      continue;
    };
    let own = format!("{}.css", themelet.name);
    if let Some(shadowed) = main_jobs.get(&main_out.join(&own)) {
      return Err(CompileError::ThemeletClash {
        themelet: themelet.name.clone(),
        stylesheet: shadowed.source.clone(),
      });
    }
    themelet_jobs.push(CompileJob {
      source: entry,
      output: out_dir.join(THEMELETS_OUT_DIR).join(own),
      load_paths: vec![dir, escape_dir.to_path_buf()],
    });
  }

  if !themelet_jobs.is_empty()
    && let Some(shadowed) = main_jobs.get(&main_out.join(THEMELET_BUNDLE))
  {
    return Err(CompileError::BundleClash {
      stylesheet: shadowed.source.clone(),
    });
  }

  plan.jobs.extend(main_jobs.into_values());
  plan.jobs.extend(themelet_jobs);
  Ok(plan)
}

/// Compile one stylesheet to CSS. Both `.scss` and `.css` sources are read as SCSS.
pub fn compile_file(job: &CompileJob) -> Result<String, CompileError> {
  let mut options = grass::Options::default().input_syntax(grass::InputSyntax::Scss);
  for path in &job.load_paths {
    options = options.load_path(path);
  }

  grass::from_path(&job.source, &options).map_err(|e| CompileError::Stylesheet {
    path: job.source.clone(),
    message: e.to_string(),
  })
}

/// Run every job with at most `parallelism` compiles at once.
///
/// All jobs run to completion; if any failed, the error of the first failed
/// source (in path order) is returned.
pub async fn run_jobs(jobs: Vec<CompileJob>, parallelism: usize) -> Result<usize, CompileError> {
  let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));
  let mut join_set = JoinSet::new();

  for job in jobs {
    let semaphore = semaphore.clone();
    join_set.spawn(async move {
      let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|e| CompileError::Task(e.to_string()))?;

      tokio::task::spawn_blocking(move || {
        let css = compile_file(&job)?;
        write_file(&job.output, css)?;
        debug!(source = %job.source.display(), output = %job.output.display(), "compiled stylesheet");
        Ok::<_, CompileError>(job.output)
      })
      .await
      .map_err(|e| CompileError::Task(e.to_string()))?
    });
  }

  let mut compiled = 0;
  let mut failures = Vec::new();
  while let Some(joined) = join_set.join_next().await {
    match joined {
      Ok(Ok(_)) => compiled += 1,
      Ok(Err(e)) => {
        error!(error = %e, "stylesheet compilation failed");
        failures.push(e);
      }
      Err(e) => failures.push(CompileError::Task(e.to_string())),
    }
  }

  failures.sort_by_key(failure_order);
  match failures.into_iter().next() {
    Some(first) => Err(first),
    None => Ok(compiled),
  }
}

fn failure_order(e: &CompileError) -> (u8, PathBuf) {
  match e {
    CompileError::Stylesheet { path, .. } => (0, path.clone()),
    CompileError::Fs(_) | CompileError::ThemeletClash { .. } | CompileError::BundleClash { .. } => (1, PathBuf::new()),
    CompileError::Task(_) => (2, PathBuf::new()),
  }
}
