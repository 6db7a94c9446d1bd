//! WEB-INF metadata stages.
//!
//! `web-inf-build` copies `src/WEB-INF` into the build tree and resolves
//! `@token@` placeholders; `hook-metadata-build` recomputes the hook
//! descriptor's language list from the language bundles that were copied.
//! A document that fails does not stop its siblings; the stage fails after
//! all documents were attempted.

pub mod hook;
pub mod placeholder;
pub mod properties;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::ThemeConfig;
use crate::consts::{
  CONTENT_DIR, HOOK_DESCRIPTOR, LANGUAGE_FILE_PREFIX, PLUGIN_PACKAGE_PROPERTIES, PROCESSED_SUFFIX, PROPERTIES_EXT,
  WEB_INF_SRC_DIR,
};
use crate::pipeline::{BuildContext, StageError, StageOutcome};
use crate::util::fs::{FsError, copy_tree};

use self::placeholder::Resolver;

/// Failure of one metadata document.
#[derive(Debug, Error)]
pub enum MetadataError {
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to write {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed document {}: {message}", path.display())]
  Parse { path: PathBuf, message: String },
}

impl MetadataError {
  pub fn path(&self) -> &Path {
    match self {
      MetadataError::Read { path, .. } | MetadataError::Write { path, .. } | MetadataError::Parse { path, .. } => path,
    }
  }
}

/// Every document that failed within one stage.
#[derive(Debug, Error)]
#[error("{} metadata document(s) failed{}", .0.len(), list_failures(.0))]
pub struct MetadataErrors(pub Vec<MetadataError>);

fn list_failures(errors: &[MetadataError]) -> String {
  errors.iter().map(|e| format!("\n  - {e}")).collect()
}

/// A `Language_<locale>.properties` bundle found in the build tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageBundle {
  pub locale: String,
  /// Path relative to `WEB-INF/src`, as the hook descriptor lists it.
  pub path: String,
}

/// Language bundles under `<web_inf>/src/content`, sorted by file name.
pub async fn discover_language_bundles(web_inf: &Path) -> Result<Vec<LanguageBundle>, FsError> {
  let content = web_inf.join(WEB_INF_SRC_DIR).join(CONTENT_DIR);
  let mut entries = match fs::read_dir(&content).await {
    Ok(entries) => entries,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
    Err(e) => return Err(FsError::io("read directory", &content, e)),
  };

  let mut names = Vec::new();
  while let Some(entry) = entries
    .next_entry()
    .await
    .map_err(|e| FsError::io("read directory", &content, e))?
  {
    if let Some(name) = entry.file_name().to_str() {
      names.push(name.to_string());
    }
  }
  names.sort();

  let suffix = format!(".{PROPERTIES_EXT}");
  let bundles = names
    .into_iter()
    .filter_map(|name| {
      let locale = name.strip_prefix(LANGUAGE_FILE_PREFIX)?.strip_suffix(suffix.as_str())?;
      if locale.is_empty() {
        return None;
      }
      Some(LanguageBundle {
        locale: locale.to_string(),
        path: format!("{CONTENT_DIR}/{name}"),
      })
    })
    .collect();
  Ok(bundles)
}

/// Values for the `@theme.*@` tokens.
#[derive(Debug, Clone)]
pub struct ThemeTokens {
  name: String,
  version: String,
  template_language: String,
  locales: String,
}

impl ThemeTokens {
  pub fn new(config: &ThemeConfig, bundles: &[LanguageBundle]) -> Self {
    Self {
      name: config.archive_name().to_string(),
      version: config.version.clone(),
      template_language: config.primary_template_language().to_string(),
      locales: bundles.iter().map(|b| b.locale.as_str()).collect::<Vec<_>>().join(","),
    }
  }
}

impl Resolver for ThemeTokens {
  fn resolve(&self, token: &str) -> Option<&str> {
    match token {
      "theme.name" => Some(self.name.as_str()),
      "theme.version" => Some(self.version.as_str()),
      "theme.template.language" => Some(self.template_language.as_str()),
      "theme.locales" => Some(self.locales.as_str()),
      _ => None,
    }
  }
}

/// Copy `src/WEB-INF` into the build tree and resolve its top-level documents.
pub async fn build_web_inf(ctx: &BuildContext) -> Result<StageOutcome, StageError> {
  let src = ctx.paths.src_web_inf();
  let dest = ctx.paths.build_web_inf();

  let mut outcome = StageOutcome::default();
  if !src.is_dir() {
    warn!(path = %src.display(), "no WEB-INF sources, skipping");
    outcome.skip(format!("no WEB-INF sources at {}", src.display()));
    return Ok(outcome);
  }

  let copy_dest = dest.clone();
  outcome.files = tokio::task::spawn_blocking(move || copy_tree(&src, &copy_dest, &|_| true)).await??;

  let bundles = discover_language_bundles(&dest).await?;
  let tokens = ThemeTokens::new(&ctx.config, &bundles);

  let mut failures = Vec::new();
  for document in top_level_documents(&dest).await? {
    match process_document(&ctx.config, &tokens, &document).await {
      Ok(Some(written)) => {
        debug!(path = %written.display(), "resolved metadata document");
        outcome.files += 1;
      }
      Ok(None) => {}
      Err(e) => {
        warn!(path = %e.path().display(), error = %e, "metadata document failed");
        failures.push(e);
      }
    }
  }

  if !failures.is_empty() {
    return Err(MetadataErrors(failures).into());
  }
  info!(locales = bundles.len(), "WEB-INF metadata written");
  Ok(outcome)
}

/// Regular files directly in `dir`, sorted, skipping already processed ones.
async fn top_level_documents(dir: &Path) -> Result<Vec<PathBuf>, FsError> {
  let mut entries = fs::read_dir(dir)
    .await
    .map_err(|e| FsError::io("read directory", dir, e))?;

  let mut files = Vec::new();
  while let Some(entry) = entries
    .next_entry()
    .await
    .map_err(|e| FsError::io("read directory", dir, e))?
  {
    let path = entry.path();
    let is_file = entry
      .file_type()
      .await
      .map_err(|e| FsError::io("stat", &path, e))?
      .is_file();
    let processed = path.to_string_lossy().ends_with(PROCESSED_SUFFIX);
    if is_file && !processed {
      files.push(path);
    }
  }
  files.sort();
  Ok(files)
}

/// Resolve one document. Returns the path written, or `None` when the file
/// is not a metadata document.
async fn process_document(
  config: &ThemeConfig,
  tokens: &ThemeTokens,
  path: &Path,
) -> Result<Option<PathBuf>, MetadataError> {
  let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
  let target = match ext {
    "xml" => processed_path(path),
    e if e == PROPERTIES_EXT => path.to_path_buf(),
    _ => return Ok(None),
  };

  let content = read_document(path).await?;
  let mut resolved = placeholder::substitute(&content, tokens);

  if path.file_name().is_some_and(|n| n == PLUGIN_PACKAGE_PROPERTIES) {
    resolved = properties::set_keys(
      &resolved,
      &[("name", config.archive_name()), ("version", config.version.as_str())],
    );
  }

  fs::write(&target, resolved).await.map_err(|source| MetadataError::Write {
    path: target.clone(),
    source,
  })?;
  Ok(Some(target))
}

async fn read_document(path: &Path) -> Result<String, MetadataError> {
  let bytes = fs::read(path).await.map_err(|source| MetadataError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  String::from_utf8(bytes).map_err(|e| MetadataError::Parse {
    path: path.to_path_buf(),
    message: format!("not valid UTF-8: {e}"),
  })
}

fn processed_path(path: &Path) -> PathBuf {
  let mut name = path.as_os_str().to_os_string();
  name.push(PROCESSED_SUFFIX);
  PathBuf::from(name)
}

/// Rewrite the hook descriptor's language list from the bundles present.
pub async fn build_hook(ctx: &BuildContext) -> Result<StageOutcome, StageError> {
  let web_inf = ctx.paths.build_web_inf();
  let raw = web_inf.join(HOOK_DESCRIPTOR);
  let processed = processed_path(&raw);

  let mut outcome = StageOutcome::default();
  let input = if processed.is_file() {
    processed.clone()
  } else if raw.is_file() {
    raw
  } else {
    warn!(path = %raw.display(), "no hook descriptor, skipping");
    outcome.skip(format!("no hook descriptor at {}", raw.display()));
    return Ok(outcome);
  };

  let bundles = discover_language_bundles(&web_inf).await?;
  for locale in &ctx.config.locales {
    if !bundles.iter().any(|b| &b.locale == locale) {
      warn!(locale = %locale, "declared locale has no language bundle");
    }
  }
  let list: Vec<String> = bundles.into_iter().map(|b| b.path).collect();

  let result = async {
    let content = read_document(&input).await?;
    let rewritten = hook::rewrite_language_properties(&content, &list).map_err(|e| MetadataError::Parse {
      path: input.clone(),
      message: e.to_string(),
    })?;
    fs::write(&processed, rewritten).await.map_err(|source| MetadataError::Write {
      path: processed.clone(),
      source,
    })
  }
  .await;

  if let Err(e) = result {
    return Err(MetadataErrors(vec![e]).into());
  }

  info!(entries = list.len(), path = %processed.display(), "hook descriptor written");
  outcome.files = 1;
  Ok(outcome)
}
