//! Archive packaging.
//!
//! The finished build tree is zipped into `<dist>/<archive-name>.war`.
//! Entries are written in sorted order with fixed timestamps and
//! permissions, so unchanged sources give a byte-identical archive.

pub mod deploy;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::consts::{PROCESSED_SUFFIX, SCRATCH_DIRS, WEB_INF_CLASSES_DIR, WEB_INF_DIR, WEB_INF_SRC_DIR};
use crate::pipeline::{BuildContext, StageError, StageOutcome};
use crate::util::fs::{FsError, list_files, relative_key};

pub use deploy::{deploy_archive, resolve_deploy_dir};

#[derive(Debug, Error)]
pub enum PackageError {
  #[error("build directory {} does not exist", path.display())]
  MissingBuildDir { path: PathBuf },

  #[error("cannot use distribution directory {}: {source}", path.display())]
  Destination {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write archive {}: {message}", path.display())]
  Write { path: PathBuf, message: String },

  #[error("archive {} not found; run a build first", path.display())]
  MissingArchive { path: PathBuf },

  #[error("no deploy directory configured")]
  NoDeployTarget,

  #[error(transparent)]
  Fs(#[from] FsError),
}

/// Archive entry names for every file in the build tree, mapped to the file
/// each one is read from.
///
/// - scratch directories are left out
/// - `X.processed` is stored as `X`, replacing the raw `X`
/// - `WEB-INF/src/**` is stored as `WEB-INF/classes/**`
pub fn archive_entries(build: &Path) -> Result<BTreeMap<String, PathBuf>, FsError> {
  let files: BTreeMap<String, PathBuf> = list_files(build)?
    .into_iter()
    .map(|path| (relative_key(build, &path), path))
    .filter(|(rel, _)| {
      let top = rel.split('/').next().unwrap_or_default();
      !SCRATCH_DIRS.contains(&top)
    })
    .collect();

  let src_prefix = format!("{WEB_INF_DIR}/{WEB_INF_SRC_DIR}/");
  let classes_prefix = format!("{WEB_INF_DIR}/{WEB_INF_CLASSES_DIR}/");

  let mut entries = BTreeMap::new();
  for (rel, path) in &files {
    let name = match rel.strip_suffix(PROCESSED_SUFFIX) {
      Some(raw) => raw.to_string(),
      None if files.contains_key(&format!("{rel}{PROCESSED_SUFFIX}")) => continue,
      None => rel.clone(),
    };
    let name = match name.strip_prefix(&src_prefix) {
      Some(rest) => format!("{classes_prefix}{rest}"),
      None => name,
    };
    entries.insert(name, path.clone());
  }
  Ok(entries)
}

/// Zip `entries` into a temporary file in `dist`, then move it to `archive`.
pub fn write_archive(entries: &BTreeMap<String, PathBuf>, dist: &Path, archive: &Path) -> Result<(), PackageError> {
  std::fs::create_dir_all(dist).map_err(|source| PackageError::Destination {
    path: dist.to_path_buf(),
    source,
  })?;
  let mut temp = NamedTempFile::new_in(dist).map_err(|source| PackageError::Destination {
    path: dist.to_path_buf(),
    source,
  })?;

  let write_err = |message: String| PackageError::Write {
    path: archive.to_path_buf(),
    message,
  };

  let options = SimpleFileOptions::default()
    .compression_method(CompressionMethod::Deflated)
    .last_modified_time(DateTime::default())
    .unix_permissions(0o644);

  let mut zip = ZipWriter::new(temp.as_file_mut());
  for (name, path) in entries {
    let bytes = std::fs::read(path).map_err(|e| FsError::io("read", path, e))?;
    zip
      .start_file(name.as_str(), options)
      .map_err(|e| write_err(e.to_string()))?;
    zip.write_all(&bytes).map_err(|e| write_err(e.to_string()))?;
  }
  zip.finish().map_err(|e| write_err(e.to_string()))?;

  temp
    .persist(archive)
    .map_err(|e| write_err(format!("cannot move archive into place: {}", e.error)))?;
  Ok(())
}

/// Write the build tree into `<dist>/<archive-name>.war`.
pub async fn package(ctx: &BuildContext) -> Result<StageOutcome, StageError> {
  let build = ctx.paths.build.clone();
  if !build.is_dir() {
    return Err(PackageError::MissingBuildDir { path: build }.into());
  }

  let dist = ctx.paths.dist.clone();
  let archive = ctx.paths.archive(&ctx.config);
  let target = archive.clone();

  let count = tokio::task::spawn_blocking(move || {
    let entries = archive_entries(&build)?;
    debug!(entries = entries.len(), "collected archive entries");
    write_archive(&entries, &dist, &target)?;
    Ok::<_, PackageError>(entries.len())
  })
  .await??;

  info!(path = %archive.display(), entries = count, "archive written");
  Ok(StageOutcome {
    files: count,
    artifact: Some(archive),
    ..StageOutcome::default()
  })
}

/// Entry names of an existing archive, in stored order.
pub fn read_entry_names(archive: &Path) -> Result<Vec<String>, PackageError> {
  let file = File::open(archive).map_err(|_| PackageError::MissingArchive {
    path: archive.to_path_buf(),
  })?;
  let read_err = |e: zip::result::ZipError| PackageError::Write {
    path: archive.to_path_buf(),
    message: e.to_string(),
  };
  let mut zip = zip::ZipArchive::new(file).map_err(read_err)?;

  let mut names = Vec::with_capacity(zip.len());
  for index in 0..zip.len() {
    let entry = zip.by_index_raw(index).map_err(read_err)?;
    names.push(entry.name().to_string());
  }
  Ok(names)
}
