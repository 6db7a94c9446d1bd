//! Types for stage execution.
//!
//! This module defines the error types and reports produced while running
//! stages, plus the options a build is configured with.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;
use crate::metadata::MetadataErrors;
use crate::package::PackageError;
use crate::style::compile::CompileError;
use crate::util::fs::FsError;
use crate::util::hash::ContentHash;

use super::stage::{PipelineState, Stage};

/// Errors raised inside a single stage.
#[derive(Debug, Error)]
pub enum StageError {
  #[error(transparent)]
  Fs(#[from] FsError),

  #[error(transparent)]
  Compile(#[from] CompileError),

  #[error(transparent)]
  Metadata(#[from] MetadataErrors),

  #[error(transparent)]
  Package(#[from] PackageError),

  /// A fan-out task panicked or was cancelled.
  #[error("background task failed: {0}")]
  Task(String),
}

impl From<tokio::task::JoinError> for StageError {
  fn from(e: tokio::task::JoinError) -> Self {
    StageError::Task(e.to_string())
  }
}

/// Errors surfaced by the orchestrator.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("stage dependency cycle detected")]
  CycleDetected,

  #[error("stage {stage} depends on undeclared stage {missing}")]
  UndeclaredStage { stage: Stage, missing: Stage },

  /// A stage failed; the build directory is left as the stage left it.
  #[error("stage `{stage}` failed (last reached state: {}): {source}", reached_label(.reached))]
  StageFailed {
    stage: Stage,
    reached: Option<PipelineState>,
    #[source]
    source: StageError,
  },
}

fn reached_label(reached: &Option<PipelineState>) -> String {
  reached.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string())
}

/// What a stage did, returned by every stage function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageOutcome {
  /// Files written into the build tree (or archive entries for `package`).
  pub files: usize,

  /// Sources that were absent and skipped, one human-readable note each.
  pub skipped: Vec<String>,

  /// Artifact produced outside the build tree, if any.
  pub artifact: Option<PathBuf>,
}

impl StageOutcome {
  pub fn files(files: usize) -> Self {
    Self {
      files,
      ..Self::default()
    }
  }

  pub fn skip(&mut self, note: impl Into<String>) {
    self.skipped.push(note.into());
  }
}

/// Result of one executed stage.
#[derive(Debug, Clone)]
pub struct StageReport {
  pub stage: Stage,
  pub outcome: StageOutcome,
  pub elapsed: Duration,
}

/// Result of a pipeline run.
#[derive(Debug, Default)]
pub struct PipelineReport {
  /// Executed stages, in execution order.
  pub stages: Vec<StageReport>,

  /// Last state reached by the run.
  pub reached: Option<PipelineState>,

  /// Content hash of the build tree after the run, when it exists.
  pub fingerprint: Option<ContentHash>,

  /// Archive written by the `package` stage.
  pub archive: Option<PathBuf>,
}

impl PipelineReport {
  pub fn elapsed(&self) -> Duration {
    self.stages.iter().map(|s| s.elapsed).sum()
  }

  /// Every skip note, prefixed with the stage that recorded it.
  pub fn skipped(&self) -> Vec<String> {
    self
      .stages
      .iter()
      .flat_map(|r| r.outcome.skipped.iter().map(move |note| format!("{}: {}", r.stage, note)))
      .collect()
  }
}

/// Options for a build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
  /// Maximum number of fan-out tasks running at once within a stage.
  pub parallelism: usize,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      parallelism: num_cpus(),
    }
  }
}

fn num_cpus() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}
