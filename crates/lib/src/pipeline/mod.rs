//! Build orchestration.
//!
//! This module provides the entry points for running the theme build:
//! - the full stage chain in dependency order
//! - a target stage together with its predecessors
//! - an explicit selection of stages, or a single stage on its own
//!
//! Stages run strictly one after another. A failing stage halts the run and
//! leaves the build directory as that stage left it.

pub mod context;
pub mod graph;
pub mod stage;
pub mod types;

use std::time::Instant;

use tracing::{error, info, warn};

use crate::consts::SCRATCH_DIRS;
use crate::util::hash::hash_tree;
use crate::{metadata, package, source, style, themelet};

pub use context::BuildContext;
pub use graph::StageGraph;
pub use stage::{PipelineState, Stage, UnknownStage};
pub use types::{BuildOptions, PipelineError, PipelineReport, StageError, StageOutcome, StageReport};

/// Run one stage against the build context, without its predecessors.
pub async fn execute_stage(ctx: &BuildContext, stage: Stage) -> Result<StageOutcome, StageError> {
  match stage {
    Stage::Clean => source::clean(ctx).await,
    Stage::BaseCopy => source::base_copy(ctx).await,
    Stage::SrcOverlay => source::src_overlay(ctx).await,
    Stage::WebInfBuild => metadata::build_web_inf(ctx).await,
    Stage::HookMetadataBuild => metadata::build_hook(ctx).await,
    Stage::ThemeletMerge => themelet::merge_themelets(ctx).await,
    Stage::RenameStyleDir => style::rename_style_dir(ctx).await,
    Stage::CompileStyles => style::compile_styles(ctx).await,
    Stage::ConsolidateStyles => style::consolidate_styles(ctx).await,
    Stage::RemoveStyleEscapeDir => style::remove_escape_dir(ctx).await,
    Stage::Package => package::package(ctx).await,
  }
}

/// The stage runner for one build context.
pub struct Pipeline<'a> {
  ctx: &'a BuildContext,
  graph: StageGraph,
}

impl<'a> Pipeline<'a> {
  /// Validate the stage graph and bind it to a build context.
  pub fn new(ctx: &'a BuildContext) -> Result<Self, PipelineError> {
    Ok(Self {
      ctx,
      graph: StageGraph::new()?,
    })
  }

  pub fn graph(&self) -> &StageGraph {
    &self.graph
  }

  /// Run every stage, clean through package.
  pub async fn run(&self) -> Result<PipelineReport, PipelineError> {
    self.run_sequence(self.graph.order().to_vec()).await
  }

  /// Run `target` after all of its transitive predecessors.
  pub async fn run_target(&self, target: Stage) -> Result<PipelineReport, PipelineError> {
    self.run_sequence(self.graph.closure(target)).await
  }

  /// Run exactly the given stages, in dependency order.
  ///
  /// Predecessors that are not selected are assumed to have run earlier.
  pub async fn run_stages(&self, stages: &[Stage]) -> Result<PipelineReport, PipelineError> {
    self.run_sequence(self.graph.sort(stages)).await
  }

  /// Run a single stage on its own.
  pub async fn run_stage(&self, stage: Stage) -> Result<StageReport, PipelineError> {
    let mut report = self.run_sequence(vec![stage]).await?;
    report.stages.pop().ok_or(PipelineError::StageFailed {
      stage,
      reached: None,
      source: StageError::Task("stage produced no report".to_string()),
    })
  }

  async fn run_sequence(&self, stages: Vec<Stage>) -> Result<PipelineReport, PipelineError> {
    info!(theme = %self.ctx.config.name, stages = stages.len(), "starting build");

    let mut report = PipelineReport::default();

    for stage in stages {
      info!(stage = %stage, "running stage");
      let started = Instant::now();

      let outcome = match execute_stage(self.ctx, stage).await {
        Ok(outcome) => outcome,
        Err(source) => {
          error!(stage = %stage, error = %source, "stage failed");
          return Err(PipelineError::StageFailed {
            stage,
            reached: report.reached,
            source,
          });
        }
      };

      let elapsed = started.elapsed();
      info!(
        stage = %stage,
        files = outcome.files,
        skipped = outcome.skipped.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "stage complete"
      );

      if let Some(state) = stage.reaches() {
        report.reached = Some(state);
      }
      if let Some(artifact) = &outcome.artifact {
        report.archive = Some(artifact.clone());
      }
      report.stages.push(StageReport {
        stage,
        outcome,
        elapsed,
      });
    }

    report.fingerprint = self.fingerprint().await;

    info!(
      stages = report.stages.len(),
      reached = ?report.reached,
      "build finished"
    );

    Ok(report)
  }

  async fn fingerprint(&self) -> Option<crate::util::hash::ContentHash> {
    let build = self.ctx.paths.build.clone();
    if !build.is_dir() {
      return None;
    }

    match tokio::task::spawn_blocking(move || hash_tree(&build, SCRATCH_DIRS)).await {
      Ok(Ok(hash)) => Some(hash),
      Ok(Err(e)) => {
        warn!(error = %e, "failed to fingerprint build tree");
        None
      }
      Err(e) => {
        warn!(error = %e, "fingerprint task failed");
        None
      }
    }
  }
}
