//! Implementation of the `theme build` command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::debug;

use themeforge_lib::pipeline::{BuildContext, BuildOptions, Pipeline, PipelineReport, Stage};

use crate::output::{
  OutputFormat, format_bytes, format_duration, print_info, print_json, print_stat, print_success, print_warning,
};

#[derive(Serialize)]
struct StageSummary {
  stage: String,
  files: usize,
  elapsed_ms: u64,
}

#[derive(Serialize)]
struct BuildSummary {
  theme: String,
  stages: Vec<StageSummary>,
  reached: Option<String>,
  fingerprint: Option<String>,
  archive: Option<PathBuf>,
  skipped: Vec<String>,
  elapsed_ms: u64,
}

impl BuildSummary {
  fn new(theme: &str, report: &PipelineReport) -> Self {
    Self {
      theme: theme.to_string(),
      stages: report
        .stages
        .iter()
        .map(|s| StageSummary {
          stage: s.stage.to_string(),
          files: s.outcome.files,
          elapsed_ms: s.elapsed.as_millis() as u64,
        })
        .collect(),
      reached: report.reached.map(|s| s.to_string()),
      fingerprint: report.fingerprint.as_ref().map(|h| h.to_string()),
      archive: report.archive.clone(),
      skipped: report.skipped(),
      elapsed_ms: report.elapsed().as_millis() as u64,
    }
  }
}

/// Execute the build command.
///
/// With no `stages`, runs the whole pipeline. Otherwise runs exactly the
/// given stages in dependency order, or, with `with_deps`, the given
/// stages together with everything they depend on.
pub fn cmd_build(
  dir: &Path,
  stages: &[Stage],
  with_deps: bool,
  timeout: Option<Duration>,
  output: OutputFormat,
) -> Result<()> {
  let ctx = BuildContext::load(dir, BuildOptions::default()).context("Failed to load theme")?;
  debug!(theme = %ctx.config.name, stages = ?stages, with_deps, "loaded theme");

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(async {
    let pipeline = Pipeline::new(&ctx)?;

    let run = async {
      if stages.is_empty() {
        pipeline.run().await
      } else if with_deps {
        let selected: Vec<Stage> = stages.iter().flat_map(|s| pipeline.graph().closure(*s)).collect();
        pipeline.run_stages(&selected).await
      } else {
        pipeline.run_stages(stages).await
      }
    };

    match timeout {
      Some(limit) => tokio::time::timeout(limit, run)
        .await
        .map_err(|_| anyhow!("build did not finish within {}", humantime::format_duration(limit)))?
        .map_err(anyhow::Error::from),
      None => run.await.map_err(anyhow::Error::from),
    }
  })?;

  if output.is_json() {
    return print_json(&BuildSummary::new(&ctx.config.name, &report));
  }

  for note in report.skipped() {
    print_warning(&format!("skipped {note}"));
  }

  println!();
  match &report.archive {
    Some(_) => print_success(&format!("Built {}", ctx.config.name)),
    None => print_info(&format!("Ran {} stage(s) for {}", report.stages.len(), ctx.config.name)),
  }
  if let Some(state) = report.reached {
    print_stat("Reached", &state.to_string());
  }
  if let Some(archive) = &report.archive {
    let size = std::fs::metadata(archive).map(|m| m.len()).unwrap_or_default();
    print_stat("Archive", &format!("{} ({})", archive.display(), format_bytes(size)));
  }
  if let Some(hash) = &report.fingerprint {
    print_stat("Fingerprint", hash.short());
  }
  print_stat("Duration", &format_duration(report.elapsed()));

  Ok(())
}
