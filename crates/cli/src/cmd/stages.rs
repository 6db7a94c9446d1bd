//! Implementation of the `theme stages` command.

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use themeforge_lib::pipeline::StageGraph;

use crate::output::{OutputFormat, print_json, symbols};

#[derive(Serialize)]
struct StageInfo {
  name: &'static str,
  description: &'static str,
  after: Vec<&'static str>,
}

/// List the stages in execution order with their direct predecessors.
pub fn cmd_stages(output: OutputFormat) -> Result<()> {
  let graph = StageGraph::new()?;

  let stages: Vec<StageInfo> = graph
    .order()
    .iter()
    .map(|&stage| StageInfo {
      name: stage.name(),
      description: stage.description(),
      after: graph.predecessors(stage).into_iter().map(|p| p.name()).collect(),
    })
    .collect();

  if output.is_json() {
    return print_json(&stages);
  }

  for (i, info) in stages.iter().enumerate() {
    println!(
      "{:>2}. {:<24} {}",
      i + 1,
      info.name.if_supports_color(Stream::Stdout, |s| s.bold()),
      info.description
    );
    if !info.after.is_empty() {
      println!(
        "    {} after {}",
        symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.dimmed()),
        info.after.join(", ")
      );
    }
  }
  Ok(())
}
