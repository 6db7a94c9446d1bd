//! The fixed set of build stages and the states they move the build into.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A named, idempotent build stage.
///
/// Declaration order is the tie-breaker for the topological runner, so the
/// variants are listed in the order a full build runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
  Clean,
  BaseCopy,
  SrcOverlay,
  WebInfBuild,
  HookMetadataBuild,
  ThemeletMerge,
  RenameStyleDir,
  CompileStyles,
  ConsolidateStyles,
  RemoveStyleEscapeDir,
  Package,
}

impl Stage {
  pub const ALL: [Stage; 11] = [
    Stage::Clean,
    Stage::BaseCopy,
    Stage::SrcOverlay,
    Stage::WebInfBuild,
    Stage::HookMetadataBuild,
    Stage::ThemeletMerge,
    Stage::RenameStyleDir,
    Stage::CompileStyles,
    Stage::ConsolidateStyles,
    Stage::RemoveStyleEscapeDir,
    Stage::Package,
  ];

  /// Identifier used on the command line and in logs.
  pub fn name(self) -> &'static str {
    match self {
      Stage::Clean => "clean",
      Stage::BaseCopy => "base-copy",
      Stage::SrcOverlay => "src-overlay",
      Stage::WebInfBuild => "web-inf-build",
      Stage::HookMetadataBuild => "hook-metadata-build",
      Stage::ThemeletMerge => "themelet-merge",
      Stage::RenameStyleDir => "rename-style-dir",
      Stage::CompileStyles => "compile-styles",
      Stage::ConsolidateStyles => "consolidate-styles",
      Stage::RemoveStyleEscapeDir => "remove-style-escape-dir",
      Stage::Package => "package",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Stage::Clean => "remove the build directory",
      Stage::BaseCopy => "copy parent theme sources into the build directory",
      Stage::SrcOverlay => "overlay the theme's own sources",
      Stage::WebInfBuild => "copy WEB-INF and resolve descriptor placeholders",
      Stage::HookMetadataBuild => "write the hook descriptor's language properties",
      Stage::ThemeletMerge => "merge themelet scripts, templates and images",
      Stage::RenameStyleDir => "move css/ aside before compilation",
      Stage::CompileStyles => "compile stylesheets",
      Stage::ConsolidateStyles => "swap compiled stylesheets into css/",
      Stage::RemoveStyleEscapeDir => "remove the stylesheet escape directory",
      Stage::Package => "write the deployable archive",
    }
  }

  /// Stages that must have run before this one.
  pub fn predecessors(self) -> &'static [Stage] {
    match self {
      Stage::Clean => &[],
      Stage::BaseCopy => &[Stage::Clean],
      Stage::SrcOverlay => &[Stage::BaseCopy],
      Stage::WebInfBuild => &[Stage::SrcOverlay],
      Stage::HookMetadataBuild => &[Stage::WebInfBuild],
      Stage::ThemeletMerge => &[Stage::SrcOverlay, Stage::HookMetadataBuild],
      Stage::RenameStyleDir => &[Stage::ThemeletMerge],
      Stage::CompileStyles => &[Stage::RenameStyleDir],
      Stage::ConsolidateStyles => &[Stage::CompileStyles],
      Stage::RemoveStyleEscapeDir => &[Stage::ConsolidateStyles],
      Stage::Package => &[Stage::RemoveStyleEscapeDir],
    }
  }

  /// The pipeline state this stage completes, if it completes one.
  pub fn reaches(self) -> Option<PipelineState> {
    match self {
      Stage::Clean => Some(PipelineState::Clean),
      Stage::BaseCopy => Some(PipelineState::BaseCopied),
      Stage::SrcOverlay => Some(PipelineState::SrcOverlaid),
      Stage::HookMetadataBuild => Some(PipelineState::MetadataWritten),
      Stage::ThemeletMerge => Some(PipelineState::ThemeletsMerged),
      Stage::RemoveStyleEscapeDir => Some(PipelineState::StylesCompiled),
      Stage::Package => Some(PipelineState::Packaged),
      Stage::WebInfBuild | Stage::RenameStyleDir | Stage::CompileStyles | Stage::ConsolidateStyles => None,
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stage `{0}`")]
pub struct UnknownStage(pub String);

impl FromStr for Stage {
  type Err = UnknownStage;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Stage::ALL
      .into_iter()
      .find(|stage| stage.name() == s)
      .ok_or_else(|| UnknownStage(s.to_string()))
  }
}

/// Milestones of a build; transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineState {
  Clean,
  BaseCopied,
  SrcOverlaid,
  MetadataWritten,
  ThemeletsMerged,
  StylesCompiled,
  Packaged,
}

impl fmt::Display for PipelineState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      PipelineState::Clean => "clean",
      PipelineState::BaseCopied => "base-copied",
      PipelineState::SrcOverlaid => "src-overlaid",
      PipelineState::MetadataWritten => "metadata-written",
      PipelineState::ThemeletsMerged => "themelets-merged",
      PipelineState::StylesCompiled => "styles-compiled",
      PipelineState::Packaged => "packaged",
    })
  }
}
