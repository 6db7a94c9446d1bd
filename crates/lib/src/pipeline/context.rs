//! The explicit build configuration handed to every stage.

use std::path::Path;

use tracing::debug;

use crate::config::{ConfigError, ThemeConfig, ThemeLayer, ThemePaths, ThemeletUnit, resolve_ancestors, resolve_themelets};

use super::types::BuildOptions;

/// Everything a stage needs to know, constructed once per build.
#[derive(Debug, Clone)]
pub struct BuildContext {
  pub config: ThemeConfig,
  pub paths: ThemePaths,
  /// Parent theme chain, farthest ancestor first.
  pub ancestors: Vec<ThemeLayer>,
  /// Declared themelets, in declaration order.
  pub themelets: Vec<ThemeletUnit>,
  pub options: BuildOptions,
}

impl BuildContext {
  /// Load the descriptor from `project_dir` and resolve its dependencies.
  pub fn load(project_dir: &Path, options: BuildOptions) -> Result<Self, ConfigError> {
    let root = dunce::canonicalize(project_dir).map_err(|_| ConfigError::NotFound {
      path: project_dir.to_path_buf(),
    })?;
    let config = ThemeConfig::load(&root)?;
    Self::new(&root, config, options)
  }

  /// Build a context from an already parsed descriptor.
  pub fn new(root: &Path, config: ThemeConfig, options: BuildOptions) -> Result<Self, ConfigError> {
    let paths = ThemePaths::new(root, &config);
    let ancestors = resolve_ancestors(root, &config)?;
    let themelets = resolve_themelets(root, &config);

    debug!(
      theme = %config.name,
      ancestors = ancestors.len(),
      themelets = themelets.len(),
      "loaded build context"
    );

    Ok(Self {
      config,
      paths,
      ancestors,
      themelets,
      options,
    })
  }
}
