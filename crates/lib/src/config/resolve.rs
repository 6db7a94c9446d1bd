//! Dependency resolution for parent themes and themelets.
//!
//! A dependency with an explicit `path` is resolved relative to the theme
//! that declares it. Otherwise it is looked up in the declaring theme's
//! `node_modules/`, then in the project's own `node_modules/`. A resolved
//! root that does not exist is kept: stages treat it as a missing source
//! and skip it.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::{DESCRIPTOR_FILE, NODE_MODULES_DIR};

use super::{ConfigError, DependencyRef, ThemeConfig};

/// One ancestor theme whose `src/` is layered under the working theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeLayer {
  pub name: String,
  pub root: PathBuf,
}

/// A themelet merged into the build under its own namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeletUnit {
  pub name: String,
  pub root: PathBuf,
}

fn locate(dep: &DependencyRef, owner_root: &Path, project_root: &Path) -> PathBuf {
  if let Some(path) = &dep.path {
    return owner_root.join(path);
  }

  let local = owner_root.join(NODE_MODULES_DIR).join(&dep.name);
  if local.exists() || owner_root == project_root {
    return local;
  }
  project_root.join(NODE_MODULES_DIR).join(&dep.name)
}

fn canonical(path: &Path) -> PathBuf {
  dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Resolve the chain of ancestor themes, farthest ancestor first.
///
/// Each ancestor's own `package.json` may declare a further `baseTheme`.
/// The chain stops at a theme that declares none or has no descriptor.
pub fn resolve_ancestors(project_root: &Path, config: &ThemeConfig) -> Result<Vec<ThemeLayer>, ConfigError> {
  let mut chain: Vec<ThemeLayer> = Vec::new();
  let mut visited = vec![canonical(project_root)];
  let mut next = config.base_theme.clone().map(|dep| (dep, project_root.to_path_buf()));

  while let Some((dep, owner)) = next.take() {
    let root = locate(&dep, &owner, project_root);
    let key = canonical(&root);

    if visited.contains(&key) {
      let mut names: Vec<&str> = std::iter::once(config.name.as_str())
        .chain(chain.iter().map(|l| l.name.as_str()))
        .collect();
      names.push(&dep.name);
      return Err(ConfigError::ParentCycle(names.join(" -> ")));
    }
    visited.push(key);

    debug!(theme = %dep.name, root = %root.display(), "resolved parent theme");
    chain.push(ThemeLayer {
      name: dep.name.clone(),
      root: root.clone(),
    });

    if root.join(DESCRIPTOR_FILE).is_file() {
      let parent = ThemeConfig::load(&root)?;
      next = parent.base_theme.map(|d| (d, root));
    }
  }

  chain.reverse();
  Ok(chain)
}

/// Resolve every declared themelet, in declaration order. Units are named by
/// their unscoped namespace; lookup uses the full package name.
pub fn resolve_themelets(project_root: &Path, config: &ThemeConfig) -> Vec<ThemeletUnit> {
  config
    .themelets
    .iter()
    .map(|dep| ThemeletUnit {
      name: dep.namespace().to_string(),
      root: locate(dep, project_root, project_root),
    })
    .collect()
}
