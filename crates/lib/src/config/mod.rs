//! Theme descriptor loading.
//!
//! A theme is described by the `name`, `version` and `liferayTheme` fields
//! of its `package.json`. The descriptor is loaded once per build and
//! passed by reference to every stage.

pub mod paths;
pub mod resolve;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::consts::{DEFAULT_BUILD_DIR, DEFAULT_DIST_DIR, DEFAULT_TEMPLATE_LANGUAGE, DESCRIPTOR_FILE, THEMELET_BUNDLE};

pub use paths::ThemePaths;
pub use resolve::{ThemeLayer, ThemeletUnit, resolve_ancestors, resolve_themelets};

/// Errors that can occur while loading or validating a theme descriptor.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("theme descriptor not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },

  #[error("invalid theme descriptor: {0}")]
  Invalid(String),

  #[error("parent theme cycle: {0}")]
  ParentCycle(String),
}

/// A dependency on another theme or themelet.
///
/// Written in `package.json` either as a bare name (resolved from
/// `node_modules/<name>`) or as `{ "name": ..., "path": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawDependency")]
pub struct DependencyRef {
  pub name: String,
  pub path: Option<PathBuf>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDependency {
  Name(String),
  Detailed { name: String, path: Option<PathBuf> },
}

impl DependencyRef {
  /// The name without any npm scope. Themelet outputs are namespaced by it.
  pub fn namespace(&self) -> &str {
    self.name.rsplit('/').next().unwrap_or(&self.name)
  }
}

/// A bare package name or `@scope/name`.
fn is_package_name(name: &str) -> bool {
  let (scope, leaf) = match name.split_once('/') {
    Some((scope, leaf)) => (Some(scope), leaf),
    None => (None, name),
  };
  let scope_ok = scope.is_none_or(|s| s.len() > 1 && s.starts_with('@') && !s.contains('\\'));
  scope_ok && !leaf.is_empty() && !leaf.contains(['/', '\\']) && leaf != "." && leaf != ".."
}

impl From<RawDependency> for DependencyRef {
  fn from(raw: RawDependency) -> Self {
    match raw {
      RawDependency::Name(name) => DependencyRef { name, path: None },
      RawDependency::Detailed { name, path } => DependencyRef { name, path },
    }
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeSection {
  base_theme: Option<DependencyRef>,
  template_language: Option<String>,
  template_languages: Option<Vec<String>>,
  #[serde(default)]
  locales: Vec<String>,
  #[serde(default)]
  themelets: Vec<DependencyRef>,
  build_dir: Option<PathBuf>,
  dist_dir: Option<PathBuf>,
  deploy_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct PackageJson {
  name: Option<String>,
  version: Option<String>,
  #[serde(rename = "liferayTheme")]
  theme: Option<ThemeSection>,
}

/// The theme descriptor: identity, parent, languages, locales, themelets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
  pub name: String,
  pub version: String,
  pub base_theme: Option<DependencyRef>,
  pub template_languages: Vec<String>,
  pub locales: Vec<String>,
  pub themelets: Vec<DependencyRef>,
  /// Relative to the project root unless absolute.
  pub build_dir: PathBuf,
  pub dist_dir: PathBuf,
  pub deploy_path: Option<PathBuf>,
}

impl ThemeConfig {
  /// Load `package.json` from a project directory.
  pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
    let path = project_dir.join(DESCRIPTOR_FILE);
    if !path.is_file() {
      return Err(ConfigError::NotFound { path });
    }
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
      path: path.clone(),
      source,
    })?;
    Self::from_json(&content, &path)
  }

  /// Parse and validate a descriptor. `origin` is only used in errors.
  pub fn from_json(content: &str, origin: &Path) -> Result<Self, ConfigError> {
    let pkg: PackageJson = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
      path: origin.to_path_buf(),
      source,
    })?;

    let name = pkg
      .name
      .filter(|n| !n.trim().is_empty())
      .ok_or_else(|| ConfigError::Invalid(format!("{} has no `name`", origin.display())))?;
    let section = pkg.theme.unwrap_or_default();

    let template_languages = match (section.template_languages, section.template_language) {
      (Some(langs), _) if !langs.is_empty() => langs,
      (_, Some(lang)) => vec![lang],
      _ => vec![DEFAULT_TEMPLATE_LANGUAGE.to_string()],
    };

    let config = ThemeConfig {
      name,
      version: pkg.version.unwrap_or_else(|| "0.0.0".to_string()),
      base_theme: section.base_theme,
      template_languages,
      locales: section.locales,
      themelets: section.themelets,
      build_dir: section.build_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR)),
      dist_dir: section.dist_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR)),
      deploy_path: section.deploy_path,
    };
    config.validate()?;
    Ok(config)
  }

  /// Archive file stem: the project name without any npm scope.
  pub fn archive_name(&self) -> &str {
    self.name.rsplit('/').next().unwrap_or(&self.name)
  }

  /// First declared template language.
  pub fn primary_template_language(&self) -> &str {
    self
      .template_languages
      .first()
      .map(String::as_str)
      .unwrap_or(DEFAULT_TEMPLATE_LANGUAGE)
  }

  fn validate(&self) -> Result<(), ConfigError> {
    if self.archive_name().is_empty() {
      return Err(ConfigError::Invalid(format!("`{}` is not a usable archive name", self.name)));
    }

    let reserved = THEMELET_BUNDLE.trim_end_matches(".css");
    let mut seen = std::collections::HashSet::new();
    for themelet in &self.themelets {
      let name = themelet.name.as_str();
      if !is_package_name(name) {
        return Err(ConfigError::Invalid(format!("themelet name `{}` is not a package name", name)));
      }
      let namespace = themelet.namespace();
      if namespace == reserved {
        return Err(ConfigError::Invalid(format!(
          "themelet name `{}` is reserved for the aggregated bundle",
          name
        )));
      }
      if !seen.insert(namespace) {
        return Err(ConfigError::Invalid(format!(
          "themelet `{}` is declared twice (as `{}`)",
          name, namespace
        )));
      }
    }
    Ok(())
  }
}
