//! Well-known locations of one theme project.

use std::path::{Path, PathBuf};

use crate::consts::{
  ARCHIVE_EXT, CSS_DIR, CSS_ESCAPE_DIR, SRC_DIR, STYLES_OUT_DIR, THEMELET_STAGING_DIR, WEB_INF_DIR,
};

use super::ThemeConfig;

/// Absolute paths derived from the project root and its descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePaths {
  pub root: PathBuf,
  pub src: PathBuf,
  pub build: PathBuf,
  pub dist: PathBuf,
}

impl ThemePaths {
  pub fn new(root: &Path, config: &ThemeConfig) -> Self {
    Self {
      root: root.to_path_buf(),
      src: root.join(SRC_DIR),
      build: root.join(&config.build_dir),
      dist: root.join(&config.dist_dir),
    }
  }

  pub fn build_css(&self) -> PathBuf {
    self.build.join(CSS_DIR)
  }

  pub fn css_escape(&self) -> PathBuf {
    self.build.join(CSS_ESCAPE_DIR)
  }

  pub fn styles_out(&self) -> PathBuf {
    self.build.join(STYLES_OUT_DIR)
  }

  pub fn themelet_staging(&self) -> PathBuf {
    self.build.join(THEMELET_STAGING_DIR)
  }

  pub fn src_web_inf(&self) -> PathBuf {
    self.src.join(WEB_INF_DIR)
  }

  pub fn build_web_inf(&self) -> PathBuf {
    self.build.join(WEB_INF_DIR)
  }

  pub fn archive(&self, config: &ThemeConfig) -> PathBuf {
    self.dist.join(format!("{}.{}", config.archive_name(), ARCHIVE_EXT))
  }
}
