//! Shared test helpers for CLI integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture directory.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

fn copy_dir(src: &Path, dest: &Path) {
  fs::create_dir_all(dest).unwrap();
  for entry in fs::read_dir(src).unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", src.display(), e)) {
    let entry = entry.unwrap();
    let target = dest.join(entry.file_name());
    if entry.file_type().unwrap().is_dir() {
      copy_dir(&entry.path(), &target);
    } else {
      fs::copy(entry.path(), &target).unwrap();
    }
  }
}

/// Isolated theme project.
///
/// Each test gets its own temporary copy of a fixture project, so builds
/// never write into the source tree.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Copy a fixture project into a fresh temporary directory.
  pub fn from_fixture(name: &str) -> Self {
    let temp = TempDir::new().unwrap();
    copy_dir(&fixture_path(name), temp.path());
    Self { temp }
  }

  /// An empty project directory.
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn join(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    fs::read_to_string(self.join(relative_path)).unwrap_or_else(|e| panic!("Failed to read {}: {}", relative_path, e))
  }

  /// A `theme` command pointed at this project, with a clean environment.
  pub fn theme_cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("theme");
    cmd
      .arg("--dir")
      .arg(self.temp.path())
      .env_remove("THEMEFORGE_DEPLOY_PATH")
      .env_remove("RUST_LOG");
    cmd
  }
}
