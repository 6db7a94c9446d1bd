use predicates::prelude::*;

use super::common::{TestEnv, fixture_path};

fn styled_theme() -> std::path::PathBuf {
  fixture_path("basic-theme").join("node_modules").join("styled-theme")
}

#[test]
fn kickstart_into_empty_theme() {
  let env = TestEnv::empty();

  env
    .theme_cmd()
    .arg("kickstart")
    .arg(styled_theme())
    .assert()
    .success()
    .stdout(predicate::str::contains("Kickstarted from"));

  assert!(env.join("src/css/base.scss").is_file());
  assert!(env.join("src/images/logo.svg").is_file());
  assert!(env.join("src/templates/portal_normal.ftl").is_file());
}

#[test]
fn kickstart_refuses_to_overwrite_without_terminal() {
  let env = TestEnv::empty();
  env.write_file("src/css/custom.css", "/* mine */");

  env
    .theme_cmd()
    .arg("kickstart")
    .arg(styled_theme())
    .assert()
    .failure()
    .stderr(predicate::str::contains("--force"));

  assert_eq!(env.read_file("src/css/custom.css"), "/* mine */");
}

#[test]
fn kickstart_force_overwrites() {
  let env = TestEnv::empty();
  env.write_file("src/css/custom.css", "/* mine */");

  env
    .theme_cmd()
    .arg("kickstart")
    .arg(styled_theme())
    .arg("--force")
    .assert()
    .success()
    .stdout(predicate::str::contains("Files overwritten: 1"));

  assert_eq!(env.read_file("src/css/custom.css"), "/* parent custom.css */\n");
}

#[test]
fn kickstart_missing_theme_fails() {
  let env = TestEnv::empty();

  env
    .theme_cmd()
    .arg("kickstart")
    .arg(env.join("no-such-theme"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("theme not found"));
}
