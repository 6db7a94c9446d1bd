use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn full_build_writes_archive() {
  let env = TestEnv::from_fixture("basic-theme");

  env
    .theme_cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Built base-theme"))
    .stdout(predicate::str::contains("base-theme.war"))
    .stdout(predicate::str::contains("Fingerprint"));

  assert!(env.join("dist/base-theme.war").is_file());
  assert!(!env.join("build/_css").exists());
  assert!(env.read_file("build/css/custom.css").contains(".custom .title"));
  assert!(env.read_file("build/css/themelet.css").contains(".themelet"));
  assert_eq!(env.read_file("build/js/test-themelet/main.js"), "// test-themelet main.js\n");
}

#[test]
fn rebuild_gives_identical_archive() {
  let env = TestEnv::from_fixture("basic-theme");

  env.theme_cmd().arg("build").assert().success();
  let first = std::fs::read(env.join("dist/base-theme.war")).unwrap();
  env.theme_cmd().arg("build").assert().success();
  let second = std::fs::read(env.join("dist/base-theme.war")).unwrap();

  assert_eq!(first, second);
}

#[test]
fn selected_stage_with_deps() {
  let env = TestEnv::from_fixture("basic-theme");

  env
    .theme_cmd()
    .args(["build", "--stage", "hook-metadata-build", "--with-deps"])
    .assert()
    .success()
    .stdout(predicate::str::contains("metadata-written"));

  let hook = env.read_file("build/WEB-INF/liferay-hook.xml.processed");
  assert!(hook.contains("content/Language_en.properties"));
  assert!(hook.contains("content/Language_es.properties"));
  assert!(!hook.contains("Language_stale"));
  assert!(!env.join("dist").exists());
}

#[test]
fn single_stage_without_deps() {
  let env = TestEnv::from_fixture("basic-theme");

  env
    .theme_cmd()
    .args(["build", "--stage", "base-copy"])
    .assert()
    .success();

  assert!(env.join("build/css/base.scss").is_file());
  // src-overlay did not run
  assert_eq!(env.read_file("build/css/custom.css"), "/* parent custom.css */\n");
}

#[test]
fn json_report() {
  let env = TestEnv::from_fixture("basic-theme");

  env
    .theme_cmd()
    .args(["build", "-o", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"theme\": \"base-theme\""))
    .stdout(predicate::str::contains("\"reached\": \"packaged\""))
    .stdout(predicate::str::contains("\"fingerprint\""));
}

#[test]
fn compile_failure_names_stage() {
  let env = TestEnv::from_fixture("basic-theme");
  env.write_file("src/css/broken.scss", ".broken { color: ");

  env
    .theme_cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("compile-styles"))
    .stderr(predicate::str::contains("themelets-merged"))
    .stderr(predicate::str::contains("broken.scss"));

  assert!(!env.join("dist/base-theme.war").exists());
}

#[test]
fn missing_parent_is_reported_not_fatal() {
  let env = TestEnv::from_fixture("basic-theme");
  std::fs::remove_dir_all(env.join("node_modules/styled-theme")).unwrap();
  // the variables partial came from the parent
  env.write_file("src/css/custom.css", ".custom { color: blue; }\n");

  env
    .theme_cmd()
    .arg("build")
    .assert()
    .success()
    .stderr(predicate::str::contains("styled-theme"));

  assert!(env.join("dist/base-theme.war").is_file());
}

#[test]
fn clean_removes_build_but_keeps_archive() {
  let env = TestEnv::from_fixture("basic-theme");
  env.theme_cmd().arg("build").assert().success();

  env.theme_cmd().arg("clean").assert().success();

  assert!(!env.join("build").exists());
  assert!(env.join("dist/base-theme.war").is_file());

  // again, with nothing to remove
  env.theme_cmd().arg("clean").assert().success();
}

#[test]
fn build_without_descriptor_fails() {
  let env = TestEnv::empty();

  env
    .theme_cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("package.json"));
}
