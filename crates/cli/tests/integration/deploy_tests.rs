use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn deploy_to_explicit_dir() {
  let env = TestEnv::from_fixture("basic-theme");
  env.theme_cmd().arg("build").assert().success();
  let target = env.join("server/deploy");

  env
    .theme_cmd()
    .arg("deploy")
    .arg("--to")
    .arg(&target)
    .assert()
    .success()
    .stdout(predicate::str::contains("Deployed base-theme"));

  assert_eq!(
    std::fs::read(target.join("base-theme.war")).unwrap(),
    std::fs::read(env.join("dist/base-theme.war")).unwrap()
  );
}

#[test]
fn deploy_dir_from_environment() {
  let env = TestEnv::from_fixture("basic-theme");
  env.theme_cmd().arg("build").assert().success();
  let target = env.join("from-env");

  env
    .theme_cmd()
    .arg("deploy")
    .env("THEMEFORGE_DEPLOY_PATH", &target)
    .assert()
    .success();

  assert!(target.join("base-theme.war").is_file());
}

#[test]
fn deploy_before_build_fails() {
  let env = TestEnv::from_fixture("basic-theme");

  env
    .theme_cmd()
    .args(["deploy", "--to"])
    .arg(env.join("deploy"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("run a build first"));
}

#[test]
fn deploy_without_target_fails() {
  let env = TestEnv::from_fixture("basic-theme");
  env.theme_cmd().arg("build").assert().success();

  env
    .theme_cmd()
    .arg("deploy")
    .assert()
    .failure()
    .stderr(predicate::str::contains("no deploy directory configured"));
}
