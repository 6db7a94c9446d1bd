use themeforge_lib::package::read_entry_names;
use themeforge_lib::pipeline::{Pipeline, PipelineError, PipelineState, Stage};

use super::common::Project;

#[tokio::test]
async fn full_build_produces_expected_archive() {
  let project = Project::new();
  let ctx = project.context();
  let pipeline = Pipeline::new(&ctx).unwrap();

  let report = pipeline.run().await.unwrap();

  assert_eq!(report.reached, Some(PipelineState::Packaged));
  assert_eq!(report.archive.as_deref(), Some(project.archive().as_path()));
  assert!(report.skipped().is_empty());

  let entries = read_entry_names(&project.archive()).unwrap();
  for expected in [
    "WEB-INF/liferay-hook.xml",
    "WEB-INF/liferay-plugin-package.properties",
    "WEB-INF/classes/content/Language_de.properties",
    "css/main.css",
    "css/custom.css",
    "css/alpha-themelet.css",
    "css/beta-themelet.css",
    "css/themelet.css",
    "js/main.js",
    "js/util.js",
    "js/alpha-themelet/main.js",
    "images/beta-themelet/beta.png",
    "templates/portal_normal.ftl",
  ] {
    assert!(entries.iter().any(|e| e == expected), "missing {expected} in {entries:?}");
  }
  assert!(!entries.iter().any(|e| e.ends_with(".vm")));
  assert!(!entries.iter().any(|e| e.ends_with(".processed")));
  assert!(!entries.iter().any(|e| e.starts_with("_css") || e.starts_with(".themelets")));
  assert!(!entries.iter().any(|e| e.contains("_mixins")));
}

#[tokio::test]
async fn local_sources_override_parent() {
  let project = Project::new();
  let ctx = project.context();
  Pipeline::new(&ctx).unwrap().run().await.unwrap();

  assert_eq!(project.read("build/js/main.js"), "// local\n");
  assert_eq!(project.read("build/js/util.js"), "// parent util\n");
  let custom = project.read("build/css/custom.css");
  assert!(custom.contains(".local .nested"));
  assert!(!custom.contains(".parent"));
}

#[tokio::test]
async fn themelet_bundle_follows_declaration_order() {
  let project = Project::new();
  let ctx = project.context();
  Pipeline::new(&ctx).unwrap().run().await.unwrap();

  let bundle = project.read("build/css/themelet.css");
  let alpha = bundle.find(".alpha a").unwrap();
  let beta = bundle.find(".beta").unwrap();
  assert!(alpha < beta);
  assert!(project.read("build/css/alpha-themelet.css").contains(".alpha a"));
  assert!(project.join("build/css/main.css").is_file());
}

#[tokio::test]
async fn hook_lists_declared_locales() {
  let project = Project::new();
  let ctx = project.context();
  Pipeline::new(&ctx).unwrap().run().await.unwrap();

  let hook = project.read("build/WEB-INF/liferay-hook.xml.processed");
  let de = hook.find("content/Language_de.properties").unwrap();
  let fr = hook.find("content/Language_fr.properties").unwrap();
  assert!(de < fr);
  assert!(!hook.contains("Language_old"));
  // the source descriptor is left alone
  assert!(project.read("src/WEB-INF/liferay-hook.xml").contains("Language_old"));
}

#[tokio::test]
async fn rebuilds_are_reproducible() {
  let project = Project::new();
  let ctx = project.context();
  let pipeline = Pipeline::new(&ctx).unwrap();

  let first = pipeline.run().await.unwrap();
  let first_bytes = std::fs::read(project.archive()).unwrap();
  let second = pipeline.run().await.unwrap();
  let second_bytes = std::fs::read(project.archive()).unwrap();

  assert!(first.fingerprint.is_some());
  assert_eq!(first.fingerprint, second.fingerprint);
  assert_eq!(first_bytes, second_bytes);
}

#[tokio::test]
async fn source_change_changes_fingerprint() {
  let project = Project::new();
  let ctx = project.context();
  let pipeline = Pipeline::new(&ctx).unwrap();

  let before = pipeline.run().await.unwrap().fingerprint;
  project.write("src/js/main.js", "// local, edited\n");
  let after = pipeline.run().await.unwrap().fingerprint;

  assert_ne!(before, after);
}

#[tokio::test]
async fn run_target_runs_only_predecessors() {
  let project = Project::new();
  let ctx = project.context();
  let pipeline = Pipeline::new(&ctx).unwrap();

  let report = pipeline.run_target(Stage::ThemeletMerge).await.unwrap();

  let ran: Vec<_> = report.stages.iter().map(|s| s.stage).collect();
  assert_eq!(ran.first(), Some(&Stage::Clean));
  assert_eq!(ran.last(), Some(&Stage::ThemeletMerge));
  assert!(!ran.contains(&Stage::CompileStyles));
  assert_eq!(report.reached, Some(PipelineState::ThemeletsMerged));
  assert!(project.join("build/.themelets/alpha-themelet/custom.scss").is_file());
  assert!(!project.archive().exists());
}

#[tokio::test]
async fn selected_stages_run_in_dependency_order() {
  let project = Project::new();
  let ctx = project.context();
  let pipeline = Pipeline::new(&ctx).unwrap();

  let report = pipeline
    .run_stages(&[Stage::SrcOverlay, Stage::Clean, Stage::BaseCopy])
    .await
    .unwrap();

  let ran: Vec<_> = report.stages.iter().map(|s| s.stage).collect();
  assert_eq!(ran, vec![Stage::Clean, Stage::BaseCopy, Stage::SrcOverlay]);
}

#[tokio::test]
async fn compile_failure_stops_before_package() {
  let project = Project::new();
  project.write("src/css/broken.scss", ".x { color: ");
  let ctx = project.context();

  let err = Pipeline::new(&ctx).unwrap().run().await.unwrap_err();

  match err {
    PipelineError::StageFailed { stage, reached, .. } => {
      assert_eq!(stage, Stage::CompileStyles);
      assert_eq!(reached, Some(PipelineState::ThemeletsMerged));
    }
    other => panic!("unexpected error: {other}"),
  }
  assert!(!project.archive().exists());
  assert!(!project.join("build/.styles").exists());
}

#[tokio::test]
async fn missing_themelet_is_skipped_with_note() {
  let project = Project::new();
  std::fs::remove_dir_all(project.join("node_modules/beta-themelet")).unwrap();
  let ctx = project.context();

  let report = Pipeline::new(&ctx).unwrap().run().await.unwrap();

  let skipped = report.skipped();
  assert_eq!(skipped.len(), 1);
  assert!(skipped[0].starts_with("themelet-merge:"));
  assert!(skipped[0].contains("beta-themelet"));
  assert!(!project.join("build/css/beta-themelet.css").exists());
  assert!(project.join("build/css/themelet.css").is_file());
}

#[tokio::test]
async fn scoped_themelet_uses_unscoped_namespace() {
  let project = Project::new();
  project.write(
    "package.json",
    r#"{ "name": "library-theme", "liferayTheme": { "themelets": ["@acme/fancy"] } }"#,
  );
  project.write("node_modules/@acme/fancy/src/css/custom.scss", ".fancy { .x { top: 0; } }\n");
  project.write("node_modules/@acme/fancy/src/js/main.js", "// fancy\n");
  let ctx = project.context();

  Pipeline::new(&ctx).unwrap().run().await.unwrap();

  assert_eq!(project.read("build/js/fancy/main.js"), "// fancy\n");
  assert!(project.read("build/css/fancy.css").contains(".fancy .x"));
  assert!(project.read("build/css/themelet.css").contains(".fancy .x"));
}
