use themeforge_lib::pipeline::{Pipeline, Stage};

use super::common::Project;

#[tokio::test]
async fn clean_keeps_dist_and_sources() {
  let project = Project::new();
  let ctx = project.context();
  let pipeline = Pipeline::new(&ctx).unwrap();
  pipeline.run().await.unwrap();

  pipeline.run_stage(Stage::Clean).await.unwrap();

  assert!(!project.join("build").exists());
  assert!(project.archive().is_file());
  assert!(project.join("src/js/main.js").is_file());
  assert!(project.join("node_modules/parent-theme/src/css/main.scss").is_file());
}

#[tokio::test]
async fn style_stages_leave_a_single_css_dir() {
  let project = Project::new();
  let ctx = project.context();
  let pipeline = Pipeline::new(&ctx).unwrap();
  pipeline.run_target(Stage::ThemeletMerge).await.unwrap();

  pipeline.run_stage(Stage::RenameStyleDir).await.unwrap();
  assert!(!project.join("build/css").exists());
  assert!(project.join("build/_css/custom.css").is_file());

  pipeline.run_stage(Stage::CompileStyles).await.unwrap();
  assert!(project.join("build/.styles").is_dir());

  pipeline.run_stage(Stage::ConsolidateStyles).await.unwrap();
  assert!(project.join("build/css/custom.css").is_file());
  assert!(!project.join("build/.styles").exists());

  pipeline.run_stage(Stage::RemoveStyleEscapeDir).await.unwrap();
  assert!(!project.join("build/_css").exists());
  assert!(!project.join("build/.themelets").exists());
}

#[tokio::test]
async fn template_languages_filter_inherited_templates() {
  let project = Project::new();
  let ctx = project.context();
  let pipeline = Pipeline::new(&ctx).unwrap();

  pipeline.run_target(Stage::BaseCopy).await.unwrap();

  assert!(project.join("build/templates/portal_normal.ftl").is_file());
  assert!(!project.join("build/templates/portal_normal.vm").exists());
  assert!(!project.join("build/WEB-INF").exists());
}

#[tokio::test]
async fn plugin_properties_carry_theme_identity() {
  let project = Project::new();
  let ctx = project.context();
  let pipeline = Pipeline::new(&ctx).unwrap();

  pipeline.run_target(Stage::WebInfBuild).await.unwrap();

  let properties = project.read("build/WEB-INF/liferay-plugin-package.properties");
  assert!(properties.contains("name=library-theme"));
  assert!(properties.contains("3.1.0"));
}
