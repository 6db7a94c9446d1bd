//! Test fixtures for themeforge-lib.
//!
//! `ThemeFixture` lays out a small but complete theme project in a temp
//! directory: a parent theme in `node_modules`, one themelet, local
//! overrides, and `WEB-INF` descriptors with placeholders.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::pipeline::{BuildContext, BuildOptions};

pub const PACKAGE_JSON: &str = r#"{
  "name": "base-theme",
  "version": "1.0.0",
  "liferayTheme": {
    "baseTheme": "styled-theme",
    "templateLanguages": ["ftl"],
    "locales": ["en", "es"],
    "themelets": ["test-themelet"]
  }
}"#;

pub const HOOK_XML: &str = r#"<?xml version="1.0"?>
<!DOCTYPE hook PUBLIC "-//Liferay//DTD Hook 6.2.0//EN" "http://www.liferay.com/dtd/liferay-hook_6_2_0.dtd">

<hook>
	<language-properties>content/Language_stale.properties</language-properties>
</hook>
"#;

pub const PLUGIN_PROPERTIES: &str = "name=@theme.name@
module-group-id=liferay
module-incremental-version=1
# keep this comment
author=Liferay, Inc.
";

pub const LOOK_AND_FEEL_XML: &str = r#"<?xml version="1.0"?>
<look-and-feel>
	<theme id="@theme.name@" name="@theme.name@">
		<template-extension>@theme.template.language@</template-extension>
	</theme>
</look-and-feel>
"#;

pub struct ThemeFixture {
  pub temp: TempDir,
}

impl ThemeFixture {
  /// A project with only a descriptor.
  pub fn bare(package_json: &str) -> Self {
    let fixture = Self {
      temp: TempDir::new().unwrap(),
    };
    fixture.write("package.json", package_json);
    fixture
  }

  /// The full project described in the module docs.
  pub fn basic() -> Self {
    let fixture = Self::bare(PACKAGE_JSON);

    // parent theme
    fixture.write(
      "node_modules/styled-theme/package.json",
      r#"{ "name": "styled-theme", "version": "2.0.0" }"#,
    );
    fixture.write("node_modules/styled-theme/src/css/_variables.scss", "$brand: #0b5fff;\n");
    fixture.write(
      "node_modules/styled-theme/src/css/base.scss",
      "@import \"variables\";\n.brand { color: $brand; }\n",
    );
    fixture.write("node_modules/styled-theme/src/css/custom.css", "/* parent custom.css */\n");
    fixture.write("node_modules/styled-theme/src/js/main.js", "// parent main.js\n");
    fixture.write("node_modules/styled-theme/src/images/logo.png", "PNG");
    fixture.write("node_modules/styled-theme/src/templates/portal_normal.ftl", "<#-- parent ftl -->\n");
    fixture.write("node_modules/styled-theme/src/templates/portal_normal.vm", "## parent vm\n");

    // themelet
    fixture.write(
      "node_modules/test-themelet/package.json",
      r#"{ "name": "test-themelet", "version": "1.0.0" }"#,
    );
    fixture.write(
      "node_modules/test-themelet/src/css/custom.css",
      "/* test-themelet/src/custom.css */\n.themelet { color: red; }\n",
    );
    fixture.write("node_modules/test-themelet/src/js/main.js", "// test-themelet main.js\n");

    // local overrides
    fixture.write(
      "src/css/custom.css",
      "/* custom.css */\n@import \"variables\";\n.custom { .title { color: $brand; } }\n",
    );
    fixture.write("src/js/main.js", "// local main.js\n");
    fixture.write("src/WEB-INF/liferay-hook.xml", HOOK_XML);
    fixture.write("src/WEB-INF/liferay-plugin-package.properties", PLUGIN_PROPERTIES);
    fixture.write("src/WEB-INF/liferay-look-and-feel.xml", LOOK_AND_FEEL_XML);
    fixture.write("src/WEB-INF/src/content/Language.properties", "hello=Hello\n");
    fixture.write("src/WEB-INF/src/content/Language_es.properties", "hello=Hola\n");
    fixture.write("src/WEB-INF/src/content/Language_en.properties", "hello=Hello\n");

    fixture
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  pub fn join(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  /// Write a file relative to the project root.
  pub fn write(&self, relative: &str, content: &str) {
    let path = self.join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }

  pub fn read(&self, relative: &str) -> String {
    fs::read_to_string(self.join(relative)).unwrap_or_else(|e| panic!("failed to read {}: {}", relative, e))
  }

  pub fn context(&self) -> BuildContext {
    BuildContext::load(self.path(), BuildOptions { parallelism: 2 }).unwrap()
  }
}
