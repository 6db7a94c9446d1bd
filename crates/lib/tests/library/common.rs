use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use themeforge_lib::pipeline::{BuildContext, BuildOptions};

const DESCRIPTOR: &str = r#"{
  "name": "library-theme",
  "version": "3.1.0",
  "liferayTheme": {
    "baseTheme": "parent-theme",
    "templateLanguages": ["ftl"],
    "locales": ["de", "fr"],
    "themelets": ["alpha-themelet", "beta-themelet"]
  }
}"#;

const HOOK_XML: &str = "<?xml version=\"1.0\"?>\n<hook>\n\t<language-properties>content/Language_old.properties</language-properties>\n</hook>\n";

/// A theme project on disk: one parent, two themelets, local overrides.
pub struct Project {
  temp: TempDir,
}

impl Project {
  pub fn new() -> Self {
    let project = Self {
      temp: TempDir::new().unwrap(),
    };
    project.write("package.json", DESCRIPTOR);

    project.write("node_modules/parent-theme/package.json", r#"{ "name": "parent-theme", "version": "1.0.0" }"#);
    project.write("node_modules/parent-theme/src/css/_mixins.scss", "@mixin boxed { border: 1px solid; }\n");
    project.write(
      "node_modules/parent-theme/src/css/main.scss",
      "@import \"mixins\";\n.panel { @include boxed; }\n",
    );
    project.write("node_modules/parent-theme/src/css/custom.css", ".parent {}\n");
    project.write("node_modules/parent-theme/src/js/main.js", "// parent\n");
    project.write("node_modules/parent-theme/src/js/util.js", "// parent util\n");
    project.write("node_modules/parent-theme/src/templates/portal_normal.ftl", "<#-- ftl -->\n");
    project.write("node_modules/parent-theme/src/templates/portal_normal.vm", "## vm\n");

    project.write("node_modules/alpha-themelet/src/css/custom.scss", ".alpha { a { color: red; } }\n");
    project.write("node_modules/alpha-themelet/src/js/main.js", "// alpha\n");
    project.write("node_modules/beta-themelet/src/css/custom.css", ".beta { color: blue; }\n");
    project.write("node_modules/beta-themelet/src/images/beta.png", "PNG");

    project.write("src/css/custom.css", ".local { .nested { color: green; } }\n");
    project.write("src/js/main.js", "// local\n");
    project.write("src/WEB-INF/liferay-hook.xml", HOOK_XML);
    project.write("src/WEB-INF/liferay-plugin-package.properties", "name=@theme.name@\n");
    project.write("src/WEB-INF/src/content/Language.properties", "k=v\n");
    project.write("src/WEB-INF/src/content/Language_de.properties", "k=v\n");
    project.write("src/WEB-INF/src/content/Language_fr.properties", "k=v\n");

    project
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  pub fn join(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

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
    BuildContext::load(self.path(), BuildOptions { parallelism: 3 }).unwrap()
  }

  pub fn archive(&self) -> PathBuf {
    self.join("dist/library-theme.war")
  }
}
