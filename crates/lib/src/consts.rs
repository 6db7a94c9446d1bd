//! Well-known names shared across the build stages.

/// Project descriptor read at pipeline start.
pub const DESCRIPTOR_FILE: &str = "package.json";

/// Directory holding a theme's sources, relative to the theme root.
pub const SRC_DIR: &str = "src";

/// Where dependencies are looked up when no explicit path is given.
pub const NODE_MODULES_DIR: &str = "node_modules";

pub const DEFAULT_BUILD_DIR: &str = "build";
pub const DEFAULT_DIST_DIR: &str = "dist";

pub const CSS_DIR: &str = "css";
pub const JS_DIR: &str = "js";
pub const IMAGES_DIR: &str = "images";
pub const TEMPLATES_DIR: &str = "templates";
pub const WEB_INF_DIR: &str = "WEB-INF";

/// Asset folders a theme contributes, in copy order.
pub const ASSET_DIRS: &[&str] = &[CSS_DIR, IMAGES_DIR, JS_DIR, TEMPLATES_DIR];

/// Escape name the stylesheet directory is renamed to before compilation.
pub const CSS_ESCAPE_DIR: &str = "_css";

/// Two-phase compile output, swapped into `css/` by consolidation.
pub const STYLES_OUT_DIR: &str = ".styles";

/// Themelet stylesheet sources staged for compilation.
pub const THEMELET_STAGING_DIR: &str = ".themelets";

/// Build-tree entries that never make it into the archive.
pub const SCRATCH_DIRS: &[&str] = &[CSS_ESCAPE_DIR, STYLES_OUT_DIR, THEMELET_STAGING_DIR];

/// Aggregated stylesheet bundle of every themelet.
pub const THEMELET_BUNDLE: &str = "themelet.css";

pub const HOOK_DESCRIPTOR: &str = "liferay-hook.xml";
pub const PLUGIN_PACKAGE_PROPERTIES: &str = "liferay-plugin-package.properties";

/// Suffix of a metadata document whose placeholders have been resolved.
pub const PROCESSED_SUFFIX: &str = ".processed";

/// Classpath source root inside `WEB-INF`, and its packaged name.
pub const WEB_INF_SRC_DIR: &str = "src";
pub const WEB_INF_CLASSES_DIR: &str = "classes";

/// Language bundles live here, relative to `WEB-INF/src`.
pub const CONTENT_DIR: &str = "content";
pub const LANGUAGE_FILE_PREFIX: &str = "Language_";
pub const PROPERTIES_EXT: &str = "properties";

/// Template extensions subject to template-language filtering.
pub const KNOWN_TEMPLATE_LANGUAGES: &[&str] = &["ftl", "vm"];
pub const DEFAULT_TEMPLATE_LANGUAGE: &str = "ftl";

pub const ARCHIVE_EXT: &str = "war";

/// Overrides the configured deploy directory.
pub const DEPLOY_PATH_ENV: &str = "THEMEFORGE_DEPLOY_PATH";
