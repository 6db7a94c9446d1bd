//! themeforge-lib: the theme build pipeline
//!
//! This crate turns a layered theme project into a deployable archive:
//! - `source`: parent themes and local sources merged into the build tree
//! - `metadata`: WEB-INF documents with placeholders and the hook's locale list
//! - `themelet`: themelet fragments, each under its own namespace
//! - `style`: SCSS compilation and consolidation of `css/`
//! - `package`: the `.war` archive, and deploying it
//! - `pipeline`: the stage graph and its runner

pub mod config;
pub mod consts;
pub mod kickstart;
pub mod metadata;
pub mod package;
pub mod pipeline;
pub mod source;
pub mod style;
pub mod themelet;
pub mod util;
