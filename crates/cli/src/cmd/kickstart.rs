//! Implementation of the `theme kickstart` command.
//!
//! Copies another theme's css, images, js and templates into this theme's
//! `src/`, asking before anything is overwritten.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use themeforge_lib::kickstart::{KickstartOptions, conflicts, kickstart, plan};

use crate::output::{print_info, symbols};
use crate::prompts::confirm_overwrite;

pub fn cmd_kickstart(dir: &Path, theme: &Path, force: bool) -> Result<()> {
  let files = plan(theme, dir).context("Failed to read theme to kickstart from")?;

  let existing = conflicts(&files);
  if !confirm_overwrite(&existing, force)? {
    print_info("Kickstart cancelled, nothing was copied");
    return Ok(());
  }

  let options = KickstartOptions {
    theme_path: theme.to_path_buf(),
    project_dir: dir.to_path_buf(),
    force: true,
  };
  let result = kickstart(&options).context("Kickstart failed")?;

  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    format!("Kickstarted from {}", result.source_dir.display()).green().bold()
  );
  println!();
  println!("  {} Files copied:      {}", symbols::INFO.cyan(), result.copied.len());
  println!("  {} Files overwritten: {}", symbols::INFO.cyan(), result.overwritten.len());
  println!("  {} Sources:           {}", symbols::INFO.cyan(), result.target_dir.display());
  println!();
  println!("{}", "Next steps:".bold());
  println!("  Run: {}", "theme build".cyan());

  Ok(())
}
