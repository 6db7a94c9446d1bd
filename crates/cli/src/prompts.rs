//! Interactive confirmation for destructive commands.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Result, bail};

/// How many conflicting paths are listed before the rest are summarized.
const LISTED_CONFLICTS: usize = 5;

/// Ask before overwriting `paths`. `force` answers yes without asking.
///
/// Fails instead of prompting when there is no terminal to ask on.
pub fn confirm_overwrite(paths: &[PathBuf], force: bool) -> Result<bool> {
  if paths.is_empty() || force {
    return Ok(true);
  }

  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    bail!(
      "{} existing file(s) would be overwritten. Use --force to overwrite without asking.",
      paths.len()
    );
  }

  let mut stderr = io::stderr().lock();
  writeln!(stderr, "These files already exist:")?;
  for path in paths.iter().take(LISTED_CONFLICTS) {
    writeln!(stderr, "  {}", path.display())?;
  }
  if paths.len() > LISTED_CONFLICTS {
    writeln!(stderr, "  ... and {} more", paths.len() - LISTED_CONFLICTS)?;
  }
  write!(stderr, "Overwrite them? [y/N] ")?;
  stderr.flush()?;

  let mut answer = String::new();
  io::stdin().lock().read_line(&mut answer)?;
  Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
  matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
