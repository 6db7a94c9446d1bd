//! Terminal and JSON reporting for `theme` commands.
//!
//! Status lines carry a colored marker when the stream supports color.
//! Successes and info go to stdout; warnings and errors go to stderr so
//! that `-o json` output stays parseable.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{AnsiColors, OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

#[derive(Clone, Copy)]
enum Level {
  Success,
  Info,
  Warning,
  Error,
}

impl Level {
  fn marker(self) -> (&'static str, AnsiColors) {
    match self {
      Level::Success => (symbols::SUCCESS, AnsiColors::Green),
      Level::Info => (symbols::INFO, AnsiColors::Blue),
      Level::Warning => (symbols::WARNING, AnsiColors::Yellow),
      Level::Error => (symbols::ERROR, AnsiColors::Red),
    }
  }

  fn stream(self) -> Stream {
    match self {
      Level::Success | Level::Info => Stream::Stdout,
      Level::Warning | Level::Error => Stream::Stderr,
    }
  }
}

fn status(level: Level, message: &str) {
  let (symbol, color) = level.marker();
  let stream = level.stream();
  let symbol = symbol.if_supports_color(stream, |s| s.color(color));

  match level {
    Level::Success | Level::Info => println!("{symbol} {message}"),
    // the whole line is colored for problems
    Level::Warning | Level::Error => {
      eprintln!("{symbol} {}", message.if_supports_color(stream, |s| s.color(color)))
    }
  }
}

pub fn print_success(message: &str) {
  status(Level::Success, message);
}

pub fn print_info(message: &str) {
  status(Level::Info, message);
}

pub fn print_warning(message: &str) {
  status(Level::Warning, message);
}

pub fn print_error(message: &str) {
  status(Level::Error, message);
}

/// An indented `label: value` line under a status line.
pub fn print_stat(label: &str, value: &str) {
  println!("  {}: {value}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()));
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
  println!("{json}");
  Ok(())
}

/// Archive sizes, in binary units with one decimal.
pub fn format_bytes(bytes: u64) -> String {
  const UNITS: [&str; 3] = ["KB", "MB", "GB"];

  if bytes < 1024 {
    return format!("{bytes} B");
  }
  let mut size = bytes as f64 / 1024.0;
  let mut unit = 0;
  while size >= 1024.0 && unit < UNITS.len() - 1 {
    size /= 1024.0;
    unit += 1;
  }
  format!("{size:.1} {}", UNITS[unit])
}

/// Build durations, truncated to whole milliseconds.
pub fn format_duration(duration: Duration) -> String {
  let millis = Duration::from_millis(duration.as_millis() as u64);
  humantime::format_duration(millis).to_string()
}
