mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use themeforge_lib::pipeline::Stage;

use crate::output::{OutputFormat, print_error};

/// Build deployable theme packages from layered theme sources
#[derive(Parser)]
#[command(name = "theme")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Theme project directory (the one holding package.json)
  #[arg(short = 'C', long, global = true, default_value = ".")]
  dir: PathBuf,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the build pipeline and write the .war archive
  Build {
    /// Run only this stage (repeatable); see `theme stages`
    #[arg(short, long = "stage", value_name = "STAGE")]
    stages: Vec<Stage>,

    /// Also run everything the selected stages depend on
    #[arg(long, requires = "stages")]
    with_deps: bool,

    /// Give up when the build takes longer than this (e.g. "90s", "5m")
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Remove the build directory
  Clean,

  /// List pipeline stages in execution order
  Stages {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Copy another theme's css, images, js and templates into this theme
  Kickstart {
    /// Root directory of the theme to copy from
    theme: PathBuf,

    /// Overwrite existing files without asking
    #[arg(short, long)]
    force: bool,
  },

  /// Copy the built archive into an application server's deploy directory
  Deploy {
    /// Deploy directory (overrides THEMEFORGE_DEPLOY_PATH and deployPath)
    #[arg(long)]
    to: Option<PathBuf>,
  },
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Build {
      stages,
      with_deps,
      timeout,
      output,
    } => cmd::cmd_build(&cli.dir, &stages, with_deps, timeout, output),
    Commands::Clean => cmd::cmd_clean(&cli.dir),
    Commands::Stages { output } => cmd::cmd_stages(output),
    Commands::Kickstart { theme, force } => cmd::cmd_kickstart(&cli.dir, &theme, force),
    Commands::Deploy { to } => cmd::cmd_deploy(&cli.dir, to.as_deref()),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}
