/* src/main.rs */

mod build;
mod clean;
mod config;
mod dev;
mod dev_server;
mod error;
mod shell;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::build::profile::{BuildMode, BuildProfile};
use crate::build::run::run_build;
use crate::config::{GantryConfig, find_gantry_config, load_gantry_config};

#[derive(Parser)]
#[command(name = "gantry", about = "Asset build pipeline for single-page web apps")]
struct Cli {
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Unminified build, then watch sources and serve with live reload
  Dev {
    /// Path to gantry.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Production-like build served locally
  Local {
    /// Path to gantry.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Production-like build without the server
  #[command(alias = "buildLocal")]
  BuildLocal {
    /// Path to gantry.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Unminified build for a hosted dev environment
  #[command(alias = "buildDev")]
  BuildDev {
    /// Path to gantry.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Minified production build
  Production {
    /// Path to gantry.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Serve the existing build output
  Serve {
    /// Path to gantry.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Remove build output and the bundler cache
  Clean {
    /// Path to gantry.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  // bare `gantry` runs the full local verification build
  let command = cli.command.unwrap_or(Command::Local { config: None });

  match command {
    Command::Dev { config } => {
      let (base_dir, cfg) = resolve_config(config)?;
      warn_output_not_gitignored(&base_dir, &cfg);
      ui::banner("dev");
      dev::run_dev(&cfg, &base_dir).await
    }
    Command::Local { config } => run_profile_build(config, BuildMode::Local, true).await,
    Command::BuildLocal { config } => run_profile_build(config, BuildMode::Local, false).await,
    Command::BuildDev { config } => run_profile_build(config, BuildMode::DevHosted, false).await,
    Command::Production { config } => run_profile_build(config, BuildMode::Prod, false).await,
    Command::Serve { config } => {
      let (base_dir, cfg) = resolve_config(config)?;
      ui::banner("serve");
      dev_server::start_dev_server(base_dir.join(&cfg.paths.output), cfg.serve.port, None).await
    }
    Command::Clean { config } => {
      let (base_dir, cfg) = resolve_config(config)?;
      ui::blank();
      clean::run_clean(&cfg, &base_dir).await
    }
  }
}

async fn run_profile_build(
  config: Option<PathBuf>,
  mode: BuildMode,
  serve_after_build: bool,
) -> Result<()> {
  let (base_dir, cfg) = resolve_config(config)?;
  warn_output_not_gitignored(&base_dir, &cfg);
  ui::banner("build");
  let profile = BuildProfile::resolve(mode, serve_after_build, &cfg);
  let serve = profile.serve_after_build;
  run_build(profile, &cfg, &base_dir).await?;
  if serve {
    ui::blank();
    dev_server::start_dev_server(base_dir.join(&cfg.paths.output), cfg.serve.port, None).await?;
  }
  Ok(())
}

/// Load the config from the given path, or walk upward from the current
/// directory. Returns the canonical project base directory alongside
/// the config.
fn resolve_config(explicit: Option<PathBuf>) -> Result<(PathBuf, GantryConfig)> {
  let path = match explicit {
    Some(path) => path,
    None => find_gantry_config(Path::new("."))?,
  };
  let config = load_gantry_config(&path)?;
  let parent = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
    _ => PathBuf::from("."),
  };
  // tasks run with this as their working directory and take paths
  // joined onto it as arguments, so it must not stay relative
  let base_dir = parent
    .canonicalize()
    .with_context(|| format!("failed to resolve {}", parent.display()))?;
  Ok((base_dir, config))
}

/// Nudge once per run if the output directory would be committed.
fn warn_output_not_gitignored(base_dir: &Path, config: &GantryConfig) {
  // dir-only ignore patterns such as `public/` only match a pathspec
  // with a trailing slash until the directory actually exists
  let pathspec = format!("{}/", config.paths.output);
  let status = std::process::Command::new("git")
    .args(["check-ignore", "-q", &pathspec])
    .current_dir(base_dir)
    .output();
  // exit 1 means no ignore rule matched; anything else (ignored, not a
  // repository, git missing) needs no warning
  if let Ok(output) = status
    && output.status.code() == Some(1)
  {
    ui::warn(&format!(
      "{}/ is not in .gitignore -- build artifacts would be committed",
      config.paths.output
    ));
  }
}
