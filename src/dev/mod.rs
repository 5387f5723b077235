/* src/dev/mod.rs */

// `gantry dev`: initial build, then watch sources and serve the output
// tree with live reload until ctrl-c.

mod watch;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::mpsc;

use crate::build::profile::{BuildMode, BuildProfile};
use crate::build::revision::Revision;
use crate::build::run::run_build;
use crate::build::{app, stylesheet};
use crate::config::GantryConfig;
use crate::dev_server::{ReloadHub, start_dev_server};
use crate::ui::{self, CYAN, DIM, GREEN, RED, RESET};

pub async fn run_dev(config: &GantryConfig, base_dir: &Path) -> Result<()> {
  let profile = BuildProfile::resolve(BuildMode::DevLocal, true, config);

  ui::step(1, 3, "initial build");
  let revision = run_build(profile.clone(), config, base_dir).await?;
  ui::blank();

  ui::step(2, 3, "starting watchers");
  let (_style_watcher, mut style_rx) = watch::watch_dirs(base_dir, &config.stylesheets.watch)?;
  let (_app_watcher, mut app_rx) =
    watch::watch_dirs(base_dir, std::slice::from_ref(&config.bundle.app_watch))?;
  for dir in config.stylesheets.watch.iter().chain([&config.bundle.app_watch]) {
    ui::detail(&format!("{DIM}watching {dir}{RESET}"));
  }

  ui::step(3, 3, "serving");
  let hub = ReloadHub::new();
  let server = start_dev_server(
    base_dir.join(&config.paths.output),
    config.serve.port,
    Some(hub.clone()),
  );
  tokio::pin!(server);

  loop {
    tokio::select! {
      _ = signal::ctrl_c() => {
        println!();
        println!("  {DIM}shutting down...{RESET}");
        break;
      }
      result = &mut server => {
        result.context("dev server stopped")?;
        break;
      }
      Some(()) = style_rx.recv(), if profile.watch => {
        on_style_change(&mut style_rx, &profile, config, base_dir, &hub).await;
      }
      Some(()) = app_rx.recv(), if profile.watch => {
        on_app_change(&mut app_rx, &profile, config, &revision, base_dir, &hub).await;
      }
    }
  }
  Ok(())
}

/// One watch-loop turn for stylesheets: wait out the rest of the burst,
/// rebuild once, signal connected clients.
async fn on_style_change(
  rx: &mut mpsc::Receiver<()>,
  profile: &BuildProfile,
  config: &GantryConfig,
  base_dir: &Path,
  hub: &ReloadHub,
) {
  watch::settle_events(rx).await;
  rebuild_stylesheets(profile, config, base_dir, hub).await;
}

async fn on_app_change(
  rx: &mut mpsc::Receiver<()>,
  profile: &BuildProfile,
  config: &GantryConfig,
  revision: &Revision,
  base_dir: &Path,
  hub: &ReloadHub,
) {
  watch::settle_events(rx).await;
  rebuild_app(profile, config, revision, base_dir, hub).await;
}

/// Recompile stylesheets after a watch event. Errors are reported and the
/// session keeps running; the reload only fires after a successful write.
async fn rebuild_stylesheets(
  profile: &BuildProfile,
  config: &GantryConfig,
  base_dir: &Path,
  hub: &ReloadHub,
) {
  let started = Instant::now();
  println!("  {CYAN}[watch]{RESET} stylesheets changed, recompiling...");
  match stylesheet::compile(profile, config, base_dir).await {
    Ok(()) => {
      println!(
        "  {GREEN}[watch]{RESET} stylesheets rebuilt in {:.1}s",
        started.elapsed().as_secs_f64()
      );
      hub.notify();
    }
    Err(e) => {
      println!("  {RED}[watch]{RESET} stylesheet rebuild failed: {e:#}");
    }
  }
}

async fn rebuild_app(
  profile: &BuildProfile,
  config: &GantryConfig,
  revision: &Revision,
  base_dir: &Path,
  hub: &ReloadHub,
) {
  let started = Instant::now();
  println!("  {CYAN}[watch]{RESET} app sources changed, rebundling...");
  match app::bundle_app(profile, config, revision, base_dir).await {
    Ok(file) => {
      println!(
        "  {GREEN}[watch]{RESET} {file} rebuilt in {:.1}s",
        started.elapsed().as_secs_f64()
      );
      hub.notify();
    }
    Err(e) => {
      println!("  {RED}[watch]{RESET} app rebuild failed: {e:#}");
    }
  }
}
