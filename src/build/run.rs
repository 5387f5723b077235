/* src/build/run.rs */

// One-shot build: resolve the profile, run the task graph, report the
// artifacts it produced.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use anyhow::{Context, Result, bail};

use crate::build::graph::{self, Task};
use crate::build::output::{self, OutputNames};
use crate::build::profile::BuildProfile;
use crate::build::revision::{self, Revision};
use crate::build::{app, assets, constants, manifest, rewrite, stylesheet, vendor};
use crate::clean;
use crate::config::GantryConfig;
use crate::shell;
use crate::ui::{self, CYAN, DIM, RESET};

/// Everything a task needs, shared across the graph. The revision slot
/// is written by the revision task and read by everything downstream of
/// it.
struct BuildContext {
  profile: BuildProfile,
  config: GantryConfig,
  base_dir: PathBuf,
  revision: OnceLock<Revision>,
}

impl BuildContext {
  fn revision(&self) -> Result<&Revision> {
    self.revision.get().context("revision task has not completed")
  }
}

pub async fn run_build(
  profile: BuildProfile,
  config: &GantryConfig,
  base_dir: &Path,
) -> Result<Revision> {
  let started = Instant::now();
  ui::mode_banner(profile.mode.banner_label(), profile.banner_bg());
  ensure_tools(config)?;

  let cx = Arc::new(BuildContext {
    profile: profile.clone(),
    config: config.clone(),
    base_dir: base_dir.to_path_buf(),
    revision: OnceLock::new(),
  });
  let nodes = graph::plan_tasks(&profile);
  let runner_cx = Arc::clone(&cx);
  graph::execute_graph(&nodes, move |task| {
    let cx = Arc::clone(&runner_cx);
    async move { run_task(&cx, task).await }
  })
  .await?;

  let revision = cx.revision()?.clone();
  print_summary(&cx, &revision, started.elapsed().as_secs_f64()).await?;
  Ok(revision)
}

async fn run_task(cx: &BuildContext, task: Task) -> Result<()> {
  ui::arrow(task.name());
  match task {
    Task::Clean => {
      clean::wipe_dir(&cx.base_dir.join(&cx.config.paths.output)).await?;
      clean::wipe_dir(&cx.base_dir.join(&cx.config.paths.cache)).await
    }
    Task::Revision => {
      let revision = revision::read_revision(&cx.base_dir).await?;
      ui::detail(&format!("This build is based on commit {CYAN}{}{RESET}", revision.commit));
      let _ = cx.revision.set(revision);
      Ok(())
    }
    Task::Constants => constants::stage_constants(&cx.profile, &cx.config, &cx.base_dir).await,
    Task::CopyAssets => assets::copy_assets(&cx.config, &cx.base_dir).await,
    Task::Stylesheet => {
      stylesheet::compile_with_header(&cx.profile, &cx.config, cx.revision()?, &cx.base_dir).await
    }
    Task::VendorBundle => {
      vendor::bundle_vendor(&cx.profile, &cx.config, &cx.base_dir).await.map(|_| ())
    }
    Task::AppBundle => {
      app::bundle_app(&cx.profile, &cx.config, cx.revision()?, &cx.base_dir).await.map(|_| ())
    }
    Task::RewriteHtml => {
      rewrite::rewrite_references(&cx.profile, &cx.config, cx.revision()?, &cx.base_dir).await
    }
  }
}

/// Both external tools must be reachable before any task runs.
fn ensure_tools(config: &GantryConfig) -> Result<()> {
  let tools = [
    (&config.stylesheets.compiler, "stylesheet compiler"),
    (&config.bundle.bundler, "bundler"),
  ];
  for (command, purpose) in tools {
    if !shell::tool_exists(command) {
      bail!("{purpose} \"{command}\" not found -- install it or adjust gantry.toml");
    }
  }
  Ok(())
}

async fn print_summary(cx: &BuildContext, revision: &Revision, elapsed: f64) -> Result<()> {
  let out_dir = cx.base_dir.join(&cx.config.paths.output);
  let manifest = manifest::read_vendor_manifest(&manifest::manifest_path(&out_dir)).await?;
  let names = OutputNames {
    app: output::app_file(cx.profile.mode, &revision.commit),
    core: manifest.file,
    css: output::css_file(cx.profile.mode, &revision.commit),
  };

  ui::blank();
  ui::ok(&format!("{} build complete in {elapsed:.1}s", cx.config.project.name));
  for rel in
    [format!("js/{}", names.app), format!("js/{}", names.core), format!("css/{}", names.css)]
  {
    let size = std::fs::metadata(out_dir.join(&rel)).map(|m| m.len()).unwrap_or(0);
    ui::detail_ok(&format!(
      "{}/{rel}  {DIM}({}){RESET}",
      cx.config.paths.output,
      ui::format_size(size)
    ));
  }
  Ok(())
}
