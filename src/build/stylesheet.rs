/* src/build/stylesheet.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::build::profile::BuildProfile;
use crate::build::revision::Revision;
use crate::config::GantryConfig;
use crate::shell;
use crate::ui;

/// Full stylesheet task: compile the source tree, then stamp every
/// produced file with the build provenance header.
pub async fn compile_with_header(
  profile: &BuildProfile,
  config: &GantryConfig,
  revision: &Revision,
  base_dir: &Path,
) -> Result<()> {
  compile(profile, config, base_dir).await?;
  let outputs = compiled_outputs(config, base_dir)?;
  let header = provenance_header(revision);
  for path in &outputs {
    prepend_header(path, &header).await?;
  }
  ui::detail_ok(&format!("{} stylesheets", outputs.len()));
  Ok(())
}

/// One compiler run over the whole source directory. Partials compile
/// into their importers, not into standalone outputs. Watch-triggered
/// recompiles call this directly and skip the header.
pub async fn compile(
  profile: &BuildProfile,
  config: &GantryConfig,
  base_dir: &Path,
) -> Result<()> {
  if !base_dir.join(&config.stylesheets.source).exists() {
    ui::detail("no stylesheet sources");
    return Ok(());
  }
  let args = compiler_args(
    config.stylesheets.minify && profile.minify,
    &config.stylesheets.source,
    &format!("{}/css", config.paths.output),
  );
  shell::run_tool(base_dir, &config.stylesheets.compiler, &args, "stylesheet compiler", &[]).await
}

fn compiler_args(compressed: bool, source: &str, out: &str) -> Vec<String> {
  let mut args = vec!["--no-source-map".to_string()];
  if compressed {
    args.push("--style=compressed".to_string());
  }
  args.push(format!("{source}:{out}"));
  args
}

/// Map every non-partial source file to the css path the compiler
/// produced for it, preserving relative layout.
fn compiled_outputs(config: &GantryConfig, base_dir: &Path) -> Result<Vec<PathBuf>> {
  let source = base_dir.join(&config.stylesheets.source);
  let out = base_dir.join(&config.paths.output).join("css");
  let mut outputs = Vec::new();
  if !source.exists() {
    return Ok(outputs);
  }
  for entry in WalkDir::new(&source) {
    let entry = entry.with_context(|| format!("failed to read {}", source.display()))?;
    if !entry.file_type().is_file() {
      continue;
    }
    let path = entry.path();
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else { continue };
    if ext != "scss" && ext != "sass" {
      continue;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };
    if name.starts_with('_') {
      continue;
    }
    let rel = path.strip_prefix(&source)?;
    outputs.push(out.join(rel).with_extension("css"));
  }
  Ok(outputs)
}

/// Header prepended to every compiled stylesheet so a deployed file can
/// be traced back to its commit.
pub fn provenance_header(revision: &Revision) -> String {
  format!("/* Build {}\n{} */\n\n", revision.commit, revision.timestamp)
}

async fn prepend_header(path: &Path, header: &str) -> Result<()> {
  let body = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read {}", path.display()))?;
  tokio::fs::write(path, format!("{header}{body}"))
    .await
    .with_context(|| format!("failed to write {}", path.display()))?;
  Ok(())
}
