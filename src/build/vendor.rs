/* src/build/vendor.rs */

// Vendor bundle: the fixed third-party module list compiled once into a
// shared artifact, published through the manifest so the app bundle can
// link against it instead of re-bundling.

use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::build::manifest::{self, VendorManifest};
use crate::build::output;
use crate::build::profile::{BuildMode, BuildProfile};
use crate::config::GantryConfig;
use crate::shell;
use crate::ui::{self, DIM, RESET};

pub async fn bundle_vendor(
  profile: &BuildProfile,
  config: &GantryConfig,
  base_dir: &Path,
) -> Result<VendorManifest> {
  let entry = write_vendor_entry(config, base_dir).await?;
  let out_dir = base_dir.join(&config.paths.output).join("js");
  tokio::fs::create_dir_all(&out_dir)
    .await
    .with_context(|| format!("failed to create {}", out_dir.display()))?;

  // third-party code is minified even in hosted dev builds; only the
  // local watch loop keeps it readable
  let bundled = out_dir.join("core.js");
  let args = bundler_args(&entry, &bundled, profile.mode != BuildMode::DevLocal);
  shell::run_tool(base_dir, &config.bundle.bundler, &args, "vendor bundler", &[]).await?;

  let hash = content_hash(&bundled).await?;
  let file = output::core_file(profile.mode, &hash);
  if profile.mode != BuildMode::DevLocal {
    tokio::fs::rename(&bundled, out_dir.join(&file))
      .await
      .with_context(|| format!("failed to rename core.js -> {file}"))?;
  }

  let manifest = VendorManifest {
    name: "core".to_string(),
    hash,
    file: file.clone(),
    modules: config.bundle.vendor.clone(),
  };
  let manifest_file = manifest::manifest_path(&base_dir.join(&config.paths.output));
  manifest::write_vendor_manifest(&manifest_file, &manifest).await?;

  let size = std::fs::metadata(out_dir.join(&file)).map(|m| m.len()).unwrap_or(0);
  ui::detail_ok(&format!("{file}  {DIM}({}){RESET}", ui::format_size(size)));
  Ok(manifest)
}

/// Synthetic entry importing each vendor module for side effects, so one
/// bundler run pulls in the whole list.
async fn write_vendor_entry(config: &GantryConfig, base_dir: &Path) -> Result<PathBuf> {
  let cache_dir = base_dir.join(&config.paths.cache);
  tokio::fs::create_dir_all(&cache_dir)
    .await
    .with_context(|| format!("failed to create {}", cache_dir.display()))?;
  let entry = cache_dir.join("vendor.entry.js");
  let source = vendor_entry_source(&config.bundle.vendor);
  tokio::fs::write(&entry, source)
    .await
    .with_context(|| format!("failed to write {}", entry.display()))?;
  Ok(entry)
}

fn vendor_entry_source(modules: &[String]) -> String {
  let mut source = String::new();
  for module in modules {
    source.push_str(&format!("import \"{module}\";\n"));
  }
  source
}

fn bundler_args(entry: &Path, outfile: &Path, minify: bool) -> Vec<String> {
  let mut args = vec![
    entry.display().to_string(),
    "--bundle".to_string(),
    format!("--outfile={}", outfile.display()),
    "--log-level=warning".to_string(),
  ];
  if minify {
    args.push("--minify".to_string());
  }
  args
}

/// First 8 hex chars of the artifact's blake3 digest. Stable across
/// identical bundles, so unchanged vendor code keeps its cached name.
async fn content_hash(path: &Path) -> Result<String> {
  let path = path.to_path_buf();
  tokio::task::spawn_blocking(move || hash_file(&path)).await.context("hash task panicked")?
}

fn hash_file(path: &Path) -> Result<String> {
  let file =
    std::fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
  let mut reader = BufReader::new(file);
  let mut hasher = blake3::Hasher::new();
  let mut buffer = [0u8; 8192];
  loop {
    let read = reader
      .read(&mut buffer)
      .with_context(|| format!("failed to read {}", path.display()))?;
    if read == 0 {
      break;
    }
    hasher.update(&buffer[..read]);
  }
  let hex = hasher.finalize().to_hex();
  Ok(hex[..8].to_string())
}
