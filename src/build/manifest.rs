/* src/build/manifest.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::PipelineError;

/// Registry the vendor bundle publishes: which modules it contains and
/// what the artifact is called. The app bundle reads it to mark those
/// modules external instead of re-bundling them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorManifest {
  pub name: String,
  pub hash: String,
  pub file: String,
  pub modules: Vec<String>,
}

pub fn manifest_path(out_dir: &Path) -> PathBuf {
  out_dir.join("js").join("manifest.json")
}

/// Read the manifest the vendor task wrote. Absence means the ordering
/// contract was broken and gets its own error class.
pub async fn read_vendor_manifest(path: &Path) -> Result<VendorManifest> {
  if !path.is_file() {
    return Err(PipelineError::ManifestMissing(path.to_path_buf()).into());
  }
  let content = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read {}", path.display()))?;
  let manifest: VendorManifest =
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
  Ok(manifest)
}

/// Write the manifest and flush it to disk. The vendor task is not
/// complete until these bytes are durable.
pub async fn write_vendor_manifest(path: &Path, manifest: &VendorManifest) -> Result<()> {
  if let Some(parent) = path.parent() {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let json = serde_json::to_string_pretty(manifest).context("failed to serialize vendor manifest")?;
  let mut file = tokio::fs::File::create(path)
    .await
    .with_context(|| format!("failed to create {}", path.display()))?;
  file
    .write_all(json.as_bytes())
    .await
    .with_context(|| format!("failed to write {}", path.display()))?;
  file.sync_all().await.with_context(|| format!("failed to flush {}", path.display()))?;
  Ok(())
}
