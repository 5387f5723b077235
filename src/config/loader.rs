/* src/config/loader.rs */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::GantryConfig;

/// Walk upward from `start` until a `gantry.toml` is found, the same way
/// cargo locates its manifest.
pub fn find_gantry_config(start: &Path) -> Result<PathBuf> {
  let mut dir = start
    .canonicalize()
    .with_context(|| format!("failed to resolve {}", start.display()))?;
  loop {
    let candidate = dir.join("gantry.toml");
    if candidate.is_file() {
      return Ok(candidate);
    }
    if !dir.pop() {
      bail!("gantry.toml not found (searched upward from {})", start.display());
    }
  }
}

pub fn load_gantry_config(path: &Path) -> Result<GantryConfig> {
  let content =
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let config: GantryConfig =
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
  Ok(config)
}
