/* src/clean.rs */

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::GantryConfig;
use crate::ui;

/// `gantry clean`: wipe the output tree and the bundler cache.
pub async fn run_clean(config: &GantryConfig, base_dir: &Path) -> Result<()> {
  ui::arrow("cleaning workspace");
  wipe_dir(&base_dir.join(&config.paths.output)).await?;
  wipe_dir(&base_dir.join(&config.paths.cache)).await?;
  ui::ok("clean complete");
  Ok(())
}

/// Delete a directory's contents, leaving an empty directory behind.
/// A missing directory is not an error.
pub async fn wipe_dir(path: &Path) -> Result<()> {
  if path.exists() {
    tokio::fs::remove_dir_all(path)
      .await
      .with_context(|| format!("failed to remove {}", path.display()))?;
    ui::detail(&format!("cleaned {}", path.display()));
  }
  tokio::fs::create_dir_all(path)
    .await
    .with_context(|| format!("failed to create {}", path.display()))?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn wipe_missing_dir_creates_it_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let target = tmp.path().join("public");
    wipe_dir(&target).await.unwrap();
    assert!(target.is_dir());
    assert_eq!(std::fs::read_dir(&target).unwrap().count(), 0);
  }

  #[tokio::test]
  async fn wipe_removes_nested_contents() {
    let tmp = tempfile::tempdir().unwrap();
    let target = tmp.path().join("public");
    std::fs::create_dir_all(target.join("js")).unwrap();
    std::fs::write(target.join("js").join("app.js"), "stale").unwrap();

    wipe_dir(&target).await.unwrap();
    assert!(target.is_dir());
    assert!(!target.join("js").exists());
  }

  #[tokio::test]
  async fn run_clean_covers_output_and_cache() {
    let tmp = tempfile::tempdir().unwrap();
    let config: GantryConfig = toml::from_str("[project]\nname = \"demo\"\n").unwrap();
    std::fs::create_dir_all(tmp.path().join("public")).unwrap();
    std::fs::write(tmp.path().join("public").join("index.html"), "old").unwrap();
    std::fs::create_dir_all(tmp.path().join("cache")).unwrap();
    std::fs::write(tmp.path().join("cache").join("vendor.entry.js"), "old").unwrap();

    run_clean(&config, tmp.path()).await.unwrap();
    assert!(!tmp.path().join("public").join("index.html").exists());
    assert!(!tmp.path().join("cache").join("vendor.entry.js").exists());
  }
}
