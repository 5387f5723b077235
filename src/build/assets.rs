/* src/build/assets.rs */

// Static asset categories copied from the source tree to the output tree.
// Categories run concurrently and independently: one failing does not
// stop the others.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures_util::future::join_all;
use walkdir::WalkDir;

use crate::config::GantryConfig;
use crate::error::PipelineError;
use crate::ui;

/// One copy unit: a source subtree (or single file) with an optional
/// extension filter.
#[derive(Debug, Clone)]
pub struct AssetCategory {
  pub name: &'static str,
  pub from: PathBuf,
  pub to: PathBuf,
  pub ext: Option<&'static str>,
}

pub fn asset_categories(config: &GantryConfig, base_dir: &Path) -> Vec<AssetCategory> {
  let src = base_dir.join(&config.paths.source);
  let out = base_dir.join(&config.paths.output);
  vec![
    AssetCategory { name: "fonts", from: src.join("fonts"), to: out.join("fonts"), ext: None },
    AssetCategory {
      name: "graphics",
      from: src.join("graphics"),
      to: out.join("graphics"),
      ext: None,
    },
    AssetCategory { name: "images", from: src.join("img"), to: out.join("img"), ext: None },
    AssetCategory {
      name: "stylesheets",
      from: src.join("css"),
      to: out.join("css"),
      ext: Some("css"),
    },
    AssetCategory { name: "docs", from: src.join("help"), to: out.join("help"), ext: Some("md") },
    AssetCategory {
      name: "html",
      from: base_dir.join(&config.paths.index),
      to: out.join("index.html"),
      ext: None,
    },
  ]
}

pub async fn copy_assets(config: &GantryConfig, base_dir: &Path) -> Result<()> {
  copy_categories(asset_categories(config, base_dir)).await
}

/// Copy every category concurrently, collecting failures instead of
/// short-circuiting on the first one.
pub async fn copy_categories(categories: Vec<AssetCategory>) -> Result<()> {
  let total = categories.len();
  let jobs = categories.into_iter().map(|category| {
    let name = category.name;
    tokio::task::spawn_blocking(move || (name, copy_category(&category)))
  });

  let mut failed = 0;
  for joined in join_all(jobs).await {
    let (name, result) = joined.context("asset copy task panicked")?;
    match result {
      Ok(copied) => ui::detail_ok(&format!("{name}: {copied} files")),
      Err(e) => {
        failed += 1;
        ui::fail(&format!("{name}: {e:#}"));
      }
    }
  }
  if failed > 0 {
    return Err(PipelineError::AssetCopy { failed, total }.into());
  }
  Ok(())
}

/// Copy one category, preserving relative paths. A missing source is a
/// no-op since not every project ships every category. Returns the
/// number of files copied.
fn copy_category(category: &AssetCategory) -> Result<usize> {
  if !category.from.exists() {
    return Ok(0);
  }
  if category.from.is_file() {
    copy_file(&category.from, &category.to)?;
    return Ok(1);
  }

  let mut copied = 0;
  for entry in WalkDir::new(&category.from) {
    let entry = entry.with_context(|| format!("failed to read {}", category.from.display()))?;
    if !entry.file_type().is_file() {
      continue;
    }
    if let Some(ext) = category.ext
      && entry.path().extension().and_then(|e| e.to_str()) != Some(ext)
    {
      continue;
    }
    let rel = entry.path().strip_prefix(&category.from)?;
    copy_file(entry.path(), &category.to.join(rel))?;
    copied += 1;
  }
  Ok(copied)
}

fn copy_file(src: &Path, dst: &Path) -> Result<()> {
  if let Some(parent) = dst.parent() {
    fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  fs::copy(src, dst)
    .with_context(|| format!("failed to copy {} -> {}", src.display(), dst.display()))?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn demo_config() -> GantryConfig {
    toml::from_str("[project]\nname = \"demo\"\n").unwrap()
  }

  #[tokio::test]
  async fn copies_every_category_it_finds() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    std::fs::create_dir_all(src.join("fonts")).unwrap();
    std::fs::write(src.join("fonts").join("logo.woff"), "woff").unwrap();
    std::fs::create_dir_all(src.join("img").join("icons")).unwrap();
    std::fs::write(src.join("img").join("icons").join("x.svg"), "<svg/>").unwrap();
    std::fs::write(src.join("index.html"), "<html></html>").unwrap();

    copy_assets(&demo_config(), tmp.path()).await.unwrap();
    let out = tmp.path().join("public");
    assert_eq!(std::fs::read_to_string(out.join("fonts").join("logo.woff")).unwrap(), "woff");
    assert_eq!(
      std::fs::read_to_string(out.join("img").join("icons").join("x.svg")).unwrap(),
      "<svg/>"
    );
    assert_eq!(std::fs::read_to_string(out.join("index.html")).unwrap(), "<html></html>");
  }

  #[tokio::test]
  async fn extension_filter_skips_other_files() {
    let tmp = tempfile::tempdir().unwrap();
    let help = tmp.path().join("src").join("help");
    std::fs::create_dir_all(&help).unwrap();
    std::fs::write(help.join("guide.md"), "# guide").unwrap();
    std::fs::write(help.join("notes.txt"), "scratch").unwrap();

    copy_assets(&demo_config(), tmp.path()).await.unwrap();
    let out = tmp.path().join("public").join("help");
    assert!(out.join("guide.md").is_file());
    assert!(!out.join("notes.txt").exists());
  }

  #[tokio::test]
  async fn one_failure_does_not_stop_the_others() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("good.txt"), "ok").unwrap();
    std::fs::write(tmp.path().join("blocker"), "i am a file").unwrap();

    let categories = vec![
      AssetCategory {
        name: "good",
        from: tmp.path().join("good.txt"),
        to: tmp.path().join("out").join("good.txt"),
        ext: None,
      },
      // destination parent is a file, so this category cannot copy
      AssetCategory {
        name: "bad",
        from: tmp.path().join("good.txt"),
        to: tmp.path().join("blocker").join("good.txt"),
        ext: None,
      },
    ];

    let err = copy_categories(categories).await.unwrap_err();
    match err.downcast_ref::<PipelineError>() {
      Some(PipelineError::AssetCopy { failed, total }) => {
        assert_eq!((*failed, *total), (1, 2));
      }
      other => panic!("expected AssetCopy error, got {other:?}"),
    }
    // the healthy category still landed
    assert_eq!(std::fs::read_to_string(tmp.path().join("out").join("good.txt")).unwrap(), "ok");
  }

  #[tokio::test]
  async fn missing_categories_are_no_ops() {
    let tmp = tempfile::tempdir().unwrap();
    copy_assets(&demo_config(), tmp.path()).await.unwrap();
    assert!(!tmp.path().join("public").join("fonts").exists());
  }
}
