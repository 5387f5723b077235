/* src/build/rewrite.rs */

// Cache busting: point the root HTML at the final artifact names and
// rename the compiled stylesheet to match.

use std::path::Path;

use anyhow::{Context, Result};

use crate::build::manifest;
use crate::build::output::{self, OutputNames};
use crate::build::profile::BuildProfile;
use crate::build::revision::Revision;
use crate::config::GantryConfig;
use crate::ui;

pub async fn rewrite_references(
  profile: &BuildProfile,
  config: &GantryConfig,
  revision: &Revision,
  base_dir: &Path,
) -> Result<()> {
  let out_dir = base_dir.join(&config.paths.output);
  let manifest = manifest::read_vendor_manifest(&manifest::manifest_path(&out_dir)).await?;
  let names = OutputNames {
    app: output::app_file(profile.mode, &revision.commit),
    core: manifest.file,
    css: output::css_file(profile.mode, &revision.commit),
  };

  let index = out_dir.join("index.html");
  let html = tokio::fs::read_to_string(&index)
    .await
    .with_context(|| format!("failed to read {}", index.display()))?;
  tokio::fs::write(&index, rewrite_html(&html, &names))
    .await
    .with_context(|| format!("failed to write {}", index.display()))?;

  if names.css != "main.css" {
    let css_dir = out_dir.join("css");
    tokio::fs::rename(css_dir.join("main.css"), css_dir.join(&names.css))
      .await
      .with_context(|| format!("failed to rename main.css -> {}", names.css))?;
  }
  ui::detail_ok("index.html references updated");
  Ok(())
}

pub fn rewrite_html(html: &str, names: &OutputNames) -> String {
  html
    .replace("app.js", &names.app)
    .replace("core.js", &names.core)
    .replace("main.css", &names.css)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::build::manifest::VendorManifest;
  use crate::build::profile::BuildMode;

  const INDEX: &str = r#"<html>
<head><link rel="stylesheet" href="css/main.css"></head>
<body>
<script src="js/core.js"></script>
<script src="js/app.js"></script>
</body>
</html>"#;

  #[test]
  fn generic_names_are_replaced_everywhere() {
    let names = OutputNames {
      app: "app.abc1234.js".to_string(),
      core: "core.deadbeef.js".to_string(),
      css: "main.abc1234.css".to_string(),
    };
    let rewritten = rewrite_html(INDEX, &names);
    assert!(rewritten.contains("js/app.abc1234.js"));
    assert!(rewritten.contains("js/core.deadbeef.js"));
    assert!(rewritten.contains("css/main.abc1234.css"));
    assert!(!rewritten.contains("app.js\""));
    assert!(!rewritten.contains("core.js\""));
    assert!(!rewritten.contains("main.css\""));
  }

  #[tokio::test]
  async fn rewrites_index_and_renames_the_stylesheet() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("public");
    std::fs::create_dir_all(out.join("css")).unwrap();
    std::fs::write(out.join("index.html"), INDEX).unwrap();
    std::fs::write(out.join("css").join("main.css"), "body {}").unwrap();
    let manifest = VendorManifest {
      name: "core".to_string(),
      hash: "deadbeef".to_string(),
      file: "core.deadbeef.js".to_string(),
      modules: vec![],
    };
    crate::build::manifest::write_vendor_manifest(
      &crate::build::manifest::manifest_path(&out),
      &manifest,
    )
    .await
    .unwrap();

    let config: GantryConfig = toml::from_str("[project]\nname = \"demo\"\n").unwrap();
    let profile = BuildProfile::resolve(BuildMode::Prod, false, &config);
    let revision = Revision { commit: "abc1234".to_string(), timestamp: "now".to_string() };
    rewrite_references(&profile, &config, &revision, tmp.path()).await.unwrap();

    let html = std::fs::read_to_string(out.join("index.html")).unwrap();
    assert!(html.contains("js/app.abc1234.js"));
    assert!(html.contains("js/core.deadbeef.js"));
    assert!(html.contains("css/main.abc1234.css"));
    assert!(out.join("css").join("main.abc1234.css").is_file());
    assert!(!out.join("css").join("main.css").exists());
  }
}
