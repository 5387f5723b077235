/* src/build/app.rs */

use std::path::Path;

use anyhow::Result;

use crate::build::manifest;
use crate::build::output;
use crate::build::profile::BuildProfile;
use crate::build::revision::Revision;
use crate::config::GantryConfig;
use crate::shell;
use crate::ui::{self, DIM, RESET};

/// Bundle the application entry point. Every module the vendor manifest
/// lists is marked external, so the app artifact stays small and the
/// vendor bundle does the heavy lifting.
pub async fn bundle_app(
  profile: &BuildProfile,
  config: &GantryConfig,
  revision: &Revision,
  base_dir: &Path,
) -> Result<String> {
  let out_dir = base_dir.join(&config.paths.output);
  let manifest = manifest::read_vendor_manifest(&manifest::manifest_path(&out_dir)).await?;

  let file = output::app_file(profile.mode, &revision.commit);
  let outfile = out_dir.join("js").join(&file);
  let args = bundler_args(&config.paths.entry, &outfile, profile, &manifest.modules);
  let env = [("NODE_ENV", profile.runtime_mode.as_str())];
  shell::run_tool(base_dir, &config.bundle.bundler, &args, "app bundler", &env).await?;

  let size = std::fs::metadata(&outfile).map(|m| m.len()).unwrap_or(0);
  ui::detail_ok(&format!("{file}  {DIM}({}){RESET}", ui::format_size(size)));
  Ok(file)
}

fn bundler_args(
  entry: &str,
  outfile: &Path,
  profile: &BuildProfile,
  external: &[String],
) -> Vec<String> {
  let mut args = vec![
    entry.to_string(),
    "--bundle".to_string(),
    format!("--outfile={}", outfile.display()),
    format!("--define:process.env.NODE_ENV=\"{}\"", profile.runtime_mode.as_str()),
    "--log-level=warning".to_string(),
  ];
  for module in external {
    args.push(format!("--external:{module}"));
  }
  if profile.minify {
    args.push("--minify".to_string());
  }
  if profile.mode.is_dev() {
    args.push("--sourcemap".to_string());
  }
  args
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::build::profile::BuildMode;
  use crate::error::PipelineError;

  fn demo_config() -> GantryConfig {
    toml::from_str("[project]\nname = \"demo\"\n").unwrap()
  }

  fn profile(mode: BuildMode) -> BuildProfile {
    BuildProfile::resolve(mode, false, &demo_config())
  }

  #[test]
  fn every_vendor_module_is_external() {
    let external = vec!["react".to_string(), "lodash".to_string()];
    let out = Path::new("public/js/app.js");
    let args = bundler_args("src/js/app.jsx", out, &profile(BuildMode::Prod), &external);
    assert!(args.contains(&"--external:react".to_string()));
    assert!(args.contains(&"--external:lodash".to_string()));
  }

  #[test]
  fn prod_args_minify_without_sourcemaps() {
    let args = bundler_args("src/js/app.jsx", Path::new("out.js"), &profile(BuildMode::Prod), &[]);
    assert!(args.contains(&"--minify".to_string()));
    assert!(!args.contains(&"--sourcemap".to_string()));
    assert!(args.contains(&"--define:process.env.NODE_ENV=\"production\"".to_string()));
  }

  #[test]
  fn dev_args_keep_sourcemaps_without_minify() {
    let dev = profile(BuildMode::DevLocal);
    let args = bundler_args("src/js/app.jsx", Path::new("out.js"), &dev, &[]);
    assert!(!args.contains(&"--minify".to_string()));
    assert!(args.contains(&"--sourcemap".to_string()));
    assert!(args.contains(&"--define:process.env.NODE_ENV=\"development\"".to_string()));
  }

  #[tokio::test]
  async fn refuses_to_run_without_the_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let config = demo_config();
    let revision =
      Revision { commit: "abc1234".to_string(), timestamp: "now".to_string() };
    let err = bundle_app(&profile(BuildMode::Prod), &config, &revision, tmp.path())
      .await
      .unwrap_err();
    assert!(matches!(
      err.downcast_ref::<PipelineError>(),
      Some(PipelineError::ManifestMissing(_))
    ));
  }
}
