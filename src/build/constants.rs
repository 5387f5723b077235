/* src/build/constants.rs */

use std::path::Path;

use anyhow::{Context, Result};

use crate::build::profile::BuildProfile;
use crate::config::GantryConfig;
use crate::ui::{self, MAGENTA, RESET};

/// Copy the profile's constants module over the well-known path the app
/// imports. Must land before the app bundle runs.
pub async fn stage_constants(
  profile: &BuildProfile,
  config: &GantryConfig,
  base_dir: &Path,
) -> Result<()> {
  let src = base_dir.join(&profile.constants_file);
  let dest = base_dir.join(&config.constants.dest);
  if let Some(parent) = dest.parent() {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  tokio::fs::copy(&src, &dest)
    .await
    .with_context(|| format!("failed to copy {} -> {}", src.display(), dest.display()))?;
  ui::detail(&format!(
    "Using {MAGENTA}{}{RESET} as the constants file for this build",
    profile.constants_file
  ));
  Ok(())
}
