/* src/build/revision.rs */

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tokio::process::Command;

use crate::error::PipelineError;

/// Commit identity and build instant stamped into artifacts, resolved
/// once per build so every artifact agrees on the revision.
#[derive(Debug, Clone)]
pub struct Revision {
  pub commit: String,
  pub timestamp: String,
}

/// Ask git for the short HEAD hash. Failure is fatal; there is no
/// fallback commit id.
pub async fn read_revision(base_dir: &Path) -> Result<Revision> {
  let output = Command::new("git")
    .args(["rev-parse", "--short", "HEAD"])
    .current_dir(base_dir)
    .output()
    .await;
  let output = match output {
    Ok(output) => output,
    Err(e) => return Err(PipelineError::VcsUnavailable(e.to_string()).into()),
  };
  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    return Err(PipelineError::VcsUnavailable(stderr).into());
  }
  let commit = String::from_utf8_lossy(&output.stdout).trim().to_string();
  if commit.is_empty() {
    return Err(PipelineError::VcsUnavailable("git returned an empty hash".to_string()).into());
  }
  Ok(Revision { commit, timestamp: build_timestamp() })
}

/// Human-readable build instant, e.g. "March 4, 2026 2:07 PM UTC".
fn build_timestamp() -> String {
  Utc::now().format("%B %-d, %Y %-I:%M %p UTC").to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn missing_repository_is_a_vcs_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = read_revision(tmp.path()).await.unwrap_err();
    assert!(matches!(
      err.downcast_ref::<PipelineError>(),
      Some(PipelineError::VcsUnavailable(_))
    ));
  }

  #[test]
  fn timestamp_is_utc_and_current() {
    let stamp = build_timestamp();
    assert!(stamp.ends_with("UTC"));
    let year = Utc::now().format("%Y").to_string();
    assert!(stamp.contains(&year));
    // no zero padding on day or hour
    assert!(!stamp.contains(" 0"));
  }
}
