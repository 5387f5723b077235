/* src/error.rs */

use std::path::PathBuf;

use thiserror::Error;

/// Failure classes the pipeline tells apart. Everything else travels as
/// plain `anyhow` context.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("not a git repository (or git is unavailable): {0}")]
  VcsUnavailable(String),

  #[error("{tool} exited with {status}\n{output}")]
  Compile { tool: String, status: String, output: String },

  #[error("{failed} of {total} asset categories failed to copy")]
  AssetCopy { failed: usize, total: usize },

  #[error("vendor manifest not found at {} -- run the vendor bundle first", .0.display())]
  ManifestMissing(PathBuf),
}
