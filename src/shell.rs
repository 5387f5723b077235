/* src/shell.rs */

// External tool invocation shared by the build tasks.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::process::Command;

use crate::error::PipelineError;
use crate::ui::{self, DIM, RESET};

/// Run an external tool with captured output. A non-zero exit becomes a
/// compile error carrying both streams so the tool's own diagnostics
/// survive into the report.
pub async fn run_tool(
  base_dir: &Path,
  program: &str,
  args: &[String],
  label: &str,
  env: &[(&str, &str)],
) -> Result<()> {
  ui::detail(&format!("{DIM}{program} {}{RESET}", args.join(" ")));
  let spinner = tool_spinner(label);

  let mut cmd = Command::new(program);
  cmd.args(args);
  cmd.current_dir(base_dir);
  cmd.stdin(Stdio::null());
  for (key, value) in env {
    cmd.env(key, value);
  }
  let output = cmd
    .output()
    .await
    .with_context(|| format!("failed to run {label} ({program})"));
  spinner.finish_and_clear();
  let output = output?;

  if !output.status.success() {
    return Err(
      PipelineError::Compile {
        tool: label.to_string(),
        status: output.status.to_string(),
        output: combine_streams(&output.stdout, &output.stderr),
      }
      .into(),
    );
  }
  Ok(())
}

fn tool_spinner(label: &str) -> ProgressBar {
  let spinner = ProgressBar::new_spinner();
  let style = ProgressStyle::with_template("      {spinner} {msg}")
    .unwrap_or_else(|_| ProgressStyle::default_spinner());
  spinner.set_style(style);
  spinner.set_message(label.to_string());
  spinner.enable_steady_tick(Duration::from_millis(120));
  spinner
}

fn combine_streams(stdout: &[u8], stderr: &[u8]) -> String {
  let stdout = String::from_utf8_lossy(stdout);
  let stderr = String::from_utf8_lossy(stderr);
  let mut combined = String::new();
  if !stderr.trim().is_empty() {
    combined.push_str(stderr.trim_end());
  }
  if !stdout.trim().is_empty() {
    if !combined.is_empty() {
      combined.push('\n');
    }
    combined.push_str(stdout.trim_end());
  }
  combined
}

/// Check whether a configured tool can be spawned. Plain names go through
/// `which`, anything with a path separator is checked directly.
pub fn tool_exists(command: &str) -> bool {
  if command.contains('/') {
    return Path::new(command).is_file();
  }
  std::process::Command::new("which")
    .arg(command)
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .status()
    .map(|status| status.success())
    .unwrap_or(false)
}
