/* src/build/output.rs */

// Artifact naming. DevLocal keeps the generic names so the watcher can
// overwrite in place; every other mode bakes a revision or content hash
// into the filename for cache busting.

use crate::build::profile::BuildMode;

/// Final filenames for one build, as the root HTML references them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
  pub app: String,
  pub core: String,
  pub css: String,
}

pub fn app_file(mode: BuildMode, commit: &str) -> String {
  if mode == BuildMode::DevLocal { "app.js".to_string() } else { format!("app.{commit}.js") }
}

pub fn core_file(mode: BuildMode, content_hash: &str) -> String {
  if mode == BuildMode::DevLocal {
    "core.js".to_string()
  } else {
    format!("core.{content_hash}.js")
  }
}

pub fn css_file(mode: BuildMode, commit: &str) -> String {
  if mode == BuildMode::DevLocal { "main.css".to_string() } else { format!("main.{commit}.css") }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dev_local_keeps_generic_names() {
    assert_eq!(app_file(BuildMode::DevLocal, "abc1234"), "app.js");
    assert_eq!(core_file(BuildMode::DevLocal, "deadbeef"), "core.js");
    assert_eq!(css_file(BuildMode::DevLocal, "abc1234"), "main.css");
  }

  #[test]
  fn hashed_names_carry_the_revision() {
    assert_eq!(app_file(BuildMode::Prod, "abc1234"), "app.abc1234.js");
    assert_eq!(css_file(BuildMode::Local, "abc1234"), "main.abc1234.css");
    assert_eq!(app_file(BuildMode::DevHosted, "abc1234"), "app.abc1234.js");
  }

  #[test]
  fn core_name_uses_the_content_hash() {
    assert_eq!(core_file(BuildMode::Prod, "deadbeef"), "core.deadbeef.js");
  }
}
