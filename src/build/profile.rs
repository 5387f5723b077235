/* src/build/profile.rs */

use crate::config::GantryConfig;
use crate::ui;

/// Build environment requested on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildMode {
  /// Unminified build served locally with watchers and live reload.
  #[default]
  DevLocal,
  /// Unminified build deployed to a hosted dev environment.
  DevHosted,
  /// Minified production build.
  Prod,
  /// Minified production-like build verified locally.
  Local,
}

impl BuildMode {
  pub fn banner_label(self) -> &'static str {
    match self {
      Self::DevLocal => "DEVELOPMENT (LOCAL)",
      Self::DevHosted => "DEVELOPMENT (HOSTED)",
      Self::Prod => "PRODUCTION (HOSTED)",
      Self::Local => "PRODUCTION (LOCAL)",
    }
  }

  pub fn is_dev(self) -> bool {
    matches!(self, Self::DevLocal | Self::DevHosted)
  }
}

/// Value injected into the bundle's `process.env.NODE_ENV`, which drives
/// dead code elimination in the bundler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
  Development,
  Production,
}

impl RuntimeMode {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Development => "development",
      Self::Production => "production",
    }
  }
}

/// Everything mode-dependent, resolved once per invocation. Tasks read
/// this record instead of consulting mutable globals.
#[derive(Debug, Clone)]
pub struct BuildProfile {
  pub mode: BuildMode,
  pub minify: bool,
  pub runtime_mode: RuntimeMode,
  /// Constants module staged for this environment, relative to the
  /// project root.
  pub constants_file: String,
  pub watch: bool,
  /// Whether the root HTML is rewritten to the cache-busted names.
  pub rewrite_html: bool,
  pub serve_after_build: bool,
}

impl BuildProfile {
  pub fn resolve(mode: BuildMode, serve_after_build: bool, config: &GantryConfig) -> Self {
    let (minify, runtime_mode) = match mode {
      BuildMode::DevLocal | BuildMode::DevHosted => (false, RuntimeMode::Development),
      BuildMode::Prod | BuildMode::Local => (true, RuntimeMode::Production),
    };
    let constants_file = match mode {
      BuildMode::DevLocal | BuildMode::DevHosted => config.constants.dev.clone(),
      BuildMode::Prod => config.constants.prod.clone(),
      BuildMode::Local => config.constants.local.clone(),
    };
    Self {
      mode,
      minify,
      runtime_mode,
      constants_file,
      watch: mode == BuildMode::DevLocal,
      rewrite_html: mode != BuildMode::DevLocal,
      serve_after_build,
    }
  }

  pub fn banner_bg(&self) -> &'static str {
    if self.minify { ui::BG_GREEN } else { ui::BG_YELLOW }
  }
}
