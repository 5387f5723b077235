/* src/config/types.rs */

use serde::Deserialize;

/// Parsed `gantry.toml`. Only `[project]` is mandatory; every other
/// section falls back to the conventional layout.
#[derive(Debug, Clone, Deserialize)]
pub struct GantryConfig {
  pub project: ProjectSection,
  #[serde(default)]
  pub paths: PathsSection,
  #[serde(default)]
  pub constants: ConstantsSection,
  #[serde(default)]
  pub stylesheets: StylesheetsSection,
  #[serde(default)]
  pub bundle: BundleSection,
  #[serde(default)]
  pub serve: ServeSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
  pub name: String,
}

/// Directory layout, all relative to the directory holding `gantry.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
  #[serde(default = "default_source")]
  pub source: String,
  #[serde(default = "default_output")]
  pub output: String,
  #[serde(default = "default_cache")]
  pub cache: String,
  #[serde(default = "default_entry")]
  pub entry: String,
  #[serde(default = "default_index")]
  pub index: String,
}

/// Per-environment constants modules. One of dev/prod/local is copied to
/// `dest` before the app bundle runs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConstantsSection {
  #[serde(default = "default_constants_dev")]
  pub dev: String,
  #[serde(default = "default_constants_prod")]
  pub prod: String,
  #[serde(default = "default_constants_local")]
  pub local: String,
  #[serde(default = "default_constants_dest")]
  pub dest: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StylesheetsSection {
  /// Compiler command. Must accept `--no-source-map`, `--style=compressed`
  /// and a trailing `srcdir:outdir` pair, like dart-sass.
  #[serde(default = "default_css_compiler")]
  pub compiler: String,
  #[serde(default = "default_css_source")]
  pub source: String,
  /// Directories whose changes trigger a stylesheet recompile in dev.
  #[serde(default = "default_css_watch")]
  pub watch: Vec<String>,
  /// Pass `--style=compressed` to the compiler on minified builds.
  #[serde(default)]
  pub minify: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BundleSection {
  /// Bundler command, esbuild CLI compatible.
  #[serde(default = "default_bundler")]
  pub bundler: String,
  /// Third-party modules compiled into the shared vendor bundle and
  /// marked external when the app bundle runs.
  #[serde(default = "default_vendor_modules")]
  pub vendor: Vec<String>,
  /// Directory whose changes trigger an app rebundle in dev.
  #[serde(default = "default_app_watch")]
  pub app_watch: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServeSection {
  #[serde(default = "default_port")]
  pub port: u16,
}

impl Default for PathsSection {
  fn default() -> Self {
    Self {
      source: default_source(),
      output: default_output(),
      cache: default_cache(),
      entry: default_entry(),
      index: default_index(),
    }
  }
}

impl Default for ConstantsSection {
  fn default() -> Self {
    Self {
      dev: default_constants_dev(),
      prod: default_constants_prod(),
      local: default_constants_local(),
      dest: default_constants_dest(),
    }
  }
}

impl Default for StylesheetsSection {
  fn default() -> Self {
    Self {
      compiler: default_css_compiler(),
      source: default_css_source(),
      watch: default_css_watch(),
      minify: false,
    }
  }
}

impl Default for BundleSection {
  fn default() -> Self {
    Self {
      bundler: default_bundler(),
      vendor: default_vendor_modules(),
      app_watch: default_app_watch(),
    }
  }
}

impl Default for ServeSection {
  fn default() -> Self {
    Self { port: default_port() }
  }
}

fn default_source() -> String {
  "src".to_string()
}

fn default_output() -> String {
  "public".to_string()
}

fn default_cache() -> String {
  "cache".to_string()
}

fn default_entry() -> String {
  "src/js/app.jsx".to_string()
}

fn default_index() -> String {
  "src/index.html".to_string()
}

fn default_constants_dev() -> String {
  "GlobalConstants_dev.js".to_string()
}

fn default_constants_prod() -> String {
  "GlobalConstants_prod.js".to_string()
}

fn default_constants_local() -> String {
  "GlobalConstants_local.js".to_string()
}

fn default_constants_dest() -> String {
  "src/js/GlobalConstants.js".to_string()
}

fn default_css_compiler() -> String {
  "sass".to_string()
}

fn default_css_source() -> String {
  "src/css".to_string()
}

fn default_css_watch() -> Vec<String> {
  vec!["src/css".to_string(), "src/_scss".to_string()]
}

fn default_bundler() -> String {
  "esbuild".to_string()
}

fn default_vendor_modules() -> Vec<String> {
  [
    "react",
    "react-dom",
    "q",
    "react-addons-css-transition-group",
    "react-router",
    "superagent",
    "redux",
    "lodash",
    "jquery",
    "moment",
    "svg4everybody",
    "dompurify",
    "aws-sdk",
  ]
  .map(String::from)
  .to_vec()
}

fn default_app_watch() -> String {
  "src/js".to_string()
}

fn default_port() -> u16 {
  3000
}
