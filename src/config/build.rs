//! `[build]` section configuration.
//!
//! Paths, selection patterns and output toggles for one build.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in tansu.toml.
///
/// # Example
/// ```toml
/// [build]
/// source = "site"
/// output = "public"
/// pages = "pages/**/*.md"
/// includes = "partials/**/*.html"
/// data_files = "data/**"
/// minify = true
/// highlight = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (set from the CLI, not the config file).
    #[serde(skip)]
    pub root: Option<PathBuf>,

    /// Source folder entered for the duration of the build. When unset, the
    /// build runs in the current directory.
    #[serde(default = "defaults::build::source", skip_serializing_if = "Option::is_none")]
    #[educe(Default = defaults::build::source())]
    pub source: Option<PathBuf>,

    /// Destination folder for rendered pages.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Selection pattern for page source files, relative to the source folder.
    #[serde(default = "defaults::build::pages")]
    #[educe(Default = defaults::build::pages())]
    pub pages: String,

    /// Selection pattern for template partials and layouts.
    #[serde(default = "defaults::build::includes")]
    #[educe(Default = defaults::build::includes())]
    pub includes: String,

    /// Selection pattern for global data files (JSON, TOML or YAML).
    #[serde(default = "defaults::build::data_files")]
    #[educe(Default = defaults::build::data_files())]
    pub data_files: String,

    /// Fixed stylesheet asset injected into the global context as `style`.
    #[serde(default = "defaults::build::stylesheet")]
    #[educe(Default = defaults::build::stylesheet())]
    pub stylesheet: PathBuf,

    /// Minify rendered HTML before writing.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Syntax-highlight fenced code blocks in markdown.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub highlight: bool,

    /// Clear the output directory completely before building.
    #[serde(default)]
    pub clean: bool,
}
