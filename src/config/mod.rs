//! Site configuration management for `tansu.toml`.
//!
//! # Sections
//!
//! | Section   | Purpose                                         |
//! |-----------|-------------------------------------------------|
//! | `[base]`  | Site metadata (title, author, url)              |
//! | `[build]` | Paths, selection patterns, output toggles       |
//! | `[fetch]` | Project sources whose READMEs are fetched       |
//! | `[data]`  | Free-form values merged into every page context |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "My Projects"
//! url = "https://example.com"
//!
//! [build]
//! source = "site"
//! output = "public"
//! minify = true
//!
//! [fetch]
//! sources = ["../tansu"]
//!
//! [data]
//! dev = false
//! ```

mod base;
mod build;
pub mod defaults;
mod error;
mod fetch;

pub use error::ConfigError;

use base::BaseConfig;
use build::BuildConfig;
use fetch::FetchConfig;

use crate::cli::{Cli, Commands};
use crate::pattern::Pattern;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// The three compiled selection patterns a build needs.
#[derive(Debug)]
pub struct Patterns {
    pub pages: Pattern,
    pub includes: Pattern,
    pub data_files: Pattern,
}

/// Root configuration structure representing tansu.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// README fetch sources
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Free-form values merged into every page's context
    #[serde(default)]
    pub data: HashMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the project root directory
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the project root directory
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Compile the three selection patterns.
    pub fn patterns(&self) -> Result<Patterns, ConfigError> {
        Ok(Patterns {
            pages: Pattern::compile(&self.build.pages)
                .map_err(|e| ConfigError::Pattern("[build.pages]", e))?,
            includes: Pattern::compile(&self.build.includes)
                .map_err(|e| ConfigError::Pattern("[build.includes]", e))?,
            data_files: Pattern::compile(&self.build.data_files)
                .map_err(|e| ConfigError::Pattern("[build.data_files]", e))?,
        })
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        // Determine the final root path based on command
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => {
                let base = cli
                    .root
                    .clone()
                    .unwrap_or_else(|| self.get_root().to_owned());
                base.join(name)
            }
            _ => cli.root.clone().unwrap_or_else(|| self.get_root().to_owned()),
        };
        self.update_paths_with_root(&root, cli);

        if let Commands::Build { build_args } = &cli.command {
            Self::update_option(&mut self.build.minify, build_args.minify.as_ref());
            Self::update_option(&mut self.build.highlight, build_args.highlight.as_ref());
            if build_args.clean {
                self.build.clean = true;
            }
            if build_args.dev {
                self.data.insert("dev".into(), toml::Value::Boolean(true));
            }
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Anchor all paths at the root directory and normalize them to absolute,
    /// so the scoped working-directory change during a build cannot skew them.
    /// The stylesheet stays relative: it is an asset inside the source folder.
    fn update_paths_with_root(&mut self, root: &Path, cli: &Cli) {
        let root = Self::normalize_path(&Self::expand_path(root));
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(&cli.config));
        self.build.output = Self::normalize_path(&root.join(Self::expand_path(&self.build.output)));

        if let Some(source) = &self.build.source {
            self.build.source = Some(Self::normalize_path(&root.join(Self::expand_path(source))));
        }

        self.fetch.sources = self
            .fetch
            .sources
            .iter()
            .map(|s| Self::normalize_path(&root.join(Self::expand_path(s))))
            .collect();
    }

    /// Expand a leading tilde in a path
    fn expand_path(path: &Path) -> PathBuf {
        match path.to_str() {
            Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
            None => path.to_path_buf(),
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if !self.config_path.exists() {
            bail!("Config file not found");
        }

        if let Some(source) = &self.build.source {
            if !source.exists() {
                bail!(ConfigError::Validation(format!(
                    "[build.source] `{}` does not exist",
                    source.display()
                )));
            }
            if !source.is_dir() {
                bail!(ConfigError::Validation(format!(
                    "[build.source] `{}` is not a directory",
                    source.display()
                )));
            }
        }

        self.patterns()?;

        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
