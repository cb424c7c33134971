//! Rendering chain: template resolution, markdown conversion, layout wrap.

pub mod markdown;
pub mod template;

use crate::config::SiteConfig;

/// Explicit renderer configuration, built once per build from the site
/// config. Keeping this a plain value (rather than process-global renderer
/// state) means two builds in one process cannot interfere.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Syntax-highlight fenced code blocks.
    pub highlight: bool,
    /// Minify rendered HTML before writing.
    pub minify: bool,
}

impl RenderOptions {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            highlight: config.build.highlight,
            minify: config.build.minify,
        }
    }
}
