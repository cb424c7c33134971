//! Markdown rendering via comrak.
//!
//! READMEs are written in GitHub-flavored markdown, so the GFM extensions
//! (tables, strikethrough, autolinks, task lists) are always on and raw
//! HTML passes through. Fenced-code syntax highlighting is optional and
//! carried by the renderer value, not by global state.

use super::RenderOptions;
use comrak::plugins::syntect::SyntectAdapter;
use comrak::{Options, Plugins, markdown_to_html_with_plugins};

/// Highlighting theme for fenced code blocks
const HIGHLIGHT_THEME: &str = "InspiredGitHub";

/// A configured markdown renderer, safe to share across page pipelines.
pub struct MarkdownRenderer {
    adapter: Option<SyntectAdapter>,
}

impl MarkdownRenderer {
    /// Build a renderer. The syntect adapter is constructed once here, not
    /// per page: loading syntax definitions is expensive.
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            adapter: options
                .highlight
                .then(|| SyntectAdapter::new(Some(HIGHLIGHT_THEME))),
        }
    }

    /// Render markdown to an HTML fragment.
    pub fn render(&self, markdown: &str) -> String {
        let mut options = Options::default();
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.render.unsafe_ = true;

        let mut plugins = Plugins::default();
        if let Some(adapter) = &self.adapter {
            plugins.render.codefence_syntax_highlighter = Some(adapter);
        }

        markdown_to_html_with_plugins(markdown, &options, &plugins)
    }
}

// ============================================================================
// Tests
// ============================================================================
