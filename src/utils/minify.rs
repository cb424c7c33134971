//! HTML minification.
//!
//! Thin wrapper over the `minify_html` crate with an enable toggle.

use std::borrow::Cow;

/// Minify rendered HTML when `enabled`, otherwise return it untouched.
pub fn minify_html(html: &str, enabled: bool) -> Cow<'_, str> {
    if !enabled {
        return Cow::Borrowed(html);
    }

    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;

    let minified = minify_html::minify(html.as_bytes(), &cfg);
    Cow::Owned(String::from_utf8_lossy(&minified).into_owned())
}

// ============================================================================
// Tests
// ============================================================================
