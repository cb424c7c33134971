//! Glob-like file selection patterns.
//!
//! Patterns select files by their path relative to the build root:
//!
//! - `*` matches any run of characters within one path segment
//! - `?` matches a single character within a segment
//! - `**/` matches zero or more whole directories; a bare `**` spans
//!   segments freely
//!
//! Matching is performed on `/`-joined path components, so patterns behave
//! identically on every platform.

use regex::Regex;
use std::path::Path;
use thiserror::Error;

/// Pattern compilation errors.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("empty selection pattern")]
    Empty,

    #[error("invalid selection pattern `{0}`")]
    Invalid(String, #[source] regex::Error),
}

/// A compiled file-selection pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    re: Regex,
}

impl Pattern {
    /// Compile a glob-like expression into an anchored matcher.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }

        let mut re = String::with_capacity(pattern.len() + 8);
        re.push('^');

        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '*' if chars.peek() == Some(&'*') => {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        chars.next();
                        re.push_str("(?:[^/]+/)*");
                    } else {
                        re.push_str(".*");
                    }
                }
                '*' => re.push_str("[^/]*"),
                '?' => re.push_str("[^/]"),
                c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }
        re.push('$');

        let re = Regex::new(&re).map_err(|e| PatternError::Invalid(pattern.to_string(), e))?;
        Ok(Self {
            raw: pattern.to_string(),
            re,
        })
    }

    /// Match a root-relative path against the pattern.
    pub fn matches(&self, relative: &Path) -> bool {
        let joined = relative
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .collect::<Vec<_>>()
            .join("/");
        self.re.is_match(&joined)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        Pattern::compile(pattern).unwrap().matches(Path::new(path))
    }

    #[test]
    fn test_star_stays_within_one_segment() {
        assert!(matches("*.md", "index.md"));
        assert!(matches("*.md", ".md"));
        assert!(!matches("*.md", "pages/index.md"));
        assert!(!matches("*.md", "index.html"));
    }

    #[test]
    fn test_star_in_directory_prefix() {
        assert!(matches("pages/*.md", "pages/about.md"));
        assert!(!matches("pages/*.md", "pages/deep/about.md"));
        assert!(!matches("pages/*.md", "posts/about.md"));
    }

    #[test]
    fn test_double_star_spans_directories() {
        assert!(matches("pages/**/*.md", "pages/about.md"));
        assert!(matches("pages/**/*.md", "pages/a/b/c.md"));
        assert!(!matches("pages/**/*.md", "pages/a/b/c.html"));
        assert!(!matches("pages/**/*.md", "other/a.md"));
    }

    #[test]
    fn test_leading_double_star() {
        assert!(matches("**/*.html", "default.html"));
        assert!(matches("**/*.html", "partials/nav/default.html"));
        assert!(!matches("**/*.html", "style.css"));
    }

    #[test]
    fn test_bare_double_star_matches_everything() {
        assert!(matches("data/**", "data/site.json"));
        assert!(matches("data/**", "data/nested/extra.toml"));
        assert!(!matches("data/**", "pages/index.md"));
    }

    #[test]
    fn test_question_mark_single_character() {
        assert!(matches("page?.md", "page1.md"));
        assert!(!matches("page?.md", "page.md"));
        assert!(!matches("page?.md", "page12.md"));
        assert!(!matches("page?.md", "pages/1.md"));
    }

    #[test]
    fn test_literal_pattern_is_exact() {
        assert!(matches("style.css", "style.css"));
        assert!(!matches("style.css", "styles.css"));
        assert!(!matches("style.css", "css/style.css"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(matches("a+b.md", "a+b.md"));
        assert!(!matches("a+b.md", "aab.md"));
        assert!(matches("v(1).md", "v(1).md"));
    }

    #[test]
    fn test_empty_pattern_is_an_error() {
        assert!(matches!(
            Pattern::compile(""),
            Err(PatternError::Empty)
        ));
    }

    #[test]
    fn test_as_str_round_trips() {
        let pattern = Pattern::compile("pages/**/*.md").unwrap();
        assert_eq!(pattern.as_str(), "pages/**/*.md");
    }
}
