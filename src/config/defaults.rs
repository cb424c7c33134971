//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn url() -> Option<String> {
        None
    }

    pub fn language() -> String {
        "en-US".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn source() -> Option<PathBuf> {
        None
    }

    pub fn output() -> PathBuf {
        "public".into()
    }

    pub fn pages() -> String {
        "pages/**/*.md".into()
    }

    pub fn includes() -> String {
        "partials/**/*.html".into()
    }

    pub fn data_files() -> String {
        "data/**".into()
    }

    pub fn stylesheet() -> PathBuf {
        "style.css".into()
    }
}
