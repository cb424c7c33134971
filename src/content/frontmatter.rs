//! Front matter parsing.
//!
//! A page may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: About
//! ---
//! body text
//! ```
//!
//! The metadata must be a YAML mapping (or empty). A file without an opening
//! fence is all body.

use crate::context::Context;
use anyhow::{Result, bail};
use serde_json::Value;

/// Front matter fence line
const FENCE: &str = "---";

/// A page source split into metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub meta: Context,
    pub body: String,
}

/// Split a raw page into front matter metadata and body.
pub fn parse(raw: &str) -> Result<Document> {
    let Some(rest) = strip_fence_line(raw) else {
        return Ok(Document {
            meta: Context::new(),
            body: raw.to_string(),
        });
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == FENCE {
            let meta = parse_meta(&rest[..offset])?;
            let body = rest[offset + line.len()..].to_string();
            return Ok(Document { meta, body });
        }
        offset += line.len();
    }

    bail!("unterminated front matter: opening `---` without a closing fence");
}

/// Strip an opening fence line, returning the remainder after its newline.
/// `---` followed by anything but a line break is ordinary body text.
fn strip_fence_line(raw: &str) -> Option<&str> {
    let rest = raw.strip_prefix(FENCE)?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

/// Parse the YAML between the fences into a context.
fn parse_meta(src: &str) -> Result<Context> {
    if src.trim().is_empty() {
        return Ok(Context::new());
    }

    let value: Value = serde_yaml::from_str(src)?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Context::new()),
        other => bail!("front matter must be a mapping, got {other}"),
    }
}

// ============================================================================
// Tests
// ============================================================================
