//! The README content chain: fetch, parse, filter, serialize.
//!
//! Each function is one global-pipeline step body. They communicate through
//! the context only: `fetch` fills `readmes` with raw documents, `parse`
//! rewrites each entry with structured fields, `filter` narrows the list,
//! and `serialize` produces the `projects` table templates consume.

use crate::context::Context;
use crate::log;
use anyhow::{Context as _, Result, bail};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Default readme file name looked up inside a project directory
const README_FILE: &str = "README.md";

/// Read the readme of every configured source into `readmes`.
///
/// A source is a project directory containing `README.md`, or a direct path
/// to a readme file. A missing readme is a fetch failure.
pub fn fetch(mut ctx: Context, sources: &[PathBuf]) -> Result<Context> {
    let mut readmes = Vec::with_capacity(sources.len());

    for source in sources {
        let path = readme_path(source);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to fetch readme `{}`", path.display()))?;
        readmes.push(json!({
            "name": project_name(source),
            "raw": raw,
        }));
    }

    log!("fetch"; "fetched {} readmes", readmes.len());
    ctx.insert("readmes".into(), Value::Array(readmes));
    Ok(ctx)
}

/// Rewrite each raw readme into a structured record with `title`,
/// `description` and `body`.
pub fn parse(mut ctx: Context) -> Result<Context> {
    let readmes = take_array(&mut ctx, "readmes")?;

    let parsed = readmes
        .into_iter()
        .map(|entry| {
            let name = field(&entry, "name")?.to_string();
            let raw = field(&entry, "raw")?;
            let (title, description) = scan_readme(raw);
            Ok(json!({
                "name": name,
                "title": title,
                "description": description,
                "body": raw,
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    ctx.insert("readmes".into(), Value::Array(parsed));
    Ok(ctx)
}

/// Narrow `readmes` to documents that carry a title.
pub fn filter(mut ctx: Context) -> Result<Context> {
    let readmes = take_array(&mut ctx, "readmes")?;
    let total = readmes.len();

    let kept: Vec<Value> = readmes
        .into_iter()
        .filter(|entry| {
            entry
                .get("title")
                .and_then(Value::as_str)
                .is_some_and(|t| !t.is_empty())
        })
        .collect();

    if kept.len() < total {
        log!("fetch"; "skipped {} untitled readmes", total - kept.len());
    }
    ctx.insert("readmes".into(), Value::Array(kept));
    Ok(ctx)
}

/// Turn the filtered readmes into the `projects` table: name to
/// title/description/markdown, ready for template lookup.
pub fn serialize(mut ctx: Context) -> Result<Context> {
    let readmes = take_array(&mut ctx, "readmes")?;

    let mut projects = Context::new();
    for entry in &readmes {
        let name = field(entry, "name")?;
        projects.insert(
            name.to_string(),
            json!({
                "title": entry.get("title").cloned().unwrap_or(Value::Null),
                "description": entry.get("description").cloned().unwrap_or(Value::Null),
                "markdown": entry.get("body").cloned().unwrap_or(Value::Null),
            }),
        );
    }

    ctx.insert("readmes".into(), Value::Array(readmes));
    ctx.insert("projects".into(), Value::Object(projects));
    Ok(ctx)
}

// ============================================================================
// Internal
// ============================================================================

/// Resolve the readme file for a source entry.
fn readme_path(source: &Path) -> PathBuf {
    if source.is_dir() {
        source.join(README_FILE)
    } else {
        source.to_path_buf()
    }
}

/// Derive a project name from its source path.
fn project_name(source: &Path) -> String {
    let base = if source.is_dir() {
        Some(source)
    } else {
        source.parent().filter(|p| p.file_name().is_some())
    };

    base.and_then(Path::file_name)
        .or_else(|| source.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extract title (first `#` heading) and description (first paragraph after
/// it) from readme text.
fn scan_readme(raw: &str) -> (Value, Value) {
    let mut title = None;
    let mut description = None;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if title.is_none() {
            if let Some(heading) = trimmed.strip_prefix("# ") {
                title = Some(heading.trim().to_string());
            }
            continue;
        }
        if !trimmed.starts_with('#') && !trimmed.starts_with("![") {
            description = Some(trimmed.to_string());
            break;
        }
    }

    (
        title.map_or(Value::Null, Value::String),
        description.map_or(Value::Null, Value::String),
    )
}

fn take_array(ctx: &mut Context, key: &str) -> Result<Vec<Value>> {
    match ctx.remove(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => bail!("`{key}` must be an array, got {other}"),
        None => bail!("`{key}` missing from context"),
    }
}

fn field<'a>(entry: &'a Value, key: &str) -> Result<&'a str> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .with_context(|| format!("readme entry missing `{key}`"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn run_chain(ctx: Context) -> Context {
        let ctx = parse(ctx).unwrap();
        let ctx = filter(ctx).unwrap();
        serialize(ctx).unwrap()
    }

    fn raw_readmes(entries: &[(&str, &str)]) -> Context {
        let mut ctx = Context::new();
        let items: Vec<Value> = entries
            .iter()
            .map(|(name, raw)| json!({"name": name, "raw": raw}))
            .collect();
        ctx.insert("readmes".into(), Value::Array(items));
        ctx
    }

    // ------------------------------------------------------------------------
    // fetch
    // ------------------------------------------------------------------------

    #[test]
    fn test_fetch_reads_readme_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("widget");
        fs::create_dir(&project).unwrap();
        fs::write(project.join("README.md"), "# Widget\n").unwrap();

        let ctx = fetch(Context::new(), &[project]).unwrap();
        let readmes = ctx.get("readmes").and_then(Value::as_array).unwrap();

        assert_eq!(readmes.len(), 1);
        assert_eq!(readmes[0].get("name"), Some(&json!("widget")));
        assert_eq!(readmes[0].get("raw"), Some(&json!("# Widget\n")));
    }

    #[test]
    fn test_fetch_accepts_direct_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("gadget");
        fs::create_dir(&project).unwrap();
        let file = project.join("README.md");
        fs::write(&file, "# Gadget\n").unwrap();

        let ctx = fetch(Context::new(), &[file]).unwrap();
        let readmes = ctx.get("readmes").and_then(Value::as_array).unwrap();

        assert_eq!(readmes[0].get("name"), Some(&json!("gadget")));
    }

    #[test]
    fn test_fetch_missing_readme_fails() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("empty");
        fs::create_dir(&project).unwrap();

        let err = fetch(Context::new(), &[project]).unwrap_err();
        assert!(format!("{err:#}").contains("failed to fetch readme"));
    }

    #[test]
    fn test_fetch_with_no_sources_yields_empty_list() {
        let ctx = fetch(Context::new(), &[]).unwrap();
        assert_eq!(ctx.get("readmes"), Some(&json!([])));
    }

    // ------------------------------------------------------------------------
    // parse / filter / serialize
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_extracts_title_and_description() {
        let ctx = raw_readmes(&[("widget", "# Widget\n\nA small tool.\n\nMore text.\n")]);
        let ctx = parse(ctx).unwrap();
        let entry = &ctx.get("readmes").and_then(Value::as_array).unwrap()[0];

        assert_eq!(entry.get("title"), Some(&json!("Widget")));
        assert_eq!(entry.get("description"), Some(&json!("A small tool.")));
        assert_eq!(
            entry.get("body"),
            Some(&json!("# Widget\n\nA small tool.\n\nMore text.\n"))
        );
    }

    #[test]
    fn test_parse_skips_badges_before_description() {
        let ctx = raw_readmes(&[("w", "# W\n\n![badge](img.svg)\n\nReal description.\n")]);
        let ctx = parse(ctx).unwrap();
        let entry = &ctx.get("readmes").and_then(Value::as_array).unwrap()[0];

        assert_eq!(entry.get("description"), Some(&json!("Real description.")));
    }

    #[test]
    fn test_parse_without_heading_leaves_null_title() {
        let ctx = raw_readmes(&[("w", "just text, no heading\n")]);
        let ctx = parse(ctx).unwrap();
        let entry = &ctx.get("readmes").and_then(Value::as_array).unwrap()[0];

        assert_eq!(entry.get("title"), Some(&Value::Null));
    }

    #[test]
    fn test_filter_drops_untitled_readmes() {
        let ctx = raw_readmes(&[
            ("titled", "# Titled\n\nok\n"),
            ("untitled", "no heading here\n"),
        ]);
        let ctx = parse(ctx).unwrap();
        let ctx = filter(ctx).unwrap();
        let readmes = ctx.get("readmes").and_then(Value::as_array).unwrap();

        assert_eq!(readmes.len(), 1);
        assert_eq!(readmes[0].get("name"), Some(&json!("titled")));
    }

    #[test]
    fn test_serialize_builds_projects_table() {
        let ctx = raw_readmes(&[("widget", "# Widget\n\nA small tool.\n")]);
        let ctx = run_chain(ctx);

        let projects = ctx.get("projects").and_then(Value::as_object).unwrap();
        let widget = projects.get("widget").unwrap();

        assert_eq!(widget.get("title"), Some(&json!("Widget")));
        assert_eq!(widget.get("description"), Some(&json!("A small tool.")));
        assert_eq!(widget.get("markdown"), Some(&json!("# Widget\n\nA small tool.\n")));
    }

    #[test]
    fn test_parse_requires_readmes_key() {
        let err = parse(Context::new()).unwrap_err();
        assert!(err.to_string().contains("`readmes` missing"));
    }
}
