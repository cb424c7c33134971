//! Global-context collection steps: partials, data files, page front matter.

use crate::content::{frontmatter, nav};
use crate::context::{Context, merge_missing};
use crate::mapper;
use crate::pattern::Pattern;
use anyhow::{Context as _, Result, bail};
use serde_json::Value;
use std::path::Path;

/// Load template partials matching `pattern` into `partials`, keyed by file
/// stem. Two partials sharing a stem is a configuration error.
pub fn load_partials(mut ctx: Context, root: &Path, pattern: &Pattern) -> Result<Context> {
    let loaded = mapper::map_files(root, pattern, |contents, rel| {
        let stem = rel
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("partial `{}` has no usable name", rel.display()))?;
        Ok((stem.to_string(), rel.to_path_buf(), contents.to_string()))
    })?;

    let mut partials = Context::new();
    let mut origins = std::collections::HashMap::new();
    for (stem, rel, source) in loaded {
        if let Some(existing) = origins.insert(stem.clone(), rel.clone()) {
            bail!(
                "partials `{}` and `{}` both register as `{stem}`",
                existing.display(),
                rel.display()
            );
        }
        partials.insert(stem, Value::String(source));
    }

    ctx.insert("partials".into(), Value::Object(partials));
    Ok(ctx)
}

/// Load global data files matching `pattern` into `data`, keyed by file
/// stem. JSON, TOML and YAML files are recognized by extension.
pub fn load_data(mut ctx: Context, root: &Path, pattern: &Pattern) -> Result<Context> {
    let loaded = mapper::map_files(root, pattern, |contents, rel| {
        let value = parse_data_file(contents, rel)
            .with_context(|| format!("failed to load data file `{}`", rel.display()))?;
        let stem = rel
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("data file `{}` has no usable name", rel.display()))?;
        Ok((stem.to_string(), rel.to_path_buf(), value))
    })?;

    let mut data = Context::new();
    let mut origins = std::collections::HashMap::new();
    for (stem, rel, value) in loaded {
        if let Some(existing) = origins.insert(stem.clone(), rel.clone()) {
            bail!(
                "data files `{}` and `{}` both register as `{stem}`",
                existing.display(),
                rel.display()
            );
        }
        data.insert(stem, value);
    }

    ctx.insert("data".into(), Value::Object(data));
    Ok(ctx)
}

/// Collect the front matter of every page matching `pattern` into `pages`,
/// each entry carrying its metadata plus derived `path` and `url`.
pub fn collect_pages(mut ctx: Context, root: &Path, pattern: &Pattern) -> Result<Context> {
    let pages = mapper::map_files(root, pattern, |contents, rel| {
        let doc = frontmatter::parse(contents)
            .with_context(|| format!("failed to parse `{}`", rel.display()))?;

        let mut entry = doc.meta;
        entry.insert("path".into(), Value::String(rel.to_string_lossy().into_owned()));
        entry.insert("url".into(), Value::String(nav::page_url(rel)));
        Ok(Value::Object(entry))
    })?;

    ctx.insert("pages".into(), Value::Array(pages));
    Ok(ctx)
}

/// Layer `extra` (site metadata, stylesheet, configured global data) under
/// the keys the pipeline has already computed.
pub fn merge_extra(mut ctx: Context, extra: &Context) -> Result<Context> {
    merge_missing(&mut ctx, extra);
    Ok(ctx)
}

/// Parse one data file by extension.
fn parse_data_file(contents: &str, rel: &Path) -> Result<Value> {
    let ext = rel
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => Ok(serde_json::from_str(contents)?),
        "toml" => {
            let value: toml::Value = toml::from_str(contents)?;
            Ok(serde_json::to_value(value)?)
        }
        "yaml" | "yml" => Ok(serde_yaml::from_str(contents)?),
        other => bail!("unsupported data file extension `{other}`"),
    }
}

// ============================================================================
// Tests
// ============================================================================
