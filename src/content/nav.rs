//! Page metadata and navigation steps for the per-file pipeline.

use crate::context::{Context, get_str};
use anyhow::{Context as _, Result, bail};
use serde_json::{Value, json};
use std::path::Path;

/// Derive the served URL for a page source path. The extension becomes
/// `.html`; `index` pages collapse to their directory.
pub fn page_url(rel: &Path) -> String {
    let is_index = rel.file_stem().is_some_and(|stem| stem == "index");

    let segments: Vec<&str> = rel
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();

    if is_index {
        let dirs = &segments[..segments.len().saturating_sub(1)];
        if dirs.is_empty() {
            return "/".to_string();
        }
        return format!("/{}/", dirs.join("/"));
    }

    let html = rel.with_extension("html");
    let segments: Vec<_> = html
        .components()
        .filter_map(|c| c.as_os_str().to_str().map(str::to_string))
        .collect();
    format!("/{}", segments.join("/"))
}

/// Attach derived page metadata (`url`) from the seeded `path`.
pub fn attach_page_meta(mut ctx: Context) -> Result<Context> {
    let path = get_str(&ctx, "path")
        .context("page context missing `path`")?
        .to_string();

    ctx.insert("url".into(), Value::String(page_url(Path::new(&path))));
    Ok(ctx)
}

/// Mark every entry of `pages` with a `current` flag: true only for the
/// entry whose path equals this page's path.
pub fn mark_current(mut ctx: Context) -> Result<Context> {
    let own_path = get_str(&ctx, "path")
        .context("page context missing `path`")?
        .to_string();

    let Some(Value::Array(mut pages)) = ctx.remove("pages") else {
        bail!("page context missing `pages`");
    };

    for entry in pages.iter_mut() {
        if let Value::Object(map) = entry {
            let current = map.get("path").and_then(Value::as_str) == Some(own_path.as_str());
            map.insert("current".into(), Value::Bool(current));
        }
    }

    ctx.insert("pages".into(), Value::Array(pages));
    Ok(ctx)
}

/// Build the `nav` list from the marked pages: entries with a title, not
/// opted out via `nav = false`, ordered by `order` then title.
pub fn build_nav(mut ctx: Context) -> Result<Context> {
    let pages = match ctx.get("pages") {
        Some(Value::Array(pages)) => pages.clone(),
        _ => bail!("page context missing `pages`"),
    };

    let mut items: Vec<(i64, String, Value)> = pages
        .iter()
        .filter_map(Value::as_object)
        .filter(|page| page.get("nav").and_then(Value::as_bool) != Some(false))
        .filter_map(|page| {
            let title = page.get("title").and_then(Value::as_str)?;
            let order = page.get("order").and_then(Value::as_i64).unwrap_or(i64::MAX);
            let item = json!({
                "title": title,
                "url": page.get("url").cloned().unwrap_or(Value::Null),
                "current": page.get("current").cloned().unwrap_or(Value::Bool(false)),
            });
            Some((order, title.to_string(), item))
        })
        .collect();

    items.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let nav: Vec<Value> = items.into_iter().map(|(_, _, item)| item).collect();
    ctx.insert("nav".into(), Value::Array(nav));
    Ok(ctx)
}

// ============================================================================
// Tests
// ============================================================================
