//! Site building orchestration.
//!
//! Coordinates the two pipeline phases around a scoped working-directory
//! change.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── ScopedDir::enter() ──► chdir into [build.source], restore on drop
//!     │
//!     ├── global phase
//!     │       fetch → parse → filter → serialize readmes,
//!     │       load partials + data files, collect front matter,
//!     │       merge site/style/config data  →  Global Context
//!     │
//!     └── per-file phase (parallel, one pipeline per matched page)
//!             merge global → page meta → current flags → nav →
//!             resolve refs → template → markdown → layout → write
//! ```
//!
//! The directory guard drops when `build_site` returns, so the working
//! directory is restored exactly once whether the build succeeded or any
//! phase failed; the failure itself propagates to the caller untouched.

use crate::{
    config::{Patterns, SiteConfig},
    content::{data, frontmatter, nav, readmes},
    context::{Context, get_str, merge_missing},
    log, mapper,
    pipeline::{self, FnStep, step},
    render::{
        RenderOptions,
        markdown::MarkdownRenderer,
        template::{DEFAULT_LAYOUT, TemplateEngine},
    },
    utils::minify::minify_html,
};
use anyhow::{Context as _, Result, bail};
use serde_json::Value;
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

/// Build the entire site: global data phase, then per-file rendering.
pub fn build_site(config: &SiteConfig) -> Result<()> {
    let patterns = config.patterns()?;
    let options = RenderOptions::from_config(config);
    let renderer = MarkdownRenderer::new(&options);

    // Enter the source folder for the duration of the build; the guard
    // restores the previous directory on every exit path below.
    let _workdir = match &config.build.source {
        Some(source) => Some(ScopedDir::enter(source)?),
        None => None,
    };
    let root = Path::new(".");

    let global = run_global_phase(config, &patterns, root)?;

    let partials = global
        .get("partials")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let engine = TemplateEngine::from_partials(&partials)?;

    run_page_phase(config, &patterns, root, &global, &engine, &renderer, options)
}

// ============================================================================
// Global phase
// ============================================================================

/// Run the once-per-build pipeline producing the Global Context.
fn run_global_phase(config: &SiteConfig, patterns: &Patterns, root: &Path) -> Result<Context> {
    let extra = extra_context(config, root)?;

    let steps = vec![
        step("fetch_readmes", |ctx| {
            readmes::fetch(ctx, &config.fetch.sources)
        }),
        step("parse_readmes", readmes::parse),
        step("filter_readmes", readmes::filter),
        step("serialize_readmes", readmes::serialize),
        step("load_partials", |ctx| {
            data::load_partials(ctx, root, &patterns.includes)
        }),
        step("load_data", |ctx| {
            data::load_data(ctx, root, &patterns.data_files)
        }),
        step("collect_pages", |ctx| {
            data::collect_pages(ctx, root, &patterns.pages)
        }),
        step("merge_extra", move |ctx| data::merge_extra(ctx, &extra)),
    ];

    let global = pipeline::run(Context::new(), &steps)?;

    let keys: Vec<&str> = global.keys().map(String::as_str).collect();
    log!("data"; "global context ready ({})", keys.join(", "));

    Ok(global)
}

/// Fixed values merged under the computed global context: site metadata,
/// the stylesheet asset, and the free-form `[data]` table.
fn extra_context(config: &SiteConfig, root: &Path) -> Result<Context> {
    let mut extra = Context::new();
    extra.insert("site".into(), serde_json::to_value(&config.base)?);

    let stylesheet = root.join(&config.build.stylesheet);
    if stylesheet.is_file() {
        let style = fs::read_to_string(&stylesheet)
            .with_context(|| format!("failed to read `{}`", stylesheet.display()))?;
        extra.insert("style".into(), Value::String(style));
    }

    for (key, value) in &config.data {
        extra.insert(key.clone(), serde_json::to_value(value)?);
    }

    Ok(extra)
}

// ============================================================================
// Per-file phase
// ============================================================================

fn run_page_phase(
    config: &SiteConfig,
    patterns: &Patterns,
    root: &Path,
    global: &Context,
    engine: &TemplateEngine,
    renderer: &MarkdownRenderer,
    options: RenderOptions,
) -> Result<()> {
    let output = &config.build.output;
    prepare_output(output, config.build.clean)?;

    let matches = mapper::collect_matches(root, &patterns.pages)?;
    if matches.is_empty() {
        log!("warn"; "no pages matched `{}`", patterns.pages.as_str());
        return Ok(());
    }
    check_collisions(&matches, output)?;

    log!("build"; "rendering {} pages", matches.len());

    let steps = page_steps(global, engine, renderer, options, output);
    mapper::map_files(root, &patterns.pages, |contents, rel| {
        let seed = page_seed(contents, rel)?;
        pipeline::run(seed, &steps)
            .map(|_| ())
            .with_context(|| format!("failed to build `{}`", rel.display()))
    })?;

    log!("build"; "done");
    Ok(())
}

/// The ordered steps every page runs through. All captured state is shared
/// read-only; per-page data lives in the seeded context.
fn page_steps<'a>(
    global: &'a Context,
    engine: &'a TemplateEngine,
    renderer: &'a MarkdownRenderer,
    options: RenderOptions,
    output: &'a Path,
) -> Vec<FnStep<'a>> {
    vec![
        step("merge_global", move |mut ctx| {
            // Front matter wins over global keys
            merge_missing(&mut ctx, global);
            Ok(ctx)
        }),
        step("page_meta", nav::attach_page_meta),
        step("mark_current", nav::mark_current),
        step("build_nav", nav::build_nav),
        step("resolve_refs", resolve_refs),
        step("render_template", move |mut ctx| {
            let body = take_str(&mut ctx, "body")?;
            let rendered = engine.render_body(&body, &ctx)?;
            ctx.insert("body".into(), Value::String(rendered));
            Ok(ctx)
        }),
        step("render_markdown", move |mut ctx| {
            let body = take_str(&mut ctx, "body")?;
            ctx.insert("content".into(), Value::String(renderer.render(&body)));
            Ok(ctx)
        }),
        step("render_layout", move |mut ctx| {
            let layout = get_str(&ctx, "layout").unwrap_or(DEFAULT_LAYOUT).to_string();
            let html = engine.render_layout(&layout, &ctx)?;
            ctx.insert("html".into(), Value::String(html));
            Ok(ctx)
        }),
        step("write_page", move |ctx| write_page(ctx, output, options)),
    ]
}

/// Seed a page pipeline from one source file: front matter plus `path` and
/// `body`.
fn page_seed(contents: &str, rel: &Path) -> Result<Context> {
    let doc = frontmatter::parse(contents)
        .with_context(|| format!("failed to parse `{}`", rel.display()))?;

    let mut seed = doc.meta;
    seed.insert(
        "path".into(),
        Value::String(rel.to_string_lossy().into_owned()),
    );
    seed.insert("body".into(), Value::String(doc.body));
    Ok(seed)
}

/// Resolve a front-matter `readme` reference into the `project` record the
/// templates consume.
fn resolve_refs(mut ctx: Context) -> Result<Context> {
    let Some(name) = get_str(&ctx, "readme").map(str::to_string) else {
        return Ok(ctx);
    };

    let project = ctx
        .get("projects")
        .and_then(Value::as_object)
        .and_then(|projects| projects.get(&name))
        .cloned()
        .with_context(|| format!("page references unknown project `{name}`"))?;

    ctx.insert("project".into(), project);
    Ok(ctx)
}

/// Write the rendered page under the destination, preserving the source's
/// relative path with an `.html` extension.
fn write_page(ctx: Context, output: &Path, options: RenderOptions) -> Result<Context> {
    let rel = get_str(&ctx, "path").context("page context missing `path`")?;
    let html = get_str(&ctx, "html").context("page context missing rendered html")?;

    let dest = output.join(rel).with_extension("html");
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let html = minify_html(html, options.minify);
    fs::write(&dest, html.as_bytes())
        .with_context(|| format!("failed to write `{}`", dest.display()))?;

    log!("page"; "{rel}");
    Ok(ctx)
}

fn take_str(ctx: &mut Context, key: &str) -> Result<String> {
    match ctx.remove(key) {
        Some(Value::String(s)) => Ok(s),
        _ => bail!("page context missing `{key}`"),
    }
}

/// Ensure the output directory exists; with `clean`, clear it first.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("failed to clear output directory `{}`", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory `{}`", output.display()))?;
    Ok(())
}

/// Fail the build if two source files map to the same output file (for
/// example `a.md` and `a.markdown`). Letting them race would make the
/// survivor depend on scheduling.
fn check_collisions(matches: &[PathBuf], output: &Path) -> Result<()> {
    let mut destinations: HashMap<PathBuf, &Path> = HashMap::new();

    for rel in matches {
        let dest = output.join(rel).with_extension("html");
        if let Some(existing) = destinations.insert(dest.clone(), rel) {
            bail!(
                "`{}` and `{}` both render to `{}`",
                existing.display(),
                rel.display(),
                dest.display()
            );
        }
    }

    Ok(())
}

// ============================================================================
// Scoped working directory
// ============================================================================

/// Scoped working-directory change.
///
/// `enter` records the current directory and changes into the target;
/// dropping the guard restores the recorded directory. Because the guard is
/// held across both build phases, every exit path releases the directory
/// exactly once.
#[derive(Debug)]
struct ScopedDir {
    previous: PathBuf,
}

impl ScopedDir {
    fn enter(target: &Path) -> Result<Self> {
        if !target.is_dir() {
            bail!("source folder `{}` is not a directory", target.display());
        }

        let previous = env::current_dir().context("failed to record working directory")?;
        env::set_current_dir(target)
            .with_context(|| format!("failed to enter source folder `{}`", target.display()))?;

        Ok(Self { previous })
    }
}

impl Drop for ScopedDir {
    fn drop(&mut self) {
        if let Err(err) = env::set_current_dir(&self.previous) {
            log!("error"; "failed to restore working directory `{}`: {err}", self.previous.display());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
