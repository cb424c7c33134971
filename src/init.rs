//! Site initialization module.
//!
//! Creates new site structure with default configuration.

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Default config filename
const CONFIG_FILE: &str = "tansu.toml";

/// Default site directory structure
const SITE_DIRS: &[&str] = &["pages", "partials", "data"];

/// Starter layout: navigation plus the rendered page body
const DEFAULT_LAYOUT: &str = r#"<!doctype html>
<html lang="{{ site.language }}">
<head>
<meta charset="utf-8">
<title>{{ title }} - {{ site.title }}</title>
<style>{{ style }}</style>
</head>
<body>
<nav>
{% for item in nav %}<a href="{{ item.url }}"{% if item.current %} aria-current="page"{% endif %}>{{ item.title }}</a>
{% endfor %}</nav>
<main>{{ content }}</main>
</body>
</html>
"#;

/// Starter page
const DEFAULT_PAGE: &str = "---\ntitle: Home\norder: 1\n---\n# Hello\n\nThis site was generated by tansu.\n";

/// Starter stylesheet
const DEFAULT_STYLE: &str = "body { max-width: 42rem; margin: 2rem auto; font-family: sans-serif; }\n";

/// Create a new site with default structure
pub fn new_site(config: &SiteConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();

    // Safety check: if no name was provided (init in current dir),
    // the directory must be completely empty
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `tansu init <SITE_NAME>` to create in a subdirectory."
        );
    }

    init_site_structure(root)?;
    init_default_config(root)?;
    init_starter_files(root)?;

    log!("init"; "site created at `{}`", root.display());
    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Create site directory structure
fn init_site_structure(root: &Path) -> Result<()> {
    for dir in SITE_DIRS {
        let path = root.join(dir);
        if path.exists() {
            bail!(
                "Path `{}` already exists. Try `tansu init <SITE_NAME>` instead.",
                path.display()
            );
        }
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    Ok(())
}

/// Write default configuration file
fn init_default_config(root: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&SiteConfig::default())?;
    fs::write(root.join(CONFIG_FILE), content)?;
    Ok(())
}

/// Write the starter layout, page and stylesheet
fn init_starter_files(root: &Path) -> Result<()> {
    fs::write(root.join("partials/default.html"), DEFAULT_LAYOUT)?;
    fs::write(root.join("pages/index.md"), DEFAULT_PAGE)?;
    fs::write(root.join("style.css"), DEFAULT_STYLE)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
