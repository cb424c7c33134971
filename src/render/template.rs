//! Template rendering via tera.
//!
//! The engine is built once from the partials the global phase loaded.
//! Autoescaping is off: the pipeline injects already-rendered HTML (page
//! content, readme markdown turned HTML) into layouts.

use crate::context::Context;
use anyhow::{Context as _, Result, bail};
use serde_json::Value;
use tera::Tera;

/// Layout used when a page's front matter names none
pub const DEFAULT_LAYOUT: &str = "default";

/// Template engine holding every loaded partial, shared read-only across
/// page pipelines.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Register every partial (name to template source) into a fresh engine.
    pub fn from_partials(partials: &Context) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        for (name, source) in partials {
            let source = source
                .as_str()
                .with_context(|| format!("partial `{name}` is not a string"))?;
            tera.add_raw_template(name, source)
                .with_context(|| format!("failed to compile partial `{name}`"))?;
        }

        Ok(Self { tera })
    }

    /// Render a page body as an inline template over its context.
    pub fn render_body(&self, body: &str, ctx: &Context) -> Result<String> {
        let context = tera_context(ctx)?;
        // render_str needs &mut self; page pipelines share this engine
        // read-only, so render against a clone
        let mut tera = self.tera.clone();
        Ok(tera.render_str(body, &context)?)
    }

    /// Render a named layout over the page context.
    pub fn render_layout(&self, name: &str, ctx: &Context) -> Result<String> {
        if !self.has_template(name) {
            let mut known: Vec<&str> = self.tera.get_template_names().collect();
            known.sort_unstable();
            bail!("layout `{name}` not found (known layouts: {})", known.join(", "));
        }

        let context = tera_context(ctx)?;
        Ok(self.tera.render(name, &context)?)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }
}

fn tera_context(ctx: &Context) -> Result<tera::Context> {
    Ok(tera::Context::from_serialize(Value::Object(ctx.clone()))?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn partials(entries: &[(&str, &str)]) -> Context {
        entries
            .iter()
            .map(|(name, source)| (name.to_string(), json!(source)))
            .collect()
    }

    fn ctx(entries: &[(&str, Value)]) -> Context {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_render_body_substitutes_variables() {
        let engine = TemplateEngine::from_partials(&Context::new()).unwrap();
        let page = ctx(&[("title", json!("About"))]);

        let rendered = engine.render_body("# {{ title }}", &page).unwrap();

        assert_eq!(rendered, "# About");
    }

    #[test]
    fn test_render_body_reaches_nested_values() {
        let engine = TemplateEngine::from_partials(&Context::new()).unwrap();
        let page = ctx(&[("project", json!({"title": "Widget"}))]);

        let rendered = engine.render_body("{{ project.title }}", &page).unwrap();

        assert_eq!(rendered, "Widget");
    }

    #[test]
    fn test_render_layout_wraps_content() {
        let engine = TemplateEngine::from_partials(&partials(&[(
            "default",
            "<main>{{ content }}</main>",
        )]))
        .unwrap();
        let page = ctx(&[("content", json!("<h1>Hi</h1>"))]);

        let rendered = engine.render_layout("default", &page).unwrap();

        assert_eq!(rendered, "<main><h1>Hi</h1></main>");
    }

    #[test]
    fn test_no_autoescaping_of_injected_html() {
        let engine = TemplateEngine::from_partials(&partials(&[("default", "{{ content }}")]))
            .unwrap();
        let page = ctx(&[("content", json!("<p>raw</p>"))]);

        let rendered = engine.render_layout("default", &page).unwrap();

        assert_eq!(rendered, "<p>raw</p>");
    }

    #[test]
    fn test_partials_can_include_each_other() {
        let engine = TemplateEngine::from_partials(&partials(&[
            ("header", "<nav>menu</nav>"),
            ("default", "{% include \"header\" %}<main>{{ content }}</main>"),
        ]))
        .unwrap();
        let page = ctx(&[("content", json!("x"))]);

        let rendered = engine.render_layout("default", &page).unwrap();

        assert_eq!(rendered, "<nav>menu</nav><main>x</main>");
    }

    #[test]
    fn test_missing_layout_lists_known_names() {
        let engine = TemplateEngine::from_partials(&partials(&[("default", "x")])).unwrap();

        let err = engine
            .render_layout("missing", &Context::new())
            .unwrap_err();
        let message = err.to_string();

        assert!(message.contains("layout `missing` not found"));
        assert!(message.contains("default"));
    }

    #[test]
    fn test_invalid_partial_syntax_fails_compilation() {
        let result = TemplateEngine::from_partials(&partials(&[("broken", "{% if %}")]));

        assert!(result.is_err());
    }

    #[test]
    fn test_body_loops_over_nav() {
        let engine = TemplateEngine::from_partials(&Context::new()).unwrap();
        let page = ctx(&[(
            "nav",
            json!([
                {"title": "Home", "url": "/", "current": true},
                {"title": "About", "url": "/about.html", "current": false},
            ]),
        )]);

        let rendered = engine
            .render_body(
                "{% for item in nav %}{{ item.title }};{% endfor %}",
                &page,
            )
            .unwrap();

        assert_eq!(rendered, "Home;About;");
    }
}
