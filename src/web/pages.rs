//! Page rendering
//!
//! Tera templates are embedded in the binary at compile time and parsed
//! once on first use. Base templates are registered before the pages that
//! extend them so inheritance chains resolve.

use anyhow::anyhow;
use axum::{http::StatusCode, response::Html};
use once_cell::sync::Lazy;
use rust_embed::RustEmbed;
use tera::{Context, Tera};

use crate::web::error::PageError;

#[derive(RustEmbed)]
#[folder = "templates"]
#[include = "*.html"]
struct Templates;

static TERA: Lazy<Tera> = Lazy::new(|| {
    let mut templates: Vec<(String, String)> = Templates::iter()
        .filter_map(|path| {
            let file = Templates::get(&path)?;
            let content = String::from_utf8(file.data.into_owned()).ok()?;
            Some((path.to_string(), content))
        })
        .collect();

    // Base templates first so inheritance resolves
    templates.sort_by(|a, b| {
        let a_is_base = a.0 == "base.html";
        let b_is_base = b.0 == "base.html";
        b_is_base.cmp(&a_is_base)
    });

    let mut tera = Tera::default();
    for (name, content) in templates {
        tera.add_raw_template(&name, &content)
            .unwrap_or_else(|e| panic!("Embedded template {} is malformed: {}", name, e));
    }
    tera.build_inheritance_chains()
        .expect("Embedded templates have a broken inheritance chain");

    tera
});

/// Render a page template with the given context.
pub fn render(name: &str, context: &Context) -> Result<Html<String>, PageError> {
    let body = TERA
        .render(name, context)
        .map_err(|e| PageError::Internal(anyhow!("Failed to render {}: {}", name, e)))?;
    Ok(Html(body))
}

/// Render the error page. Falls back to a bare body if even the error
/// template fails, so error responses always have one.
pub fn render_error(status: StatusCode, message: &str) -> Html<String> {
    let mut context = Context::new();
    context.insert("status", &status.as_u16());
    context.insert("message", message);

    match TERA.render("error.html", &context) {
        Ok(body) => Html(body),
        Err(_) => Html(format!("<h1>{}</h1><p>{}</p>", status.as_u16(), message)),
    }
}
