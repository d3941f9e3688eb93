//! Prompt template loading and rendering using Tera.
//!
//! The AI prompts live in external template files so the board can tune the
//! wording without recompiling; embedded copies serve as fallback when the
//! files are not shipped alongside the binary.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tera::{Context, Tera};

/// Default templates directory relative to the working directory.
const TEMPLATES_DIR: &str = "templates";

/// Embedded default templates for fallback when files don't exist.
static EMBEDDED_TEMPLATES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("prompts/action_plan.tera", include_str!("../templates/prompts/action_plan.tera"));
    m.insert(
        "prompts/communication_draft.tera",
        include_str!("../templates/prompts/communication_draft.tera"),
    );
    m.insert("prompts/smart_summary.tera", include_str!("../templates/prompts/smart_summary.tera"));
    m
});

/// Global template engine with caching.
static TERA: Lazy<RwLock<Option<Tera>>> = Lazy::new(|| RwLock::new(None));

/// Initialize the template engine with templates from the specified directory.
///
/// If the directory doesn't exist, templates will be loaded from embedded
/// defaults.
///
/// # Errors
///
/// Returns an error if the templates directory exists but contains invalid
/// templates.
///
/// # Panics
///
/// Panics if an embedded template fails to add to the engine. This should
/// never happen as embedded templates are verified by
/// `test_all_embedded_templates_render`.
pub fn init_templates(templates_dir: Option<&Path>) -> Result<()> {
    let dir = templates_dir.map_or_else(
        || std::env::current_dir().unwrap_or_default().join(TEMPLATES_DIR),
        Path::to_path_buf,
    );

    let mut tera = Tera::default();

    if dir.exists() {
        let glob_pattern = format!("{}/**/*.tera", dir.display());
        match Tera::new(&glob_pattern) {
            Ok(t) => {
                tera = t;
            }
            Err(e) => {
                return Err(Error::Template(format!(
                    "Failed to load templates from {}: {e}",
                    dir.display()
                )));
            }
        }
    }

    // Add any missing templates from embedded defaults.
    for (name, content) in EMBEDDED_TEMPLATES.iter() {
        if tera.get_template(name).is_err() {
            tera.add_raw_template(name, content)
                .expect("embedded template should be valid - verified by tests");
        }
    }

    *TERA.write().map_err(|e| Error::Template(e.to_string()))? = Some(tera);

    Ok(())
}

/// Render a template with the given context.
///
/// Templates are lazy-loaded from the filesystem on first use, with embedded
/// defaults as fallback.
///
/// # Errors
///
/// Returns an error if the template doesn't exist or rendering fails.
pub fn render(name: &str, context: &Context) -> Result<String> {
    let needs_init = TERA.read().map_err(|e| Error::Template(e.to_string()))?.is_none();

    if needs_init {
        init_templates(None)?;
    }

    let guard = TERA.read().map_err(|e| Error::Template(e.to_string()))?;
    let tera = guard.as_ref().ok_or_else(|| Error::Template("Templates not initialized".into()))?;
    let rendered = tera
        .render(name, context)
        .map_err(|e| Error::Template(format!("Failed to render template {name}: {e}")))?;
    drop(guard);

    Ok(rendered)
}

/// Create a new Tera context.
#[must_use]
pub fn context() -> Context {
    Context::new()
}

/// Reset the template cache, forcing re-initialization on next use.
///
/// # Errors
///
/// Returns an error if the write lock cannot be acquired.
pub fn reset_cache() -> Result<()> {
    *TERA.write().map_err(|e| Error::Template(e.to_string()))? = None;
    Ok(())
}

/// Get the list of all embedded template names.
#[must_use]
pub fn embedded_template_names() -> Vec<&'static str> {
    EMBEDDED_TEMPLATES.keys().copied().collect()
}
