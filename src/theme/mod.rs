//! Theme engine
//!
//! Template rendering with Tera.
//! Features:
//! - Built-in templates compiled into the binary
//! - Per-theme overrides read from `<themes_path>/<theme>/` (or its `dist/`)
//! - Template hot-reload
//! - Standard template variables

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context as TeraContext, Tera};

mod error;

pub use error::ThemeError;

/// Template used for the front page post listing
pub const POSTS_INDEX_TEMPLATE: &str = "posts/index.html";

/// Templates shipped with the binary. A theme only needs to provide the
/// files it wants to change.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    (
        POSTS_INDEX_TEMPLATE,
        include_str!("../../templates/posts/index.html"),
    ),
];

/// Variables every page template can rely on
#[derive(Debug, Clone)]
pub struct StandardTemplateVars {
    pub site_name: String,
    pub site_description: String,
    /// Path of the request being rendered
    pub request_path: String,
    /// Current year (for copyright)
    pub year: i32,
}

/// Theme engine for rendering templates
pub struct ThemeEngine {
    tera: Tera,
    themes_path: PathBuf,
    current_theme: String,
}

impl ThemeEngine {
    /// Create a theme engine and load `theme`.
    ///
    /// A theme directory that does not exist is not an error: the engine
    /// logs a warning and renders with the built-in templates.
    pub fn new(themes_path: &Path, theme: &str) -> Result<Self, ThemeError> {
        let mut engine = Self {
            tera: Tera::default(),
            themes_path: themes_path.to_path_buf(),
            current_theme: theme.to_string(),
        };

        if !engine.theme_exists(theme) {
            tracing::warn!(
                "Theme '{}' not found under {:?}, using built-in templates",
                theme,
                engine.themes_path
            );
        }

        engine.load_theme_templates()?;
        Ok(engine)
    }

    /// Directory templates are read from: `dist/` when the theme has one
    fn template_dir(&self, theme: &str) -> PathBuf {
        let theme_path = self.get_theme_path(theme);
        let dist_path = theme_path.join("dist");
        if dist_path.is_dir() {
            dist_path
        } else {
            theme_path
        }
    }

    /// Rebuild the Tera instance from the built-ins plus the current
    /// theme's files. The old instance is kept if anything fails.
    fn load_theme_templates(&mut self) -> Result<(), ThemeError> {
        let mut templates: BTreeMap<String, String> = BUILTIN_TEMPLATES
            .iter()
            .map(|(name, content)| (name.to_string(), content.to_string()))
            .collect();

        let template_dir = self.template_dir(&self.current_theme);
        if template_dir.is_dir() {
            let mut overrides = Vec::new();
            collect_templates_from_dir(&template_dir, &template_dir, &mut overrides)?;
            tracing::debug!(
                "Loaded {} template(s) from theme '{}'",
                overrides.len(),
                self.current_theme
            );
            templates.extend(overrides);
        }

        // Added in one batch so `extends` resolves regardless of order
        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|e| ThemeError::TemplateError(describe_tera_error(&e)))?;

        self.tera = tera;
        Ok(())
    }

    /// Render a template
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<String, ThemeError> {
        self.tera.render(template, context).map_err(|e| {
            ThemeError::TemplateError(format!(
                "Failed to render '{}': {}",
                template,
                describe_tera_error(&e)
            ))
        })
    }

    /// Render a template with the standard variables added to `context`
    pub fn render_with_standard_vars(
        &self,
        template: &str,
        context: &TeraContext,
        standard_vars: &StandardTemplateVars,
    ) -> Result<String, ThemeError> {
        let mut full_context = context.clone();

        full_context.insert("site_name", &standard_vars.site_name);
        full_context.insert("site_description", &standard_vars.site_description);
        full_context.insert("request_path", &standard_vars.request_path);
        full_context.insert("theme_name", &self.current_theme);
        full_context.insert("year", &standard_vars.year);

        self.render(template, &full_context)
    }

    /// Switch to another installed theme
    pub fn set_theme(&mut self, theme: &str) -> Result<(), ThemeError> {
        if !self.theme_exists(theme) {
            return Err(ThemeError::NotFound(theme.to_string()));
        }

        let previous = std::mem::replace(&mut self.current_theme, theme.to_string());
        if let Err(e) = self.load_theme_templates() {
            self.current_theme = previous;
            return Err(e);
        }

        tracing::info!("Switched theme to '{}'", theme);
        Ok(())
    }

    /// Re-read the current theme from disk
    pub fn reload_templates(&mut self) -> Result<(), ThemeError> {
        self.load_theme_templates()
    }

    pub fn template_exists(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|t| t == name)
    }

    pub fn get_current_theme(&self) -> &str {
        &self.current_theme
    }

    pub fn theme_exists(&self, theme: &str) -> bool {
        self.get_theme_path(theme).is_dir()
    }

    pub fn get_theme_path(&self, theme: &str) -> PathBuf {
        self.themes_path.join(theme)
    }
}

/// Recursively collect `.html` files under `current_path`, named by their
/// path relative to `base_path` with `/` separators.
fn collect_templates_from_dir(
    base_path: &Path,
    current_path: &Path,
    templates: &mut Vec<(String, String)>,
) -> Result<(), ThemeError> {
    for entry in fs::read_dir(current_path)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_templates_from_dir(base_path, &path, templates)?;
        } else if path.extension().is_some_and(|ext| ext == "html") {
            let Ok(relative) = path.strip_prefix(base_path) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let content = fs::read_to_string(&path)?;
            templates.push((name, content));
        }
    }
    Ok(())
}

/// Tera nests the useful part of an error in its source chain
fn describe_tera_error(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        message.push_str(&format!("\n  Caused by: {}", s));
        source = s.source();
    }
    message
}
