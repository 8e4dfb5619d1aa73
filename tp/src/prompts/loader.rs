//! Prompt Loader
//!
//! Compiles prompt templates once, from an override directory or the
//! embedded defaults, and renders them on demand.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;

/// Context for rendering the itinerary template
#[derive(Debug, Clone, Serialize)]
pub struct ItineraryContext<'a> {
    /// Destination text exactly as the model supplied it
    pub destination: &'a str,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine with every template pre-registered
    hbs: Handlebars<'static>,
    /// Override directory the templates were read from, if any
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader, preferring `{dir}/{name}.pmt` over the embedded template
    pub fn new(override_dir: Option<&Path>) -> Result<Self> {
        debug!(?override_dir, "PromptLoader::new: called");
        let override_dir = override_dir.filter(|d| d.exists()).map(Path::to_path_buf);
        let mut hbs = Handlebars::new();
        // Prompts are plain text; HTML escaping would mangle destinations like "Trinidad & Tobago"
        hbs.register_escape_fn(handlebars::no_escape);

        for name in embedded::NAMES {
            let source = Self::load_template(override_dir.as_deref(), name)?;
            hbs.register_template_string(name, source)
                .map_err(|e| eyre!("Failed to compile template {}: {}", name, e))?;
        }

        Ok(Self { hbs, override_dir })
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Result<Self> {
        Self::new(None)
    }

    /// Directory overrides were loaded from
    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    fn load_template(dir: Option<&Path>, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(dir) = dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                info!("Using prompt override {}", path.display());
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: no override");
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }

    /// Render a registered template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        self.hbs
            .render(template_name, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Build the itinerary-generation prompt for `destination`
    pub fn build_itinerary_prompt(&self, destination: &str) -> Result<String> {
        debug!(%destination, "PromptLoader::build_itinerary_prompt: called");
        self.render("itinerary", &ItineraryContext { destination })
    }

    /// The travel-expert system persona
    pub fn system_prompt(&self) -> Result<String> {
        self.render("system", &serde_json::json!({}))
            .map(|s| s.trim().to_string())
    }
}
