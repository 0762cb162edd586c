//! Application state shared across all request handlers.

use std::sync::Arc;

use anyhow::Context;
use snippetbox_core::SnippetModel;

use crate::config::Config;
use crate::routes::REQUIRED_PAGES;
use crate::templates::TemplateCache;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Snippet store.
    pub snippets: Arc<SnippetModel>,

    /// Page templates, built once at startup.
    pub templates: Arc<TemplateCache>,
}

impl AppState {
    /// Assemble state from already-opened collaborators.
    pub fn new(config: Config, snippets: SnippetModel, templates: TemplateCache) -> Self {
        Self {
            config: Arc::new(config),
            snippets: Arc::new(snippets),
            templates: Arc::new(templates),
        }
    }

    /// Open the database and build the template cache described by `config`.
    ///
    /// Fails if either cannot be initialised, or if a page a handler renders
    /// is missing; the server must not start without them.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let snippets = SnippetModel::open(&config.dsn)
            .with_context(|| format!("failed to open snippet database at {}", config.dsn))?;

        let html_dir = config.html_dir();
        let templates = TemplateCache::new(&html_dir)
            .with_context(|| format!("failed to build template cache from {}", html_dir.display()))?;

        let missing: Vec<&str> = REQUIRED_PAGES
            .into_iter()
            .filter(|page| !templates.contains(page))
            .collect();
        if !missing.is_empty() {
            anyhow::bail!(
                "template cache from {} is missing pages: {}",
                html_dir.display(),
                missing.join(", ")
            );
        }

        tracing::info!(pages = templates.len(), "application state initialized");

        Ok(Self::new(config, snippets, templates))
    }
}
