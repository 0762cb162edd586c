//! Application configuration loaded from environment variables.

use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:4000").
    pub bind_addr: String,

    /// Path to the SQLite snippet database.
    pub dsn: String,

    /// Directory holding `html/` templates and `static/` assets.
    pub ui_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - None (all have defaults for local development)
    ///
    /// Optional:
    /// - `SNIPPETBOX_ADDR`: Server bind address (default: "0.0.0.0:4000")
    /// - `SNIPPETBOX_DSN`: SQLite database path (default: "./data/snippetbox.db")
    /// - `SNIPPETBOX_UI_DIR`: Templates and static assets (default: "./ui")
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("SNIPPETBOX_ADDR").unwrap_or_else(|_| "0.0.0.0:4000".to_string());

        let dsn =
            std::env::var("SNIPPETBOX_DSN").unwrap_or_else(|_| "./data/snippetbox.db".to_string());

        let ui_dir = std::env::var("SNIPPETBOX_UI_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./ui"));

        if dsn.trim().is_empty() {
            anyhow::bail!("SNIPPETBOX_DSN must not be empty");
        }

        tracing::info!(
            bind_addr = %bind_addr,
            dsn = %dsn,
            ui_dir = %ui_dir.display(),
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            dsn,
            ui_dir,
        })
    }

    /// Directory containing `base.tmpl`, `partials/` and `pages/`.
    pub fn html_dir(&self) -> PathBuf {
        self.ui_dir.join("html")
    }

    /// Directory served under `/static`.
    pub fn static_dir(&self) -> PathBuf {
        self.ui_dir.join("static")
    }
}
