//! Snippetbox Web - server-rendered pages for creating and viewing snippets.
//!
//! # Architecture
//!
//! - **Templates**: page templates composed once at startup into an immutable cache
//! - **Render**: pages are rendered into memory before the response is written
//! - **Middleware**: panic recovery, request logging and common security headers
//! - **Routes**: handlers orchestrating form validation, the snippet store and rendering
//!
//! # Security
//!
//! - All dynamic template values are HTML-escaped
//! - Internal errors are logged server-side; clients only see a generic 500
//! - Every response carries `X-Content-Type-Options`, `X-Frame-Options`,
//!   `Referrer-Policy` and a `Content-Security-Policy`

pub mod config;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod state;
pub mod templates;

pub use config::Config;
pub use error::AppError;
pub use routes::router;
pub use state::AppState;
pub use templates::TemplateCache;
