//! Page rendering.
//!
//! A page is rendered completely into memory before anything is written to
//! the response, so a template that fails halfway produces a clean 500
//! instead of a truncated page with a 200 status.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::{Datelike, Utc};
use serde::Serialize;
use snippetbox_core::Snippet;

use crate::error::AppError;
use crate::forms::SnippetCreateForm;
use crate::templates::TemplateCache;

/// Dynamic data passed to page templates.
#[derive(Debug, Default, Serialize)]
pub struct TemplateData {
    /// Year shown in the footer.
    pub current_year: i32,
    /// Snippet shown on the view page.
    pub snippet: Option<Snippet>,
    /// Latest snippets, newest first.
    pub snippets: Vec<Snippet>,
    /// Create form with any field errors.
    pub form: Option<SnippetCreateForm>,
}

impl TemplateData {
    /// Empty template data stamped with the current year.
    pub fn new() -> Self {
        Self {
            current_year: Utc::now().year(),
            ..Default::default()
        }
    }
}

/// Render `page` with `data` and wrap it in a response with `status`.
pub fn render(
    templates: &TemplateCache,
    status: StatusCode,
    page: &str,
    data: &TemplateData,
) -> Result<Response, AppError> {
    let template = templates
        .get(page)?
        .ok_or_else(|| AppError::MissingTemplate(page.to_string()))?;

    let body = template.render(data)?;

    Ok((status, Html(body)).into_response())
}
