//! Home page: the latest live snippets.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

use crate::error::AppError;
use crate::render::{TemplateData, render};
use crate::state::AppState;

/// Template rendered by [`home`].
pub const HOME_PAGE: &str = "home.tmpl";

/// `GET /`
pub async fn home(State(state): State<AppState>) -> Result<Response, AppError> {
    let snippets = state.snippets.latest()?;

    let data = TemplateData {
        snippets,
        ..TemplateData::new()
    };

    render(&state.templates, StatusCode::OK, HOME_PAGE, &data)
}
