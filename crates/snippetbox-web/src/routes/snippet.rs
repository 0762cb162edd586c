//! Snippet view and creation handlers.

use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

use crate::error::AppError;
use crate::forms::SnippetCreateForm;
use crate::render::{TemplateData, render};
use crate::state::AppState;

/// Template for a single snippet.
pub const VIEW_PAGE: &str = "view.tmpl";

/// Template for the create form.
pub const CREATE_PAGE: &str = "create.tmpl";

/// `GET /snippet/view/{id}`
///
/// Anything that isn't a positive integer is a 404 and never reaches the store.
pub async fn snippet_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id).ok_or(AppError::NotFound)?;

    let snippet = state.snippets.get(id)?;

    let data = TemplateData {
        snippet: Some(snippet),
        ..TemplateData::new()
    };

    render(&state.templates, StatusCode::OK, VIEW_PAGE, &data)
}

/// `GET /snippet/create`
pub async fn snippet_create(State(state): State<AppState>) -> Result<Response, AppError> {
    let data = TemplateData {
        form: Some(SnippetCreateForm::default()),
        ..TemplateData::new()
    };

    render(&state.templates, StatusCode::OK, CREATE_PAGE, &data)
}

/// `POST /snippet/create`
///
/// Invalid input re-renders the form with 422 and the submitted values, so
/// the user only has to fix the fields that failed.
pub async fn snippet_create_post(
    State(state): State<AppState>,
    form: Result<Form<SnippetCreateForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(mut form) = form.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    if !form.validate() {
        let data = TemplateData {
            form: Some(form),
            ..TemplateData::new()
        };
        return render(
            &state.templates,
            StatusCode::UNPROCESSABLE_ENTITY,
            CREATE_PAGE,
            &data,
        );
    }

    let id = state
        .snippets
        .insert(&form.title, &form.content, form.expires)?;

    tracing::info!(id, "snippet created");

    Ok(Redirect::to(&format!("/snippet/view/{id}")).into_response())
}

/// Parse a snippet id from a path segment; only positive integers are ids.
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("1"), Some(1));
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-5"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("1.5"), None);
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("99999999999999999999"), None);
    }
}
