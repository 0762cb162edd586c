//! Route definitions for the snippet service.
//!
//! ## Routes
//!
//! - `GET /` - Latest snippets
//! - `GET /snippet/view/{id}` - A single snippet
//! - `GET /snippet/create` - Create form
//! - `POST /snippet/create` - Create a snippet, redirect to its page
//! - `GET /health` - Health check (JSON)
//! - `GET /static/*` - Stylesheets and other assets

mod health;
mod home;
mod snippet;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;

use crate::error::AppError;
use crate::middleware;
use crate::state::AppState;

/// Pages the handlers render; startup fails if any is missing from the cache.
pub const REQUIRED_PAGES: [&str; 3] = [
    home::HOME_PAGE,
    snippet::VIEW_PAGE,
    snippet::CREATE_PAGE,
];

/// Build the complete router, including the middleware chain.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(state.config.static_dir());

    let router = Router::new()
        .route("/", get(home::home))
        .route("/snippet/view/{id}", get(snippet::snippet_view))
        .route(
            "/snippet/create",
            get(snippet::snippet_create).post(snippet::snippet_create_post),
        )
        .route("/health", get(health::health_check))
        .nest_service("/static", static_files)
        .fallback(not_found)
        .with_state(state);

    middleware::apply(router)
}

async fn not_found() -> AppError {
    AppError::NotFound
}
