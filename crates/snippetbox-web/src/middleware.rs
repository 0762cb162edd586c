//! Middleware applied to every route.
//!
//! The chain, outermost first:
//!
//! 1. **Request span**: an `http_request` span around everything below, so
//!    every log line emitted while handling the request carries method and URI
//! 2. **Panic recovery**: a panic anywhere below becomes a 500 with
//!    `Connection: close`, and the process keeps serving other requests
//! 3. **Request logging**: one `received request` event per request
//! 4. **Common headers**: security headers and the server name, added to
//!    every response unless the handler already set them

use std::any::Any;
use std::net::SocketAddr;

use axum::Router;
use axum::extract::{ConnectInfo, Request};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::Instrument;

use crate::error::client_error;

/// Value of the `Server` response header.
pub const SERVER_NAME: &str = "snippetbox";

/// Wrap `router` in the standard middleware chain.
pub fn apply<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(request_span))
            .layer(CatchPanicLayer::custom(recover_panic))
            .layer(middleware::from_fn(log_request))
            .layer(middleware::map_response(common_headers)),
    )
}

/// Turn a panic from downstream into a generic 500 response.
pub fn recover_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(panic = %detail, "recovered from panic while handling request");

    let mut response = client_error(StatusCode::INTERNAL_SERVER_ERROR);
    let headers = response.headers_mut();
    headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
    set_common_headers(headers);
    response
}

/// Run the rest of the chain inside an `http_request` span.
///
/// Sits above panic recovery so the recovery event is logged with method and URI.
pub async fn request_span(request: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
    );

    next.run(request).instrument(span).await
}

/// Log the request line.
pub async fn log_request(request: Request, next: Next) -> Response {
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    tracing::info!(
        ip = %remote_addr,
        proto = ?request.version(),
        method = %request.method(),
        uri = %request.uri(),
        "received request"
    );

    next.run(request).await
}

/// Add the common headers to a response.
async fn common_headers(mut response: Response) -> Response {
    set_common_headers(response.headers_mut());
    response
}

/// Insert each common header unless it is already present.
fn set_common_headers(headers: &mut HeaderMap) {
    let defaults = [
        (header::CONTENT_SECURITY_POLICY, "default-src 'self'"),
        (header::REFERRER_POLICY, "origin-when-cross-origin"),
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::X_FRAME_OPTIONS, "deny"),
        (header::X_XSS_PROTECTION, "0"),
        (header::SERVER, SERVER_NAME),
    ];

    for (name, value) in defaults {
        headers
            .entry(name)
            .or_insert_with(|| HeaderValue::from_static(value));
    }
}
