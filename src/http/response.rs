//! Response construction.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};

/// Value of the `Allow` header on 405 responses.
pub const ALLOWED_METHODS: &str = "GET, HEAD";

/// `200 OK` with a rendered page.
pub fn page(html: String) -> Response {
    Html(html).into_response()
}

/// `404 Not Found` for a path no route matches.
pub fn not_found(path: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("No route matches '{}'", path)).into_response()
}

/// `405 Method Not Allowed` for a matched path requested with anything but GET/HEAD.
pub fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS))],
        "Method not allowed",
    )
        .into_response()
}
