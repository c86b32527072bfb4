//! Response head contract shared by every handler.
//!
//! Every response carries a `Content-Type` and the same `Cache-Control`
//! value; 405 responses also list the methods a resource accepts. Error
//! bodies are the rendered error page.

use axum::body::Body;
use axum::http::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use minijinja::context;

use crate::mime::OCTET_STREAM;
use crate::templates::{Fragment, PageTemplates};

/// Content type of every generated page.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Cache policy applied to all responses, errors included.
pub const CACHE_POLICY: &str = "public, max-age=3600";

/// Methods listed on 405 responses.
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Reason phrase for the status codes the server knows about.
pub const fn reason_phrase(status: StatusCode) -> &'static str {
    match status.as_u16() {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        _ => "Unknown",
    }
}

/// Build a response with the standard headers.
///
/// An unrepresentable `content_type` degrades to `application/octet-stream`.
pub fn with_headers(status: StatusCode, content_type: &str, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;

    let content_type = HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(OCTET_STREAM));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_POLICY));
    if status == StatusCode::METHOD_NOT_ALLOWED {
        headers.insert(ACCEPT, HeaderValue::from_static(ALLOWED_METHODS));
    }
    response
}

/// Render the error page for `status`.
pub fn error_page(templates: &PageTemplates, status: StatusCode) -> Response {
    let code = status.as_u16().to_string();
    let message = reason_phrase(status);
    let body = templates
        .render(Fragment::ErrorPage, context! { code => &code, message })
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error page failed to render");
            format!("{code} {message}\n").into()
        });
    with_headers(status, HTML_CONTENT_TYPE, Body::from(body))
}
