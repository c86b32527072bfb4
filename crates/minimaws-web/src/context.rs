//! Per-request context handed to the handler chosen by the dispatcher.

use axum::http::header::HOST;
use axum::http::{HeaderMap, Method, Uri};

use crate::links::LinkBuilder;
use crate::path::PathCursor;

/// Base used when neither a public URI nor a `Host` header is available.
const FALLBACK_BASE: &str = "http://localhost/";

/// What a handler knows about the request it is answering.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request method.
    pub method: Method,
    /// Path, with the segments consumed so far tracked separately.
    pub path: PathCursor,
    /// Raw query string, if any. Pages take no parameters; it is only
    /// logged.
    pub query: Option<String>,
    /// Link construction relative to the application's base URI.
    pub links: LinkBuilder,
}

impl RequestContext {
    /// Build the context for an inbound request.
    ///
    /// Links are rooted at `public_uri` when given, otherwise at
    /// `http://<Host>/`.
    pub fn new(method: Method, uri: &Uri, headers: &HeaderMap, public_uri: Option<&str>) -> Self {
        let base = public_uri.map_or_else(|| base_from_host(headers), ToOwned::to_owned);
        Self {
            method,
            path: PathCursor::new(uri.path()),
            query: uri.query().map(ToOwned::to_owned),
            links: LinkBuilder::new(&base),
        }
    }

    /// Whether the request is a plain `GET`.
    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }
}

fn base_from_host(headers: &HeaderMap) -> String {
    headers
        .get(HOST)
        .and_then(|host| host.to_str().ok())
        .filter(|host| !host.is_empty())
        .map_or_else(|| FALLBACK_BASE.to_owned(), |host| format!("http://{host}/"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn base_from_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("maws.example:8080"));
        let uri: Uri = "/machine/pacman?x=1".parse().unwrap();

        let ctx = RequestContext::new(Method::GET, &uri, &headers, None);
        assert_eq!(ctx.links.base(), "http://maws.example:8080/");
        assert_eq!(ctx.path.remaining(), "/machine/pacman");
        assert_eq!(ctx.query.as_deref(), Some("x=1"));
        assert!(ctx.is_get());
    }

    #[test]
    fn public_uri_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("internal:8080"));
        let uri: Uri = "/".parse().unwrap();

        let ctx = RequestContext::new(
            Method::POST,
            &uri,
            &headers,
            Some("https://maws.example/mame"),
        );
        assert_eq!(ctx.links.base(), "https://maws.example/mame/");
        assert!(!ctx.is_get());
    }

    #[test]
    fn no_host_uses_fallback() {
        let uri: Uri = "/".parse().unwrap();
        let ctx = RequestContext::new(Method::GET, &uri, &HeaderMap::new(), None);
        assert_eq!(ctx.links.base(), FALLBACK_BASE);
    }
}
