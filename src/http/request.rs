//! Request helpers.
//!
//! # Responsibilities
//! - Attach, detect and strip the silent marker header
//! - Derive the URL forms the cache policy matches against
//! - Generate request IDs for correlation

use http::header::HeaderName;
use http::{HeaderValue, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Requests carrying this header fail without a user-visible notification.
///
/// The header never reaches the server; the error classifier removes it.
pub const SILENT_ERROR_HEADER: HeaderName = HeaderName::from_static("x-silent-error");

/// Correlation header added to every outgoing request.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Extension methods for outgoing requests.
pub trait RequestExt {
    /// Mark the request silent.
    fn silent(self) -> Self;

    /// Whether the silent marker is attached.
    fn is_silent(&self) -> bool;
}

impl<B> RequestExt for Request<B> {
    fn silent(mut self) -> Self {
        self.headers_mut()
            .insert(SILENT_ERROR_HEADER, HeaderValue::from_static("1"));
        self
    }

    fn is_silent(&self) -> bool {
        self.headers().contains_key(SILENT_ERROR_HEADER)
    }
}

/// Remove the silent marker, returning whether it was present.
pub fn take_silent_marker<B>(request: &mut Request<B>) -> bool {
    request.headers_mut().remove(SILENT_ERROR_HEADER).is_some()
}

/// Scheme, authority and path of a URI, without the query string.
pub fn url_without_query(uri: &Uri) -> String {
    match (uri.scheme_str(), uri.authority()) {
        (Some(scheme), Some(authority)) => format!("{}://{}{}", scheme, authority, uri.path()),
        _ => uri.path().to_string(),
    }
}

/// Method-qualified URL including the query string.
pub fn cache_key<B>(request: &Request<B>) -> String {
    format!("{} {}", request.method(), request.uri())
}

/// Request ID generator backed by UUID v4.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_silent_marker_round_trip() {
        let mut req = Request::builder()
            .uri("http://localhost:8080/api/products/stats")
            .body(())
            .unwrap()
            .silent();
        assert!(req.is_silent());

        assert!(take_silent_marker(&mut req));
        assert!(!req.is_silent());
        assert!(!take_silent_marker(&mut req));
    }

    #[test]
    fn test_url_without_query() {
        let uri: Uri = "http://localhost:8080/api/products?page=0&size=20".parse().unwrap();
        assert_eq!(url_without_query(&uri), "http://localhost:8080/api/products");

        let relative: Uri = "/api/orders?page=1".parse().unwrap();
        assert_eq!(url_without_query(&relative), "/api/orders");
    }

    #[test]
    fn test_cache_key_includes_method_and_query() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("http://localhost:8080/api/products?page=0")
            .body(())
            .unwrap();
        assert_eq!(cache_key(&req), "GET http://localhost:8080/api/products?page=0");
    }

    #[test]
    fn test_request_ids_are_unique() {
        let req = Request::builder().uri("/").body(()).unwrap();
        let mut maker = UuidRequestId;
        let a = maker.make_request_id(&req).unwrap();
        let b = maker.make_request_id(&req).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
