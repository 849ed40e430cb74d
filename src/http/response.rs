//! Immutable response snapshots.

use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode, Version};

use crate::http::ApiResponse;

/// Frozen copy of a successful response.
///
/// Every call to [`ResponseSnapshot::to_response`] builds a fresh
/// `ApiResponse`, so a caller mutating what it received cannot affect
/// the stored copy.
#[derive(Debug, Clone)]
pub struct ResponseSnapshot {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
}

impl ResponseSnapshot {
    /// Capture status, version, headers and body. Extensions are dropped.
    pub fn capture(response: &ApiResponse) -> Self {
        Self {
            status: response.status(),
            version: response.version(),
            headers: response.headers().clone(),
            body: response.body().clone(),
        }
    }

    /// Rebuild an independent response from the snapshot.
    pub fn to_response(&self) -> ApiResponse {
        let mut response = Response::new(self.body.clone());
        *response.status_mut() = self.status;
        *response.version_mut() = self.version;
        *response.headers_mut() = self.headers.clone();
        response
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;
    use http::HeaderValue;

    #[test]
    fn test_mutating_copy_leaves_snapshot_intact() {
        let original = Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "application/json")
            .body(Bytes::from_static(b"{\"id\":1}"))
            .unwrap();
        let snapshot = ResponseSnapshot::capture(&original);

        let mut copy = snapshot.to_response();
        copy.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        *copy.body_mut() = Bytes::from_static(b"tampered");

        let again = snapshot.to_response();
        assert_eq!(again.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(again.body().as_ref(), b"{\"id\":1}");
        assert_eq!(again.status(), StatusCode::OK);
    }
}
