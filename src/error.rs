//! Failure type carried through the request pipeline.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use thiserror::Error;

/// Error returned by every stage of the pipeline.
///
/// Middleware never swallows these: whatever the transport produces reaches
/// the caller unchanged, after side effects have run.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("server responded with {status}")]
    Status {
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
    },

    /// No response reached the client (connect, DNS or client-side timeout).
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// The request could not be built or sent as given.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A successful response carried a body of an unexpected shape.
    #[error("failed to decode response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a status error with an empty header map.
    pub fn status(status: StatusCode, body: impl Into<Bytes>) -> Self {
        ApiError::Status {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Numeric status as seen by the classifier.
    ///
    /// `Some(0)` means no response reached the client; `None` means the
    /// failure never involved the network at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(status.as_u16()),
            ApiError::Unreachable(_) => Some(0),
            ApiError::InvalidRequest(_) | ApiError::Decode(_) => None,
        }
    }

    /// Response body, if the server sent one.
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            ApiError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Map a reqwest failure onto the pipeline taxonomy.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::InvalidRequest(err.to_string())
        } else {
            ApiError::Unreachable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let err = ApiError::status(StatusCode::NOT_FOUND, "missing");
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.body().map(|b| b.as_ref()), Some(&b"missing"[..]));

        assert_eq!(ApiError::Unreachable("refused".into()).status_code(), Some(0));
        assert_eq!(ApiError::Decode("eof".into()).status_code(), None);
        assert!(ApiError::InvalidRequest("bad".into()).body().is_none());
    }
}
