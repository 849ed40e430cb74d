//! Error classification middleware.

use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::classify::classifier::ErrorClassifier;
use crate::error::ApiError;
use crate::http::{take_silent_marker, ApiRequest, ApiResponse};

/// Layer wrapping services with [`ErrorClassification`].
#[derive(Debug, Clone)]
pub struct ErrorClassifierLayer {
    classifier: ErrorClassifier,
}

impl ErrorClassifierLayer {
    pub fn new(classifier: ErrorClassifier) -> Self {
        Self { classifier }
    }
}

impl<S> Layer<S> for ErrorClassifierLayer {
    type Service = ErrorClassification<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorClassification {
            inner,
            classifier: self.classifier.clone(),
        }
    }
}

/// Strips the silent marker, forwards, and on failure classifies and
/// dispatches side effects before handing the original error back.
#[derive(Debug, Clone)]
pub struct ErrorClassification<S> {
    inner: S,
    classifier: ErrorClassifier,
}

impl<S> Service<ApiRequest> for ErrorClassification<S>
where
    S: Service<ApiRequest, Response = ApiResponse, Error = ApiError> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = ApiResponse;
    type Error = ApiError;
    type Future = BoxFuture<'static, Result<ApiResponse, ApiError>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: ApiRequest) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let classifier = self.classifier.clone();

        let silent = take_silent_marker(&mut request);
        let future = inner.call(request);

        Box::pin(async move {
            match future.await {
                Ok(response) => Ok(response),
                Err(error) => {
                    classifier.handle_failure(&error, silent);
                    Err(error)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::mapping::{ErrorTable, NotifyDurations};
    use crate::http::{RequestExt, SILENT_ERROR_HEADER};
    use crate::testing::{RecordingNavigator, RecordingNotifier, RecordingSession, ScriptedBackend};
    use bytes::Bytes;
    use http::StatusCode;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn layer(notifier: Arc<RecordingNotifier>) -> ErrorClassifierLayer {
        ErrorClassifierLayer::new(ErrorClassifier::new(
            ErrorTable::default(),
            NotifyDurations::default(),
            "/login",
            Arc::new(RecordingSession::logged_in()),
            Arc::new(RecordingNavigator::default()),
            notifier,
        ))
    }

    fn get(uri: &str) -> ApiRequest {
        http::Request::get(uri).body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn test_silent_marker_never_reaches_transport() {
        let backend = ScriptedBackend::ok_json("{}");
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = layer(notifier).layer(backend.clone());

        svc.oneshot(get("http://h/api/products/stats").silent()).await.unwrap();

        let sent = backend.requests();
        assert_eq!(sent.len(), 1);
        assert!(!sent[0].headers.contains_key(SILENT_ERROR_HEADER));
    }

    #[tokio::test]
    async fn test_failure_is_reraised_unchanged() {
        let backend = ScriptedBackend::failing_with(StatusCode::NOT_FOUND, "missing");
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = layer(notifier.clone()).layer(backend);

        let err = svc.oneshot(get("http://h/api/products/99")).await.unwrap_err();
        match err {
            ApiError::Status { status, body, .. } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(body.as_ref(), b"missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(notifier.notices().len(), 1);
    }

    #[tokio::test]
    async fn test_success_has_no_side_effects() {
        let backend = ScriptedBackend::ok_json("[]");
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = layer(notifier.clone()).layer(backend);

        svc.oneshot(get("http://h/api/customers")).await.unwrap();
        assert!(notifier.notices().is_empty());
    }
}
