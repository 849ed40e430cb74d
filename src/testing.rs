//! Test utilities for pos-client: scripted backends and recording collaborators
//!
//! These let the pipeline run headless: no network, no UI. Every type here
//! records what it was asked to do so tests can assert on it afterwards.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method, Response, StatusCode, Uri};
use tower::Service;

use crate::error::ApiError;
use crate::http::{ApiRequest, ApiResponse};
use crate::session::{Navigator, Notice, Notifier, SessionStore};

type Responder = dyn Fn(&ApiRequest) -> Result<ApiResponse, ApiError> + Send + Sync;

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// What a scripted backend saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// In-process stand-in for the network transport.
#[derive(Clone)]
pub struct ScriptedBackend {
    responder: Arc<Responder>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl ScriptedBackend {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<ApiResponse, ApiError> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            requests: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    /// Always answers 200 with the given JSON body.
    pub fn ok_json(body: impl Into<String>) -> Self {
        let body = Bytes::from(body.into());
        Self::new(move |_| Ok(json_response(StatusCode::OK, body.clone())))
    }

    /// Always fails with `status` and an empty body.
    pub fn failing(status: StatusCode) -> Self {
        Self::failing_with(status, "")
    }

    /// Always fails with `status` and `body`.
    pub fn failing_with(status: StatusCode, body: impl Into<String>) -> Self {
        let body = Bytes::from(body.into());
        Self::new(move |_| Err(ApiError::status(status, body.clone())))
    }

    /// Always fails as if the server could not be reached.
    pub fn unreachable() -> Self {
        Self::new(|_| Err(ApiError::Unreachable("connection refused".to_string())))
    }

    /// Wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of requests that reached this backend.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }
}

/// Build a JSON response with the given status.
pub fn json_response(status: StatusCode, body: impl Into<Bytes>) -> ApiResponse {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, http::HeaderValue::from_static("application/json"));
    response
}

impl Service<ApiRequest> for ScriptedBackend {
    type Response = ApiResponse;
    type Error = ApiError;
    type Future = BoxFuture<'static, Result<ApiResponse, ApiError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: ApiRequest) -> Self::Future {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.requests).push(RecordedRequest {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
            body: request.body().clone(),
        });
        let result = (self.responder)(&request);
        let delay = self.delay;

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }
}

/// Session store counting how often it was cleared.
#[derive(Debug, Default)]
pub struct RecordingSession {
    logged_in: Mutex<bool>,
    clears: AtomicUsize,
}

impl RecordingSession {
    pub fn logged_in() -> Self {
        Self {
            logged_in: Mutex::new(true),
            clears: AtomicUsize::new(0),
        }
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl SessionStore for RecordingSession {
    fn clear_session(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        *lock(&self.logged_in) = false;
    }

    fn is_logged_in(&self) -> bool {
        *lock(&self.logged_in)
    }
}

/// Navigator recording every visited path.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        lock(&self.visits).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn go_to(&self, path: &str) {
        lock(&self.visits).push(path.to_string());
    }
}

/// Notifier recording every notice shown.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        lock(&self.notices).push(notice.clone());
    }
}
