//! Response caching middleware.

use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use http::{Method, StatusCode};
use tower::{Layer, Service};

use crate::cache::policy::{resource_base, CachePolicy};
use crate::cache::store::ResponseStore;
use crate::http::{cache_key, url_without_query, ApiRequest, ApiResponse};
use crate::observability::metrics;

/// Layer that memoizes GET responses and invalidates them on mutation.
#[derive(Debug, Clone)]
pub struct ResponseCacheLayer {
    store: ResponseStore,
    policy: Arc<CachePolicy>,
}

impl ResponseCacheLayer {
    pub fn new(store: ResponseStore, policy: CachePolicy) -> Self {
        Self {
            store,
            policy: Arc::new(policy),
        }
    }

    /// Handle on the store shared by every service this layer produces.
    pub fn store(&self) -> &ResponseStore {
        &self.store
    }
}

impl<S> Layer<S> for ResponseCacheLayer {
    type Service = ResponseCache<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ResponseCache {
            inner,
            store: self.store.clone(),
            policy: self.policy.clone(),
        }
    }
}

/// Caching middleware around a forwarding service.
///
/// Errors from `inner` pass through untouched; this stage never fails on
/// its own.
#[derive(Debug, Clone)]
pub struct ResponseCache<S> {
    inner: S,
    store: ResponseStore,
    policy: Arc<CachePolicy>,
}

impl<S> ResponseCache<S> {
    pub fn new(inner: S, store: ResponseStore, policy: CachePolicy) -> Self {
        Self {
            inner,
            store,
            policy: Arc::new(policy),
        }
    }
}

impl<S> Service<ApiRequest> for ResponseCache<S>
where
    S: Service<ApiRequest, Response = ApiResponse> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = ApiResponse;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<ApiResponse, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: ApiRequest) -> Self::Future {
        // The instance that was polled ready is the one that must be called.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        if request.method() != Method::GET {
            let base = resource_base(request.uri().path());
            let removed = self.store.invalidate_matching(base);
            if removed > 0 {
                tracing::debug!(
                    method = %request.method(),
                    base,
                    removed,
                    "Invalidated cached responses"
                );
                metrics::record_cache_invalidation(removed);
            }
            return Box::pin(inner.call(request));
        }

        let url = url_without_query(request.uri());
        if self.policy.is_excluded(&url) {
            return Box::pin(inner.call(request));
        }

        let key = cache_key(&request);
        if let Some(cached) = self.store.get(&key) {
            tracing::debug!(key = %key, "Cache hit");
            metrics::record_cache_hit();
            return Box::pin(async move { Ok(cached) });
        }

        tracing::debug!(key = %key, "Cache miss");
        metrics::record_cache_miss();
        let ttl = self.policy.resolve_ttl(&url);
        let store = self.store.clone();

        Box::pin(async move {
            let response = inner.call(request).await?;
            // Only 200 is memoized; other 2xx codes pass through.
            if response.status() == StatusCode::OK {
                store.insert(key, &response, ttl);
            }
            Ok(response)
        })
    }
}
