//! API client: the assembled request pipeline plus typed helpers.
//!
//! # Data Flow
//! ```text
//! ApiClient::get_json / send_json / login
//!     → build ApiRequest (base_url + path + query, bearer token)
//!     → request ID layer (x-request-id)
//!     → accept header layer
//!     → ErrorClassification (strip silent marker; classify failures)
//!     → ResponseCache (memoize GET, invalidate on mutation)
//!     → transport (reqwest)
//! ```
//!
//! # Design Decisions
//! - One `ResponseStore` per client, created by the builder; clones of the
//!   client share it
//! - Collaborators are injected, so the whole pipeline runs headless in tests

pub mod models;
pub mod products;
pub mod reports;

use std::sync::Arc;

use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method, Request};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tower::util::BoxCloneSyncService;
use tower::{Service, ServiceBuilder, ServiceExt};
use tower_http::request_id::SetRequestIdLayer;
use tower_http::set_header::SetRequestHeaderLayer;
use url::Url;

use crate::cache::{CachePolicy, ResponseCacheLayer, ResponseStore};
use crate::classify::{ErrorClassifier, ErrorClassifierLayer, ErrorTable, NotifyDurations};
use crate::config::PipelineConfig;
use crate::error::{ApiError, Result};
use crate::http::{ApiRequest, ApiResponse, RequestExt, UuidRequestId};
use crate::session::{
    AuthResponse, AuthSession, LocationNavigator, LoginRequest, Navigator, Notifier,
    RegisterRequest, SessionStore, TracingNotifier,
};
use crate::transport::HttpTransport;

pub use models::{ApiEnvelope, Page};
pub use products::{ProductQuery, ProductRequest, ProductResponse, ProductService, ProductStats};
pub use reports::{ReportService, SalesReportResponse, TopProductEntry};

const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";

/// Errors raised while assembling a client.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("invalid cache rule: {0}")]
    InvalidRule(#[from] regex::Error),

    #[error("transport setup failed: {0}")]
    Transport(ApiError),
}

/// Builder wiring configuration and collaborators into an [`ApiClient`].
pub struct ApiClientBuilder {
    config: PipelineConfig,
    session: Arc<AuthSession>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl ApiClientBuilder {
    fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            session: Arc::new(AuthSession::new()),
            navigator: Arc::new(LocationNavigator::default()),
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn session(mut self, session: Arc<AuthSession>) -> Self {
        self.session = session;
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Build a client talking to the network through reqwest.
    pub fn build(self) -> std::result::Result<ApiClient, BuildError> {
        let transport = HttpTransport::new(&self.config.api).map_err(BuildError::Transport)?;
        self.build_with_transport(transport)
    }

    /// Build a client on top of a custom transport service.
    pub fn build_with_transport<T>(self, transport: T) -> std::result::Result<ApiClient, BuildError>
    where
        T: Service<ApiRequest, Response = ApiResponse, Error = ApiError>
            + Clone
            + Send
            + Sync
            + 'static,
        T::Future: Send + 'static,
    {
        let base_url = Url::parse(&self.config.api.base_url)?;
        let policy = CachePolicy::from_config(&self.config.cache)?;
        let store = ResponseStore::new();

        let session_store: Arc<dyn SessionStore> = self.session.clone();
        let classifier = ErrorClassifier::new(
            ErrorTable::from_config(&self.config.errors),
            NotifyDurations::from_config(&self.config.errors.notify),
            self.config.session.login_path.clone(),
            session_store,
            self.navigator,
            self.notifier,
        );

        let service = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(SetRequestHeaderLayer::if_not_present(
                ACCEPT,
                HeaderValue::from_static("application/json"),
            ))
            .layer(ErrorClassifierLayer::new(classifier))
            .layer(ResponseCacheLayer::new(store.clone(), policy))
            .service(transport);

        tracing::debug!(base_url = %base_url, "API client ready");

        Ok(ApiClient {
            service: BoxCloneSyncService::new(service),
            base_url,
            session: self.session,
            store,
        })
    }
}

/// Client for the POS backend.
#[derive(Clone)]
pub struct ApiClient {
    service: BoxCloneSyncService<ApiRequest, ApiResponse, ApiError>,
    base_url: Url,
    session: Arc<AuthSession>,
    store: ResponseStore,
}

impl ApiClient {
    pub fn builder(config: PipelineConfig) -> ApiClientBuilder {
        ApiClientBuilder::new(config)
    }

    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// The response cache owned by this client.
    pub fn cache(&self) -> &ResponseStore {
        &self.store
    }

    /// Absolute URL for `path` with URL-encoded `query` pairs.
    pub fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url =
            Url::parse(&raw).map_err(|e| ApiError::InvalidRequest(format!("{raw}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().copied());
        }
        Ok(url)
    }

    /// Build a request against the backend.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Bytes,
    ) -> Result<ApiRequest> {
        let url = self.url(path, query)?;
        let mut builder = Request::builder().method(method).uri(url.as_str());
        if !body.is_empty() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        builder
            .body(body)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))
    }

    /// Run a request through the pipeline.
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        if !request.headers().contains_key(AUTHORIZATION) {
            if let Some(token) = self.session.token().filter(|t| !t.is_empty()) {
                let value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|e| ApiError::InvalidRequest(format!("invalid token: {e}")))?;
                request.headers_mut().insert(AUTHORIZATION, value);
            }
        }
        self.service.clone().oneshot(request).await
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let request = self.request(Method::GET, path, query, Bytes::new())?;
        decode(&self.send(request).await?)
    }

    /// GET `path` without a user-visible notice on failure.
    pub async fn get_json_silent<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let request = self.request(Method::GET, path, query, Bytes::new())?.silent();
        decode(&self.send(request).await?)
    }

    /// Send `body` as JSON with `method` and decode the JSON answer.
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let body = Bytes::from(body);
        let request = self.request(method, path, &[], body)?;
        decode(&self.send(request).await?)
    }

    /// DELETE `path`, returning the raw response.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        let request = self.request(Method::DELETE, path, &[], Bytes::new())?;
        self.send(request).await
    }

    /// Authenticate and keep the returned credentials on success.
    pub async fn login(
        &self,
        credentials: &LoginRequest,
    ) -> Result<ApiEnvelope<Option<AuthResponse>>> {
        let envelope: ApiEnvelope<Option<AuthResponse>> =
            self.send_json(Method::POST, LOGIN_PATH, credentials).await?;
        if envelope.success {
            if let Some(auth) = &envelope.data {
                tracing::info!(username = %auth.username, role = ?auth.role, "Logged in");
                self.session.store(auth.clone());
            }
        }
        Ok(envelope)
    }

    /// Create an account. The current session is left untouched.
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<ApiEnvelope<Option<AuthResponse>>> {
        self.send_json(Method::POST, REGISTER_PATH, request).await
    }

    /// Product endpoints.
    pub fn products(&self) -> ProductService<'_> {
        ProductService::new(self)
    }

    /// Sales report endpoints.
    pub fn reports(&self) -> ReportService<'_> {
        ReportService::new(self)
    }

    /// Drop the stored credentials. Cached responses are kept.
    pub fn logout(&self) {
        self.session.clear_session();
    }
}

/// Decode a JSON response body.
pub fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T> {
    Ok(serde_json::from_slice(response.body())?)
}
