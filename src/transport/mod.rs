//! Network transport.
//!
//! # Responsibilities
//! - Perform the actual HTTP exchange (the `forward` call of every stage)
//! - Buffer the full response body
//! - Turn non-2xx responses into `ApiError::Status`
//!
//! # Design Decisions
//! - Connect errors and client-side timeouts become `ApiError::Unreachable`
//!   (status 0), matching what the classifier calls "no response"
//! - No retries at this level

use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::future::BoxFuture;
use http::Response;
use tower::Service;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{ApiRequest, ApiResponse};

/// reqwest-backed transport service.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with the configured timeouts and user agent.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn execute(
        client: reqwest::Client,
        request: ApiRequest,
    ) -> Result<ApiResponse, ApiError> {
        let method = request.method().clone();
        let uri = request.uri().to_string();
        let request = reqwest::Request::try_from(request).map_err(ApiError::from_transport)?;

        tracing::trace!(method = %method, uri = %uri, "Sending request");
        let response = client.execute(request).await.map_err(ApiError::from_transport)?;

        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(ApiError::from_transport)?;

        tracing::trace!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            "Received response"
        );

        if !status.is_success() {
            return Err(ApiError::Status { status, headers, body });
        }

        let mut out = Response::new(body);
        *out.status_mut() = status;
        *out.version_mut() = version;
        *out.headers_mut() = headers;
        Ok(out)
    }
}

impl Service<ApiRequest> for HttpTransport {
    type Response = ApiResponse;
    type Error = ApiError;
    type Future = BoxFuture<'static, Result<ApiResponse, ApiError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: ApiRequest) -> Self::Future {
        Box::pin(Self::execute(self.client.clone(), request))
    }
}
