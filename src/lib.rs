//! POS backend client library
//!
//! Every request to the backend passes through one pipeline:
//!
//! ```text
//! ApiClient
//!   → request id / accept headers (tower-http)
//!   → classify::ErrorClassification   failures → code, message, notice, session expiry
//!   → cache::ResponseCache            GET memoization, mutation invalidation
//!   → transport::HttpTransport        reqwest
//! ```

pub mod cache;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod session;
pub mod testing;
pub mod transport;

pub use client::{ApiClient, ApiClientBuilder, ApiEnvelope, BuildError, Page};
pub use config::PipelineConfig;
pub use error::{ApiError, Result};
pub use crate::http::{ApiRequest, ApiResponse, RequestExt};
