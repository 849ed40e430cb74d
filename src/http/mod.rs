//! Request/response primitives shared by every pipeline stage.
//!
//! # Data Flow
//! ```text
//! caller builds ApiRequest (full URL + query, headers, body)
//!     → request.rs (silent marker, cache key, request ID)
//!     → [cache / classifier middleware]
//!     → transport
//!     → ApiResponse, or ApiError for non-2xx / unreachable
//!     → response.rs (immutable snapshot for the cache)
//! ```
//!
//! # Design Decisions
//! - Bodies are `Bytes`: immutable and cheap to clone, so a cached
//!   response can be handed out repeatedly without sharing mutable state
//! - The silent marker is an ordinary header, stripped before transmission

pub mod request;
pub mod response;

use bytes::Bytes;

/// Outgoing request as seen by the pipeline.
pub type ApiRequest = http::Request<Bytes>;

/// Successful response as seen by the pipeline.
pub type ApiResponse = http::Response<Bytes>;

pub use request::{
    cache_key, take_silent_marker, url_without_query, RequestExt, UuidRequestId,
    SILENT_ERROR_HEADER, X_REQUEST_ID,
};
pub use response::ResponseSnapshot;
