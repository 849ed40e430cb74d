//! Response caching subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing request:
//!     → non-GET: policy.rs resource base → store.rs invalidate → forward
//!     → GET on never-cache endpoint: forward, no read, no write
//!     → GET: store.rs lookup by "METHOD url?query"
//!         → live entry: fresh copy returned, network untouched
//!         → miss: forward → 200 response memoized for policy TTL
//! ```
//!
//! # Design Decisions
//! - Over-invalidation is accepted: a write to `/api/products/5` drops every
//!   key containing `/api/products`
//! - Expiry is lazy (checked on lookup), there is no sweeper task
//! - In-flight requests are not de-duplicated; concurrent misses each hit
//!   the network and each store a consistent result
//! - A dropped (cancelled) request never writes an entry

pub mod layer;
pub mod policy;
pub mod store;

pub use layer::{ResponseCache, ResponseCacheLayer};
pub use policy::{resource_base, CachePolicy, TtlRule};
pub use store::ResponseStore;
