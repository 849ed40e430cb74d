//! Error classification subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing request:
//!     → layer.rs (strip silent marker, remember it)
//!     → forward
//!     → success: returned untouched
//!     → failure: classifier.rs
//!         → status 0            → mapping.rs entry for 0
//!         → {errorCode,message} → backend pair, verbatim
//!         → known status        → mapping.rs entry
//!         → otherwise           → fallback mapping
//!     → side effects (401: clear session + redirect; notice unless silent)
//!     → original error re-raised
//! ```
//!
//! # Design Decisions
//! - No retries here; retry policy belongs to the caller
//! - Exactly one notice per failed request, zero when silent
//! - A dropped (cancelled) request is not a failure and notifies nobody

pub mod classifier;
pub mod layer;
pub mod mapping;

pub use classifier::{classify, Classification, ErrorClassifier};
pub use layer::{ErrorClassification, ErrorClassifierLayer};
pub use mapping::{ErrorKind, ErrorMapping, ErrorTable, NotifyDurations};
