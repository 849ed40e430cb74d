//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Cache and classifier stages produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters via the `metrics` facade)
//!
//! Consumers:
//!     → Whatever subscriber / recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (status, code, silent) rather than formatted strings
//! - The library records metrics but never installs an exporter
//! - Nothing here is required for the pipeline to function

pub mod logging;
pub mod metrics;
