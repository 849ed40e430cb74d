//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PipelineConfig (validated, immutable)
//!     → compiled into CachePolicy / ErrorTable / NotifyDurations
//!     → handed to the pipeline once, at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults, and the defaults are the reference policy
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_overrides, load_config, parse_config, ConfigError};
pub use schema::{
    ApiConfig, CacheConfig, ErrorConfig, ErrorMappingConfig, NotifyConfig, ObservabilityConfig,
    PipelineConfig, SessionConfig, StatusMappingConfig, TtlRuleConfig,
};
pub use validation::{validate_config, ValidationError};
