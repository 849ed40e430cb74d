//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files, and
//! every `Default` carries the reference policy.

use serde::{Deserialize, Serialize};

/// Root configuration for the client pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    /// Backend location and transport settings.
    pub api: ApiConfig,

    /// Response cache policy.
    pub cache: CacheConfig,

    /// Error classification policy.
    pub errors: ErrorConfig,

    /// Session handling.
    pub session: SessionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend location and transport settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is joined onto.
    pub base_url: String,

    /// Total request timeout in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 5,
            user_agent: concat!("pos-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// A single (pattern, TTL) rule. Rules are evaluated in order.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TtlRuleConfig {
    /// Regular expression matched against the URL without its query string.
    pub pattern: String,

    /// Time to live in milliseconds.
    pub ttl_ms: u64,
}

impl TtlRuleConfig {
    fn new(pattern: &str, ttl_ms: u64) -> Self {
        Self {
            pattern: pattern.to_string(),
            ttl_ms,
        }
    }
}

/// Response cache policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL used when no rule matches, in milliseconds.
    pub default_ttl_ms: u64,

    /// Ordered TTL rules; first match wins.
    pub ttl_rules: Vec<TtlRuleConfig>,

    /// URL fragments that are never cached (auth, binary images, health).
    pub skip_prefixes: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_ms: 30_000,
            ttl_rules: vec![
                TtlRuleConfig::new(r"/stats$", 60_000),
                // categories change rarely
                TtlRuleConfig::new(r"/categories", 120_000),
                TtlRuleConfig::new(r"/customers", 30_000),
                TtlRuleConfig::new(r"/products", 30_000),
                TtlRuleConfig::new(r"/inventory", 30_000),
                TtlRuleConfig::new(r"/orders", 20_000),
                TtlRuleConfig::new(r"/users", 60_000),
                TtlRuleConfig::new(r"/reports", 60_000),
            ],
            skip_prefixes: vec![
                "/api/auth".to_string(),
                "/api/images".to_string(),
                "/actuator".to_string(),
            ],
        }
    }
}

/// Stable code and human-readable message for a failure.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorMappingConfig {
    pub code: String,
    pub message: String,
}

/// Status-keyed entry of the error table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct StatusMappingConfig {
    /// HTTP status; `0` means no response reached the client.
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl StatusMappingConfig {
    fn new(status: u16, code: &str, message: &str) -> Self {
        Self {
            status,
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// Error classification policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorConfig {
    /// Well-known statuses and their mappings.
    pub mappings: Vec<StatusMappingConfig>,

    /// Mapping used for statuses absent from `mappings`.
    pub fallback: ErrorMappingConfig,

    /// Statuses meaning the server is down or unreachable.
    pub server_down_statuses: Vec<u16>,

    /// Notification display durations.
    pub notify: NotifyConfig,
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self {
            mappings: vec![
                StatusMappingConfig::new(
                    0,
                    "NW001",
                    "Cannot reach the server. Please check your connection and try again.",
                ),
                StatusMappingConfig::new(
                    401,
                    "AU003",
                    "Your session has expired. Please log in again.",
                ),
                StatusMappingConfig::new(
                    403,
                    "AU004",
                    "You do not have permission to perform this action.",
                ),
                StatusMappingConfig::new(404, "GN001", "The requested resource was not found."),
                StatusMappingConfig::new(
                    408,
                    "NW002",
                    "Request timed out. Please check your connection.",
                ),
                StatusMappingConfig::new(
                    429,
                    "NW003",
                    "Too many requests. Please slow down and try again.",
                ),
                StatusMappingConfig::new(
                    500,
                    "SV001",
                    "An unexpected server error occurred. Please try again.",
                ),
                StatusMappingConfig::new(
                    502,
                    "NW001",
                    "Cannot reach the server. Please try again in a moment.",
                ),
                StatusMappingConfig::new(
                    503,
                    "NW001",
                    "Service is temporarily unavailable. Please try again in a moment.",
                ),
                StatusMappingConfig::new(
                    504,
                    "NW001",
                    "The server took too long to respond. Please try again.",
                ),
            ],
            fallback: ErrorMappingConfig {
                code: "SV001".to_string(),
                message: "An unexpected error occurred.".to_string(),
            },
            server_down_statuses: vec![0, 502, 503, 504],
            notify: NotifyConfig::default(),
        }
    }
}

/// Notification display durations in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Shown briefly; a redirect to the login page follows immediately.
    pub auth_expired_ms: u64,

    /// Used for `server_down_statuses`.
    pub server_down_ms: u64,

    /// Used for every other failure.
    pub default_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            auth_expired_ms: 3_000,
            server_down_ms: 6_000,
            default_ms: 5_000,
        }
    }
}

/// Session handling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Location the user is sent to when the session expires.
    pub login_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
