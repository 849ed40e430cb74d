//! Error taxonomy and the status → (code, message) table.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::config::{ErrorConfig, NotifyConfig};

/// Coarse failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response reached the client, or the request timed out.
    NetworkUnreachable,
    /// 401: missing or expired session.
    AuthExpired,
    Forbidden,
    NotFound,
    RateLimited,
    /// Any 5xx.
    ServerError,
    Unknown,
}

impl ErrorKind {
    /// Category for a numeric status; `None` means no network exchange happened.
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(0) | Some(408) => ErrorKind::NetworkUnreachable,
            Some(401) => ErrorKind::AuthExpired,
            Some(403) => ErrorKind::Forbidden,
            Some(404) => ErrorKind::NotFound,
            Some(429) => ErrorKind::RateLimited,
            Some(500..=599) => ErrorKind::ServerError,
            _ => ErrorKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NetworkUnreachable => "network_unreachable",
            ErrorKind::AuthExpired => "auth_expired",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::ServerError => "server_error",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// Stable code and human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMapping {
    pub code: String,
    pub message: String,
}

impl ErrorMapping {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Status-keyed mapping table with a fallback for unknown statuses.
#[derive(Debug, Clone)]
pub struct ErrorTable {
    entries: HashMap<u16, ErrorMapping>,
    fallback: ErrorMapping,
    server_down: HashSet<u16>,
}

impl ErrorTable {
    pub fn new(
        entries: HashMap<u16, ErrorMapping>,
        fallback: ErrorMapping,
        server_down: HashSet<u16>,
    ) -> Self {
        Self {
            entries,
            fallback,
            server_down,
        }
    }

    pub fn from_config(config: &ErrorConfig) -> Self {
        let entries = config
            .mappings
            .iter()
            .map(|m| (m.status, ErrorMapping::new(&m.code, &m.message)))
            .collect();
        Self::new(
            entries,
            ErrorMapping::new(&config.fallback.code, &config.fallback.message),
            config.server_down_statuses.iter().copied().collect(),
        )
    }

    /// Mapping for `status`, if the table has one.
    pub fn get(&self, status: u16) -> Option<&ErrorMapping> {
        self.entries.get(&status)
    }

    /// Mapping for `status`, or the fallback.
    pub fn lookup(&self, status: Option<u16>) -> &ErrorMapping {
        status
            .and_then(|s| self.entries.get(&s))
            .unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &ErrorMapping {
        &self.fallback
    }

    /// Whether `status` means the server is down or unreachable.
    pub fn is_server_down(&self, status: Option<u16>) -> bool {
        status.is_some_and(|s| self.server_down.contains(&s))
    }
}

impl Default for ErrorTable {
    fn default() -> Self {
        Self::from_config(&ErrorConfig::default())
    }
}

/// How long each kind of notice stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyDurations {
    pub auth_expired: Duration,
    pub server_down: Duration,
    pub default: Duration,
}

impl NotifyDurations {
    pub fn from_config(config: &NotifyConfig) -> Self {
        Self {
            auth_expired: Duration::from_millis(config.auth_expired_ms),
            server_down: Duration::from_millis(config.server_down_ms),
            default: Duration::from_millis(config.default_ms),
        }
    }
}

impl Default for NotifyDurations {
    fn default() -> Self {
        Self::from_config(&NotifyConfig::default())
    }
}
