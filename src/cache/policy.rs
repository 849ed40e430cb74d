//! Cache policy: which URLs are cached and for how long.
//!
//! # Responsibilities
//! - Resolve the TTL for a URL from an ordered rule list (first match wins)
//! - Exclude never-cache endpoints (auth, binary images, health)
//! - Derive the resource base a mutation invalidates
//!
//! # Design Decisions
//! - Rules are data, compiled once from config; control flow never changes
//! - Patterns are matched against the URL without its query string

use std::time::Duration;

use regex::Regex;

use crate::config::CacheConfig;

/// One (pattern, TTL) rule.
#[derive(Debug, Clone)]
pub struct TtlRule {
    pattern: Regex,
    ttl: Duration,
}

impl TtlRule {
    pub fn new(pattern: Regex, ttl: Duration) -> Self {
        Self { pattern, ttl }
    }

    pub fn matches(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Immutable caching policy.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    rules: Vec<TtlRule>,
    default_ttl: Duration,
    skip_prefixes: Vec<String>,
}

impl CachePolicy {
    pub fn new(rules: Vec<TtlRule>, default_ttl: Duration, skip_prefixes: Vec<String>) -> Self {
        Self {
            rules,
            default_ttl,
            skip_prefixes,
        }
    }

    /// Compile a policy from configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self, regex::Error> {
        let rules = config
            .ttl_rules
            .iter()
            .map(|rule| {
                Ok(TtlRule::new(
                    Regex::new(&rule.pattern)?,
                    Duration::from_millis(rule.ttl_ms),
                ))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self::new(
            rules,
            Duration::from_millis(config.default_ttl_ms),
            config.skip_prefixes.clone(),
        ))
    }

    /// TTL of the first matching rule, or the default TTL.
    pub fn resolve_ttl(&self, url: &str) -> Duration {
        self.rules
            .iter()
            .find(|rule| rule.matches(url))
            .map_or(self.default_ttl, TtlRule::ttl)
    }

    /// Whether `url` belongs to a never-cache endpoint.
    pub fn is_excluded(&self, url: &str) -> bool {
        self.skip_prefixes.iter().any(|prefix| url.contains(prefix.as_str()))
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        let config = CacheConfig::default();
        let rules = config
            .ttl_rules
            .iter()
            .filter_map(|rule| {
                Regex::new(&rule.pattern)
                    .ok()
                    .map(|pattern| TtlRule::new(pattern, Duration::from_millis(rule.ttl_ms)))
            })
            .collect();
        Self::new(
            rules,
            Duration::from_millis(config.default_ttl_ms),
            config.skip_prefixes,
        )
    }
}

/// Strip a trailing numeric path segment and everything after it.
///
/// `/api/products/5/image` → `/api/products`. Paths without a numeric
/// segment are returned unchanged.
pub fn resource_base(path: &str) -> &str {
    path.as_bytes()
        .windows(2)
        .position(|w| w[0] == b'/' && w[1].is_ascii_digit())
        .map_or(path, |index| &path[..index])
}
