//! Metrics collection.
//!
//! # Metrics
//! - `pos_client_cache_hits_total` (counter): responses served from cache
//! - `pos_client_cache_misses_total` (counter): cacheable GETs forwarded
//! - `pos_client_cache_invalidations_total` (counter): entries dropped by mutations
//! - `pos_client_request_failures_total` (counter): failures by code and silence
//! - `pos_client_session_expired_total` (counter): 401-triggered logouts
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until the
//!   host installs a recorder

use metrics::counter;

pub fn record_cache_hit() {
    counter!("pos_client_cache_hits_total").increment(1);
}

pub fn record_cache_miss() {
    counter!("pos_client_cache_misses_total").increment(1);
}

pub fn record_cache_invalidation(removed: usize) {
    counter!("pos_client_cache_invalidations_total").increment(removed as u64);
}

pub fn record_failure(code: &str, silent: bool) {
    counter!(
        "pos_client_request_failures_total",
        "code" => code.to_string(),
        "silent" => if silent { "true" } else { "false" }
    )
    .increment(1);
}

pub fn record_session_expired() {
    counter!("pos_client_session_expired_total").increment(1);
}
