//! Failure classification and side-effect dispatch.
//!
//! # Responsibilities
//! - Reduce a failure to a stable (code, message) pair
//! - Terminate the session and redirect on 401, silent or not
//! - Show at most one notice per failed request, none when silent
//!
//! # Design Decisions
//! - The backend's own error body wins over the local table, except for
//!   status 0 where no body can exist
//! - Silence governs visibility only, never the 401 redirect

use std::sync::Arc;

use serde_json::Value;

use crate::classify::mapping::{ErrorKind, ErrorMapping, ErrorTable, NotifyDurations};
use crate::error::ApiError;
use crate::observability::metrics;
use crate::session::{Navigator, Notice, Notifier, SessionStore};

const UNAUTHORIZED: u16 = 401;

/// Outcome of classifying one failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Status as reported by the failure; `Some(0)` = unreachable.
    pub status: Option<u16>,
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
}


/// `{errorCode, message}` from the backend body. The code may be a
/// string or a number; both fields must be non-empty.
fn backend_mapping(error: &ApiError) -> Option<ErrorMapping> {
    let body: Value = serde_json::from_slice(error.body()?).ok()?;
    let code = match body.get("errorCode")? {
        Value::String(code) if !code.is_empty() => code.clone(),
        Value::Number(code) => code.to_string(),
        _ => return None,
    };
    match body.get("message")? {
        Value::String(message) if !message.is_empty() => {
            Some(ErrorMapping::new(code, message.clone()))
        }
        _ => None,
    }
}

/// Classify a failure against `table`.
pub fn classify(table: &ErrorTable, error: &ApiError) -> Classification {
    let status = error.status_code();
    let mapping = match status {
        Some(0) => table.lookup(Some(0)).clone(),
        _ => backend_mapping(error).unwrap_or_else(|| table.lookup(status).clone()),
    };
    Classification {
        status,
        kind: ErrorKind::from_status(status),
        code: mapping.code,
        message: mapping.message,
    }
}

/// Classifies failures and performs the resulting side effects.
#[derive(Clone)]
pub struct ErrorClassifier {
    table: Arc<ErrorTable>,
    durations: NotifyDurations,
    login_path: String,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl ErrorClassifier {
    pub fn new(
        table: ErrorTable,
        durations: NotifyDurations,
        login_path: impl Into<String>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            table: Arc::new(table),
            durations,
            login_path: login_path.into(),
            session,
            navigator,
            notifier,
        }
    }

    pub fn table(&self) -> &ErrorTable {
        &self.table
    }

    /// Classify `error` and run its side effects. The error itself is left
    /// for the caller to re-raise.
    pub fn handle_failure(&self, error: &ApiError, silent: bool) -> Classification {
        let classification = classify(&self.table, error);

        tracing::warn!(
            status = ?classification.status,
            kind = classification.kind.as_str(),
            code = %classification.code,
            silent,
            error = %error,
            "Request failed"
        );
        metrics::record_failure(&classification.code, silent);

        if classification.status == Some(UNAUTHORIZED) {
            self.expire_session(silent);
        } else if !silent {
            let duration = if self.table.is_server_down(classification.status) {
                self.durations.server_down
            } else {
                self.durations.default
            };
            self.notifier.notify(&Notice {
                code: classification.code.clone(),
                message: classification.message.clone(),
                duration,
            });
        }

        classification
    }

    fn expire_session(&self, silent: bool) {
        tracing::info!(login_path = %self.login_path, "Session expired, redirecting to login");
        metrics::record_session_expired();

        self.session.clear_session();
        self.navigator.go_to(&self.login_path);

        if !silent {
            let mapping = self.table.lookup(Some(UNAUTHORIZED));
            self.notifier.notify(&Notice {
                code: mapping.code.clone(),
                message: mapping.message.clone(),
                duration: self.durations.auth_expired,
            });
        }
    }
}

impl std::fmt::Debug for ErrorClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorClassifier")
            .field("table", &self.table)
            .field("durations", &self.durations)
            .field("login_path", &self.login_path)
            .finish_non_exhaustive()
    }
}
