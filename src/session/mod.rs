//! Session and user-facing side effects.
//!
//! The error classifier never talks to a UI directly. It is handed three
//! capabilities at construction:
//!
//! - [`SessionStore`]: credential storage, cleared when the session expires
//! - [`Navigator`]: moves the user to another location (the login page)
//! - [`Notifier`]: shows a transient message for a given duration
//!
//! [`AuthSession`] is the in-memory credential store used by the API client;
//! [`TracingNotifier`] and [`LocationNavigator`] are headless sinks suitable
//! for command-line hosts.

pub mod auth;
pub mod sinks;

use std::fmt;
use std::time::Duration;

pub use auth::{AuthResponse, AuthSession, LoginRequest, RegisterRequest, Role};
pub use sinks::{LocationNavigator, TracingNotifier};

/// Storage for the current user's credentials.
pub trait SessionStore: Send + Sync {
    /// Drop stored credentials.
    fn clear_session(&self);

    /// Whether credentials are currently held.
    fn is_logged_in(&self) -> bool;
}

/// Moves the user to another location.
pub trait Navigator: Send + Sync {
    fn go_to(&self, path: &str);
}

/// User-visible notification sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// A user-visible failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Stable error code, e.g. `AU004`.
    pub code: String,
    pub message: String,
    /// How long the message stays on screen.
    pub duration: Duration,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
