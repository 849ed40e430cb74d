//! Authenticated user state.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::session::SessionStore;

/// User role as assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Cashier,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Left to the backend's default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Credentials returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// In-memory credential store.
#[derive(Debug, Default)]
pub struct AuthSession {
    current: RwLock<Option<AuthResponse>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session holding a bare token, e.g. one supplied on the command line.
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.store(AuthResponse {
            token: token.into(),
            token_type: "Bearer".to_string(),
            username: String::new(),
            email: String::new(),
            role: Role::Cashier,
        });
        session
    }

    /// Replace the stored credentials.
    pub fn store(&self, auth: AuthResponse) {
        match self.current.write() {
            Ok(mut guard) => *guard = Some(auth),
            Err(poisoned) => *poisoned.into_inner() = Some(auth),
        }
    }

    pub fn current_user(&self) -> Option<AuthResponse> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.current_user().map(|user| user.token)
    }

    pub fn username(&self) -> Option<String> {
        self.current_user().map(|user| user.username)
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user().map(|user| user.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    pub fn is_admin_or_manager(&self) -> bool {
        matches!(self.role(), Some(Role::Admin | Role::Manager))
    }
}

impl SessionStore for AuthSession {
    fn clear_session(&self) {
        match self.current.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    fn is_logged_in(&self) -> bool {
        self.token().is_some_and(|token| !token.is_empty())
    }
}
