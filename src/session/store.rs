//! Session store: the console's belief about who is logged in.
//!
//! States: `Initializing` until the persisted token has been checked against
//! `/auth/me`, then `Unauthenticated` or `Authenticated`. The token and the
//! profile are only ever set or cleared together.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::claims::TokenClaims;
use super::storage::TokenStorage;
use crate::api::RegistryApi;
use crate::error::{ConsoleError, Result};
use crate::models::{Credentials, UserProfile};

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Initializing,
    Unauthenticated,
    Authenticated { token: String, user: UserProfile },
}

/// Result of login/register. Failures carry a message for the login view
/// instead of an error.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome<T = ()> {
    Success(T),
    Failure { message: String },
}

impl<T> AuthOutcome<T> {
    #[cfg(test)]
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success(_))
    }
}

pub struct SessionStore {
    api: Arc<dyn RegistryApi>,
    storage: Box<dyn TokenStorage>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn RegistryApi>, storage: Box<dyn TokenStorage>) -> Self {
        Self {
            api,
            storage,
            state: RwLock::new(SessionState::Initializing),
        }
    }

    /// Startup check. Validates a persisted token, clearing it on any failure.
    pub async fn initialize(&self) {
        let persisted = match self.storage.load() {
            Ok(token) => token,
            Err(e) => {
                warn!("Could not read persisted session: {}", e);
                None
            }
        };

        let Some(token) = persisted else {
            debug!("No persisted session token");
            *self.state.write() = SessionState::Unauthenticated;
            return;
        };

        if let Some(exp) = TokenClaims::peek(&token).and_then(|c| c.expires_at()) {
            debug!("Persisted token expires at {}", exp);
        }

        match self.api.current_user(&token).await {
            Ok(user) => {
                info!("Restored session for {}", user.username);
                *self.state.write() = SessionState::Authenticated { token, user };
            }
            Err(e) => {
                warn!("Persisted session is no longer valid: {}", e);
                self.logout();
            }
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> AuthOutcome<UserProfile> {
        let credentials = Credentials::new(username, password);

        let token = match self.api.login(&credentials).await {
            Ok(response) => {
                debug!("Received {} token for {}", response.token_type, username);
                response.access_token
            }
            Err(e) => return auth_failure(e, LOGIN_FAILED),
        };

        let user = match self.api.current_user(&token).await {
            Ok(user) => user,
            Err(e) => return auth_failure(e, LOGIN_FAILED),
        };

        // Nothing is persisted unless the whole login went through
        if let Err(e) = self.storage.save(&token) {
            return auth_failure(e, LOGIN_FAILED);
        }

        info!("Logged in as {}", user.username);
        *self.state.write() = SessionState::Authenticated {
            token,
            user: user.clone(),
        };
        AuthOutcome::Success(user)
    }

    /// Registration does not log the new account in.
    pub async fn register(&self, username: &str, password: &str) -> AuthOutcome<UserProfile> {
        let credentials = Credentials::new(username, password);
        match self.api.register(&credentials).await {
            Ok(user) => {
                info!("Registered account {}", user.username);
                AuthOutcome::Success(user)
            }
            Err(e) => auth_failure(e, REGISTRATION_FAILED),
        }
    }

    /// Clear persisted token, in-memory token and profile. Idempotent.
    pub fn logout(&self) {
        if let Err(e) = self.storage.clear() {
            error!("Failed to remove persisted session: {}", e);
        }

        let mut state = self.state.write();
        if matches!(*state, SessionState::Authenticated { .. }) {
            info!("Logged out");
        }
        *state = SessionState::Unauthenticated;
    }

    /// A protected call came back 401: drop the session.
    pub fn handle_unauthorized(&self) {
        warn!("Authorization rejected by the API, clearing session");
        self.logout();
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.state.read(), SessionState::Initializing)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.read(), SessionState::Authenticated { .. })
    }

    pub fn token(&self) -> Option<String> {
        match &*self.state.read() {
            SessionState::Authenticated { token, .. } => Some(token.clone()),
            _ => None,
        }
    }

    pub fn require_token(&self) -> Result<String> {
        self.token().ok_or(ConsoleError::NotAuthenticated)
    }

    pub fn user(&self) -> Option<UserProfile> {
        match &*self.state.read() {
            SessionState::Authenticated { user, .. } => Some(user.clone()),
            _ => None,
        }
    }

    pub fn claims(&self) -> Option<TokenClaims> {
        self.token().and_then(|t| TokenClaims::peek(&t))
    }
}

fn auth_failure<T>(err: ConsoleError, fallback: &str) -> AuthOutcome<T> {
    let message = match &err {
        ConsoleError::Api { detail, .. } if !detail.trim().is_empty() => detail.clone(),
        _ => fallback.to_string(),
    };
    warn!("{}: {}", fallback, err);
    AuthOutcome::Failure { message }
}
