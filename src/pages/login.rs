//! Admin login view (`/admin/login`)

use std::sync::Arc;

use crate::models::UserProfile;
use crate::routes::Route;
use crate::session::{AuthOutcome, SessionStore};

pub struct LoginPage {
    session: Arc<SessionStore>,
    error: Option<String>,
}

impl LoginPage {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            error: None,
        }
    }

    /// An already logged-in visitor is sent straight on to the dashboard
    pub fn redirect_if_authenticated(&self) -> Option<Route> {
        self.session
            .is_authenticated()
            .then_some(Route::AdminDashboard)
    }

    /// Submit the form. On success returns the route to navigate to; on
    /// failure the message is kept for `error()`.
    pub async fn submit(&mut self, username: &str, password: &str) -> Option<(Route, UserProfile)> {
        self.error = None;

        if username.trim().is_empty() || password.is_empty() {
            self.error = Some("Enter a username and password".to_string());
            return None;
        }

        match self.session.login(username.trim(), password).await {
            AuthOutcome::Success(user) => Some((Route::AdminDashboard, user)),
            AuthOutcome::Failure { message } => {
                self.error = Some(message);
                None
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStorage;
    use crate::test_support::{FakeRegistry, ADMIN_PASSWORD, ADMIN_USER};

    async fn page() -> (Arc<FakeRegistry>, LoginPage) {
        let api = Arc::new(FakeRegistry::new());
        let session = Arc::new(SessionStore::new(api.clone(), Box::new(MemoryTokenStorage::new())));
        session.initialize().await;
        (api, LoginPage::new(session))
    }

    #[tokio::test]
    async fn test_successful_login_navigates_to_dashboard() {
        let (_, mut page) = page().await;
        assert_eq!(page.redirect_if_authenticated(), None);

        let (route, user) = page.submit(ADMIN_USER, ADMIN_PASSWORD).await.unwrap();
        assert_eq!(route, Route::AdminDashboard);
        assert_eq!(user.username, ADMIN_USER);
        assert_eq!(page.error(), None);
        assert_eq!(page.redirect_if_authenticated(), Some(Route::AdminDashboard));
    }

    #[tokio::test]
    async fn test_failed_login_shows_server_message() {
        let (_, mut page) = page().await;

        assert!(page.submit(ADMIN_USER, "nope").await.is_none());
        assert_eq!(page.error(), Some("Incorrect username or password"));
    }

    #[tokio::test]
    async fn test_blank_fields_do_not_hit_the_api() {
        let (api, mut page) = page().await;

        assert!(page.submit("  ", "pw").await.is_none());
        assert!(page.submit(ADMIN_USER, "").await.is_none());
        assert_eq!(api.calls("login"), 0);
        assert!(page.error().is_some());
    }
}
