//! Session gate - the workflow is only reachable with an authenticated session

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::ports::outbound::{AuthError, AuthEvent, AuthProvider, Router, UserSession};

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_SIGN_OUT_REDIRECT: &str = "/";

#[derive(Clone)]
pub struct SessionGate {
    auth: Arc<dyn AuthProvider>,
    router: Arc<dyn Router>,
    login_path: String,
    sign_out_redirect: String,
}

impl SessionGate {
    pub fn new(auth: Arc<dyn AuthProvider>, router: Arc<dyn Router>) -> Self {
        Self {
            auth,
            router,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            sign_out_redirect: DEFAULT_SIGN_OUT_REDIRECT.to_string(),
        }
    }

    pub fn with_paths(mut self, login_path: impl Into<String>, sign_out_redirect: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self.sign_out_redirect = sign_out_redirect.into();
        self
    }

    /// Provider errors count as "no session"
    pub async fn has_active_session(&self) -> bool {
        match self.auth.current_session().await {
            Ok(session) => session.is_some(),
            Err(e) => {
                warn!(error = %e, "Session lookup failed");
                false
            }
        }
    }

    /// The active session, or a redirect to the login page
    pub async fn require_session(&self) -> Option<UserSession> {
        match self.auth.current_session().await {
            Ok(Some(session)) => Some(session),
            Ok(None) => {
                debug!(login = %self.login_path, "No session, redirecting to login");
                self.router.navigate(&self.login_path);
                None
            }
            Err(e) => {
                warn!(error = %e, "Session lookup failed, redirecting to login");
                self.router.navigate(&self.login_path);
                None
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserSession, AuthError> {
        let session = self.auth.sign_in(email, password).await?;
        info!(user_id = %session.user_id, "Signed in");
        Ok(session)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<UserSession, AuthError> {
        let session = self.auth.sign_up(email, password).await?;
        info!(user_id = %session.user_id, "Account created");
        Ok(session)
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.auth.sign_out().await?;
        self.router.navigate(&self.sign_out_redirect);
        Ok(())
    }

    /// Follow the provider's session events and leave the workflow when the
    /// session ends elsewhere (another tab, token expiry).
    pub fn watch_sign_out(&self) -> JoinHandle<()> {
        let mut events = self.auth.subscribe();
        let router = self.router.clone();
        let redirect = self.sign_out_redirect.clone();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AuthEvent::SignedOut) => {
                        info!("Session ended, leaving workflow");
                        router.navigate(&redirect);
                    }
                    Ok(AuthEvent::SignedIn(session)) => {
                        debug!(user_id = %session.user_id, "Session started");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Session watcher lagged behind auth events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::auth::InMemoryAuthProvider;
    use crate::infrastructure::router::HistoryRouter;

    fn gate() -> (SessionGate, Arc<InMemoryAuthProvider>, Arc<HistoryRouter>) {
        let auth = Arc::new(InMemoryAuthProvider::new());
        let router = Arc::new(HistoryRouter::new("/create"));
        (SessionGate::new(auth.clone(), router.clone()), auth, router)
    }

    #[tokio::test]
    async fn test_require_session_redirects_to_login() {
        let (gate, _, router) = gate();
        assert!(!gate.has_active_session().await);
        assert!(gate.require_session().await.is_none());
        assert_eq!(router.current(), DEFAULT_LOGIN_PATH);
    }

    #[tokio::test]
    async fn test_signed_in_user_passes() {
        let (gate, _, router) = gate();
        gate.sign_up("writer@example.com", "correct horse").await.unwrap();
        let session = gate.require_session().await.unwrap();
        assert_eq!(session.email, "writer@example.com");
        assert_eq!(router.current(), "/create");
    }

    #[tokio::test]
    async fn test_sign_out_redirects() {
        let (gate, _, router) = gate();
        let gate = gate.with_paths("/auth", "/goodbye");
        gate.sign_up("writer@example.com", "correct horse").await.unwrap();
        gate.sign_out().await.unwrap();
        assert!(!gate.has_active_session().await);
        assert_eq!(router.current(), "/goodbye");
    }

    #[tokio::test]
    async fn test_watcher_follows_external_sign_out() {
        let (gate, auth, router) = gate();
        let watcher = gate.watch_sign_out();
        gate.sign_up("writer@example.com", "correct horse").await.unwrap();

        // Signed out by the provider, not through the gate
        auth.sign_out().await.unwrap();
        for _ in 0..50 {
            if router.current() == DEFAULT_SIGN_OUT_REDIRECT {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(router.current(), DEFAULT_SIGN_OUT_REDIRECT);
        watcher.abort();
    }
}
