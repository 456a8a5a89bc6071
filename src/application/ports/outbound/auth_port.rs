//! Authentication port - the session source the workflow consumes

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("An account already exists for {0}")]
    AlreadyRegistered(String),
    #[error("Authentication provider error: {0}")]
    Provider(String),
}

/// The signed-in user as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

/// Session-change notifications pushed by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(UserSession),
    SignedOut,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The active session, if any
    async fn current_session(&self) -> Result<Option<UserSession>, AuthError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserSession, AuthError>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserSession, AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}
