//! In-memory authentication provider
//!
//! Stands in for the hosted auth service during development and in tests.
//! Accounts live only as long as the process.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::application::ports::outbound::{AuthError, AuthEvent, AuthProvider, UserSession};

const MIN_PASSWORD_LEN: usize = 8;
const EVENT_CAPACITY: usize = 16;

struct Account {
    user_id: String,
    password: String,
}

pub struct InMemoryAuthProvider {
    accounts: RwLock<HashMap<String, Account>>,
    session: RwLock<Option<UserSession>>,
    events: broadcast::Sender<AuthEvent>,
}

impl Default for InMemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            accounts: RwLock::new(HashMap::new()),
            session: RwLock::new(None),
            events,
        }
    }

    async fn start_session(&self, user_id: String, email: String) -> UserSession {
        let session = UserSession {
            user_id,
            email,
            signed_in_at: Utc::now(),
        };
        *self.session.write().await = Some(session.clone());
        // No subscribers is fine
        let _ = self.events.send(AuthEvent::SignedIn(session.clone()));
        session
    }
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((user, domain)) if !user.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AuthError::InvalidCredentials(format!("{email:?} is not an email address"))),
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn current_session(&self) -> Result<Option<UserSession>, AuthError> {
        Ok(self.session.read().await.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserSession, AuthError> {
        let email = normalize_email(email)?;
        let user_id = {
            let accounts = self.accounts.read().await;
            match accounts.get(&email) {
                Some(account) if account.password == password => account.user_id.clone(),
                _ => {
                    return Err(AuthError::InvalidCredentials(
                        "email or password is incorrect".to_string(),
                    ))
                }
            }
        };
        Ok(self.start_session(user_id, email).await)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<UserSession, AuthError> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidCredentials(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let user_id = {
            let mut accounts = self.accounts.write().await;
            if accounts.contains_key(&email) {
                return Err(AuthError::AlreadyRegistered(email));
            }
            let user_id = Uuid::new_v4().to_string();
            accounts.insert(
                email.clone(),
                Account {
                    user_id: user_id.clone(),
                    password: password.to_string(),
                },
            );
            user_id
        };
        Ok(self.start_session(user_id, email).await)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.session.write().await.take().is_some() {
            let _ = self.events.send(AuthEvent::SignedOut);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
