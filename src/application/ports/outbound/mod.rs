//! Outbound ports - Interfaces that the workflow requires from its host

mod auth_port;
mod navigation_port;
mod storage_port;

pub use auth_port::{AuthError, AuthEvent, AuthProvider, UserSession};
pub use navigation_port::{ConfirmPrompt, NavigationDecision, Router};
pub use storage_port::{SliceStorage, StorageError};
