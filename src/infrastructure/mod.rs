//! Infrastructure layer - Adapters for the outbound ports and app wiring
//!
//! This layer contains:
//! - Storage: in-memory and JSON-file slice storage
//! - Auth: in-memory authentication provider
//! - Router / Prompt: navigation adapters for a terminal host
//! - Config: Application configuration
//! - State: Shared application state

pub mod auth;
pub mod config;
pub mod prompt;
pub mod router;
pub mod state;
pub mod storage;
