//! Application layer - Workflow state coordination and use cases
//!
//! This layer contains:
//! - Ports: storage, authentication, routing and confirmation interfaces
//! - State: persisted slices, dirty aggregation, auto-save and reset
//! - Services: navigation guard, session gate and the workflow runtime

pub mod ports;
pub mod services;
pub mod state;
