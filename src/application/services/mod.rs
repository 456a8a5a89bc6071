//! Application services - Use cases that sit on top of the workflow state
//!
//! The navigation guard and session gate talk to the host through outbound
//! ports; the workflow runtime owns the workflow and drives auto-save.

pub mod navigation_guard;
pub mod session_gate;
pub mod workflow_runtime;

pub use navigation_guard::{BeforeUnloadEvent, NavigationGuard, NavigationOutcome};
pub use session_gate::SessionGate;
pub use workflow_runtime::{RuntimeError, WorkflowHandle, WorkflowStatus};
