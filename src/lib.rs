//! Novel Wizard core - workflow state for the multi-step novel creation wizard
//!
//! Persisted, dirty-tracked slices of wizard state, the debounced auto-save
//! that flushes them, and the guards that stop unsaved work from being lost
//! when the user leaves.

pub mod application;
pub mod domain;
pub mod infrastructure;
