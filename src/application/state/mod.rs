//! Workflow state - persisted slices and the coordinators that work across them

pub mod aggregator;
pub mod autosave;
pub mod reset;
mod slice;
mod workflow;

pub use autosave::{AutoSaveCoordinator, AutoSaveState, AUTOSAVE_INTERVAL};
pub use reset::ResetReport;
pub use slice::{Dirtyable, Slice, SCHEMA_VERSION};
pub use workflow::{GenerationStatus, NovelBlueprint, NovelWorkflow, SLICE_COUNT};
