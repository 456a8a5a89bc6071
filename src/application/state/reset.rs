//! Reset/discard orchestrator - return every slice to its initial state

use tracing::{info, warn};

use super::Dirtyable;
use crate::application::ports::outbound::StorageError;

/// Outcome of a workflow-wide reset. In-memory state is always reset; slices
/// whose reset could not be persisted are listed in `failures` and are not
/// rolled back, so calling `reset_all` again is the way to retry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResetReport {
    pub reset: Vec<&'static str>,
    pub failures: Vec<(&'static str, StorageError)>,
}

impl ResetReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Reset the slices in the order given. No slice's reset reads another slice,
/// so the order does not affect the result.
pub fn reset_all<'a>(slices: impl IntoIterator<Item = &'a mut dyn Dirtyable>) -> ResetReport {
    let mut report = ResetReport::default();
    for slice in slices {
        let key = slice.key();
        match slice.reset() {
            Ok(()) => report.reset.push(key),
            Err(e) => {
                warn!(key, error = %e, "Slice reset was not persisted");
                report.reset.push(key);
                report.failures.push((key, e));
            }
        }
    }
    info!(
        slices = report.reset.len(),
        failures = report.failures.len(),
        "Workflow reset"
    );
    report
}
