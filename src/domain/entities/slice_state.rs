//! The contract every per-step state type fulfils to be held in a slice

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::errors::ValidationError;

/// Field set of one independently persisted unit of workflow state.
///
/// `KEY` doubles as the storage key, so it must be unique across the workflow.
pub trait SliceState:
    Clone + Default + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KEY: &'static str;

    /// Canonical value the slice starts from and returns to on reset
    fn initial() -> Self {
        Self::default()
    }

    /// Whole-state invariants, checked after merges and on load
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Repair dependent fields after a raw field merge, given the state before
    /// it and the names of the fields the merge set
    fn reconcile(&mut self, _previous: &Self, _patched: &[String]) {}

    /// Whether the wizard step backed by this state has enough input to move on
    fn can_continue(&self) -> bool {
        true
    }
}
