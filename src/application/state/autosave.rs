//! Auto-save coordinator - debounced flush of the whole workflow
//!
//! Two states: `Idle` (nothing pending) and `Armed` (a flush is due at
//! `deadline`). Every observed mutation while dirty pushes the deadline to a
//! full interval after that mutation, so the flush only happens after a quiet
//! period. The coordinator is a plain state machine over explicit instants;
//! the workflow runtime feeds it the clock and the timer.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use super::Dirtyable;

/// Quiet period after the last mutation before the workflow is flushed
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_millis(30_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoSaveState {
    Idle,
    Armed { armed_at: Instant, deadline: Instant },
}

#[derive(Debug)]
pub struct AutoSaveCoordinator {
    interval: Duration,
    state: AutoSaveState,
    last_revision: u64,
    flushes: u64,
}

impl Default for AutoSaveCoordinator {
    fn default() -> Self {
        Self::new(AUTOSAVE_INTERVAL)
    }
}

impl AutoSaveCoordinator {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: AutoSaveState::Idle,
            last_revision: 0,
            flushes: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> AutoSaveState {
        self.state
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            AutoSaveState::Idle => None,
            AutoSaveState::Armed { deadline, .. } => Some(deadline),
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, AutoSaveState::Armed { .. })
    }

    /// Number of flushes performed by the timer so far
    pub fn flushes(&self) -> u64 {
        self.flushes
    }

    /// Record the workflow's state after an event.
    ///
    /// - clean workflow: nothing to save, back to `Idle`
    /// - dirty and `Idle`: arm
    /// - dirty and `Armed` with a new revision: re-arm from `now`
    pub fn observe(&mut self, now: Instant, dirty: bool, revision: u64) -> AutoSaveState {
        let mutated = revision != self.last_revision;
        self.last_revision = revision;

        if !dirty {
            if self.is_armed() {
                debug!("Workflow clean, auto-save disarmed");
            }
            self.state = AutoSaveState::Idle;
        } else if !self.is_armed() || mutated {
            let deadline = now + self.interval;
            self.state = AutoSaveState::Armed {
                armed_at: now,
                deadline,
            };
            debug!(revision, "Auto-save armed");
        }
        self.state
    }

    /// Flush if the deadline has passed. Returns whether a flush happened.
    pub fn fire_if_due<'a>(
        &mut self,
        now: Instant,
        slices: impl IntoIterator<Item = &'a mut dyn Dirtyable>,
    ) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                let cleaned = flush(slices);
                self.state = AutoSaveState::Idle;
                self.flushes += 1;
                info!(cleaned, "Auto-save flushed workflow");
                true
            }
            _ => false,
        }
    }

    /// Drop any pending flush without saving (owner torn down)
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.is_armed();
        if was_armed {
            debug!("Pending auto-save cancelled");
        }
        self.state = AutoSaveState::Idle;
        was_armed
    }
}

/// Mark every slice clean in one pass. Returns how many were dirty.
pub fn flush<'a>(slices: impl IntoIterator<Item = &'a mut dyn Dirtyable>) -> usize {
    let mut cleaned = 0;
    for slice in slices {
        if slice.is_dirty() {
            cleaned += 1;
        }
        slice.mark_clean();
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::StorageError;

    #[derive(Default)]
    struct Flag {
        dirty: bool,
        revision: u64,
    }

    impl Flag {
        fn touch(&mut self) {
            self.dirty = true;
            self.revision += 1;
        }
    }

    impl Dirtyable for Flag {
        fn key(&self) -> &'static str {
            "flag"
        }
        fn is_dirty(&self) -> bool {
            self.dirty
        }
        fn mark_clean(&mut self) {
            self.dirty = false;
        }
        fn reset(&mut self) -> Result<(), StorageError> {
            self.dirty = false;
            Ok(())
        }
        fn revision(&self) -> u64 {
            self.revision
        }
        fn can_continue(&self) -> bool {
            true
        }
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_arms_when_dirty_and_flushes_after_interval() {
        let start = Instant::now();
        let mut coordinator = AutoSaveCoordinator::default();
        let mut flags = [Flag::default(), Flag::default()];

        flags[0].touch();
        coordinator.observe(start, true, 1);
        assert_eq!(coordinator.deadline(), Some(start + AUTOSAVE_INTERVAL));

        let slices = flags.iter_mut().map(|f| f as &mut dyn Dirtyable);
        assert!(!coordinator.fire_if_due(start + secs(29), slices));

        let slices = flags.iter_mut().map(|f| f as &mut dyn Dirtyable);
        assert!(coordinator.fire_if_due(start + secs(30), slices));
        assert!(flags.iter().all(|f| !f.dirty));
        assert_eq!(coordinator.state(), AutoSaveState::Idle);
        assert_eq!(coordinator.flushes(), 1);
    }

    #[test]
    fn test_further_mutation_restarts_the_interval() {
        let start = Instant::now();
        let mut coordinator = AutoSaveCoordinator::default();

        coordinator.observe(start, true, 1);
        coordinator.observe(start + secs(20), true, 2);
        assert_eq!(coordinator.deadline(), Some(start + secs(50)));

        // A read-only event at the same revision does not move the deadline
        coordinator.observe(start + secs(25), true, 2);
        assert_eq!(coordinator.deadline(), Some(start + secs(50)));
    }

    #[test]
    fn test_clean_workflow_disarms() {
        let start = Instant::now();
        let mut coordinator = AutoSaveCoordinator::new(secs(5));
        coordinator.observe(start, true, 1);
        assert!(coordinator.is_armed());
        coordinator.observe(start + secs(1), false, 2);
        assert_eq!(coordinator.state(), AutoSaveState::Idle);
    }

    #[test]
    fn test_cancel_drops_pending_flush() {
        let start = Instant::now();
        let mut coordinator = AutoSaveCoordinator::default();
        let mut flag = Flag::default();
        flag.touch();
        coordinator.observe(start, true, 1);

        assert!(coordinator.cancel());
        assert!(!coordinator.cancel());
        let slices = std::iter::once(&mut flag as &mut dyn Dirtyable);
        assert!(!coordinator.fire_if_due(start + secs(60), slices));
        assert!(flag.dirty);
    }

    #[test]
    fn test_flush_counts_dirty_slices() {
        let mut flags = [Flag::default(), Flag::default(), Flag::default()];
        flags[1].touch();
        flags[2].touch();
        assert_eq!(flush(flags.iter_mut().map(|f| f as &mut dyn Dirtyable)), 2);
        assert_eq!(flush(flags.iter_mut().map(|f| f as &mut dyn Dirtyable)), 0);
    }
}
