//! Navigation guard - keeps unsaved workflow changes from being lost silently
//!
//! Two interception points, both of which only read the aggregate dirty state:
//! the unload guard (tab close, refresh, leaving the site) and the in-app
//! route guard, which asks the user to save or discard before leaving.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::ports::outbound::{ConfirmPrompt, NavigationDecision, Router};
use crate::application::state::{NovelWorkflow, ResetReport};
use crate::domain::value_objects::WorkflowStep;

pub const DEFAULT_UNSAVED_MESSAGE: &str =
    "You have unsaved changes in your novel. Save them before leaving?";

/// The platform's before-unload event, reduced to what the guard touches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeforeUnloadEvent {
    default_prevented: bool,
    return_value: String,
}

impl BeforeUnloadEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the platform to show its confirmation dialog
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Message offered to the dialog. Platforms may ignore it and show their own.
    pub fn set_return_value(&mut self, message: impl Into<String>) {
        self.return_value = message.into();
    }

    pub fn return_value(&self) -> &str {
        &self.return_value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// Nothing was unsaved; navigated straight away
    Proceeded,
    SavedAndProceeded { cleaned: usize },
    DiscardedAndProceeded(ResetReport),
    /// The user chose to stay; the router was not called
    Stayed,
}

impl NavigationOutcome {
    pub fn navigated(&self) -> bool {
        !matches!(self, NavigationOutcome::Stayed)
    }
}

enum Destination<'a> {
    Path(&'a str),
    Back,
}

pub struct NavigationGuard {
    router: Arc<dyn Router>,
    prompt: Arc<dyn ConfirmPrompt>,
    message: String,
}

impl NavigationGuard {
    pub fn new(router: Arc<dyn Router>, prompt: Arc<dyn ConfirmPrompt>) -> Self {
        Self {
            router,
            prompt,
            message: DEFAULT_UNSAVED_MESSAGE.to_string(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Unload interception. Returns whether confirmation was requested.
    pub fn before_unload(&self, workflow: &NovelWorkflow, event: &mut BeforeUnloadEvent) -> bool {
        if !workflow.is_dirty() {
            return false;
        }
        info!(dirty = ?workflow.dirty_slices(), "Unload requested with unsaved changes");
        event.prevent_default();
        event.set_return_value(self.message.clone());
        true
    }

    /// Leave for `path`, resolving unsaved changes first
    #[instrument(skip(self, workflow))]
    pub fn navigate(&self, workflow: &mut NovelWorkflow, path: &str) -> NavigationOutcome {
        self.leave(workflow, Destination::Path(path))
    }

    #[instrument(skip(self, workflow))]
    pub fn go_back(&self, workflow: &mut NovelWorkflow) -> NavigationOutcome {
        self.leave(workflow, Destination::Back)
    }

    /// Move between wizard pages. Work in progress stays with the workflow,
    /// so this is not intercepted.
    pub fn open_step(&self, workflow: &mut NovelWorkflow, step: WorkflowStep) -> bool {
        if let Err(e) = workflow.go_to_step(step) {
            tracing::warn!(error = %e, %step, "Could not record step change");
            return false;
        }
        self.router.navigate(&step.path());
        true
    }

    /// Ask what to do with unsaved changes. Blocks until the user answers.
    pub fn confirm(&self) -> NavigationDecision {
        self.prompt.confirm(&self.message)
    }

    /// Leave for `path` using a decision taken before the workflow was
    /// borrowed. `None` comes back when there are unsaved changes and no
    /// decision to apply; the router is not called then.
    #[instrument(skip(self, workflow))]
    pub fn navigate_decided(
        &self,
        workflow: &mut NovelWorkflow,
        path: &str,
        decision: Option<NavigationDecision>,
    ) -> Option<NavigationOutcome> {
        self.leave_decided(workflow, Destination::Path(path), decision)
    }

    fn leave(&self, workflow: &mut NovelWorkflow, destination: Destination<'_>) -> NavigationOutcome {
        let decision = workflow.is_dirty().then(|| self.confirm());
        self.leave_decided(workflow, destination, decision)
            .unwrap_or(NavigationOutcome::Stayed)
    }

    fn leave_decided(
        &self,
        workflow: &mut NovelWorkflow,
        destination: Destination<'_>,
        decision: Option<NavigationDecision>,
    ) -> Option<NavigationOutcome> {
        let outcome = match (workflow.is_dirty(), decision) {
            (false, _) => NavigationOutcome::Proceeded,
            (true, None) => return None,
            (true, Some(NavigationDecision::SaveAndLeave)) => NavigationOutcome::SavedAndProceeded {
                cleaned: workflow.flush(),
            },
            (true, Some(NavigationDecision::DiscardAndLeave)) => {
                NavigationOutcome::DiscardedAndProceeded(workflow.reset_all())
            }
            (true, Some(NavigationDecision::Stay)) => NavigationOutcome::Stayed,
        };

        if outcome.navigated() {
            match destination {
                Destination::Path(path) => self.router.navigate(path),
                Destination::Back => self.router.back(),
            }
        }
        info!(?outcome, "Navigation resolved");
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::domain::entities::GenreState;
    use crate::domain::value_objects::Genre;
    use crate::infrastructure::router::HistoryRouter;
    use crate::infrastructure::storage::InMemorySliceStorage;

    struct ScriptedPrompt {
        decision: NavigationDecision,
        asked: Mutex<Vec<String>>,
    }

    impl ScriptedPrompt {
        fn new(decision: NavigationDecision) -> Arc<Self> {
            Arc::new(Self {
                decision,
                asked: Mutex::new(Vec::new()),
            })
        }

        fn times_asked(&self) -> usize {
            self.asked.lock().unwrap().len()
        }
    }

    impl ConfirmPrompt for ScriptedPrompt {
        fn confirm(&self, message: &str) -> NavigationDecision {
            self.asked.lock().unwrap().push(message.to_string());
            self.decision
        }
    }

    fn setup(
        decision: NavigationDecision,
    ) -> (NavigationGuard, NovelWorkflow, Arc<HistoryRouter>, Arc<ScriptedPrompt>) {
        let router = Arc::new(HistoryRouter::new("/create/genre"));
        let prompt = ScriptedPrompt::new(decision);
        let guard = NavigationGuard::new(router.clone(), prompt.clone());
        let workflow = NovelWorkflow::load(Arc::new(InMemorySliceStorage::new()));
        (guard, workflow, router, prompt)
    }

    fn dirty(workflow: &mut NovelWorkflow) {
        workflow
            .genre
            .update(|g| g.set_primary_genre(Genre::Thriller))
            .unwrap();
    }

    #[test]
    fn test_unload_prevented_only_when_dirty() {
        let (guard, mut workflow, _, _) = setup(NavigationDecision::Stay);

        let mut event = BeforeUnloadEvent::new();
        assert!(!guard.before_unload(&workflow, &mut event));
        assert!(!event.default_prevented());

        dirty(&mut workflow);
        let mut event = BeforeUnloadEvent::new();
        assert!(guard.before_unload(&workflow, &mut event));
        assert!(event.default_prevented());
        assert_eq!(event.return_value(), DEFAULT_UNSAVED_MESSAGE);
    }

    #[test]
    fn test_clean_workflow_navigates_without_prompt() {
        let (guard, mut workflow, router, prompt) = setup(NavigationDecision::Stay);
        let outcome = guard.navigate(&mut workflow, "/dashboard");
        assert_eq!(outcome, NavigationOutcome::Proceeded);
        assert_eq!(router.current(), "/dashboard");
        assert_eq!(prompt.times_asked(), 0);
    }

    #[test]
    fn test_save_then_navigate() {
        let (guard, mut workflow, router, prompt) = setup(NavigationDecision::SaveAndLeave);
        dirty(&mut workflow);

        let outcome = guard.navigate(&mut workflow, "/dashboard");
        assert_eq!(outcome, NavigationOutcome::SavedAndProceeded { cleaned: 1 });
        assert!(!workflow.is_dirty());
        assert_eq!(workflow.genre.get().primary_genre, Some(Genre::Thriller));
        assert_eq!(router.current(), "/dashboard");
        assert_eq!(prompt.times_asked(), 1);
    }

    #[test]
    fn test_discard_then_go_back() {
        let (guard, mut workflow, router, _) = setup(NavigationDecision::DiscardAndLeave);
        router.navigate("/create/characters");
        dirty(&mut workflow);

        let outcome = guard.go_back(&mut workflow);
        assert!(matches!(outcome, NavigationOutcome::DiscardedAndProceeded(ref r) if r.is_complete()));
        assert!(!workflow.is_dirty());
        assert_eq!(workflow.genre.get(), &GenreState::default());
        assert_eq!(router.current(), "/create/genre");
    }

    #[test]
    fn test_stay_keeps_changes_and_location() {
        let (guard, mut workflow, router, _) = setup(NavigationDecision::Stay);
        dirty(&mut workflow);

        let outcome = guard.navigate(&mut workflow, "/dashboard");
        assert_eq!(outcome, NavigationOutcome::Stayed);
        assert!(workflow.is_dirty());
        assert_eq!(router.current(), "/create/genre");
    }

    #[test]
    fn test_open_step_is_not_intercepted() {
        let (guard, mut workflow, router, prompt) = setup(NavigationDecision::Stay);
        dirty(&mut workflow);

        assert!(guard.open_step(&mut workflow, WorkflowStep::Characters));
        assert_eq!(workflow.current_step(), WorkflowStep::Characters);
        assert_eq!(router.current(), "/create/characters");
        assert_eq!(prompt.times_asked(), 0);
    }

    #[test]
    fn test_navigate_decided_needs_decision_only_when_dirty() {
        let (guard, mut workflow, router, prompt) = setup(NavigationDecision::Stay);

        let outcome = guard.navigate_decided(&mut workflow, "/dashboard", None);
        assert_eq!(outcome, Some(NavigationOutcome::Proceeded));
        assert_eq!(router.current(), "/dashboard");

        router.navigate("/create/genre");
        dirty(&mut workflow);
        assert_eq!(guard.navigate_decided(&mut workflow, "/dashboard", None), None);
        assert_eq!(router.current(), "/create/genre");
        assert!(workflow.is_dirty());

        let outcome = guard.navigate_decided(
            &mut workflow,
            "/dashboard",
            Some(NavigationDecision::SaveAndLeave),
        );
        assert_eq!(outcome, Some(NavigationOutcome::SavedAndProceeded { cleaned: 1 }));
        assert_eq!(router.current(), "/dashboard");
        // The decision was supplied, the prompt never ran
        assert_eq!(prompt.times_asked(), 0);
    }
}
