//! Shared application state

use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::application::ports::outbound::{AuthProvider, ConfirmPrompt, SliceStorage};
use crate::application::services::{
    BeforeUnloadEvent, NavigationGuard, NavigationOutcome, RuntimeError, SessionGate,
    WorkflowHandle,
};
use crate::application::state::NovelWorkflow;
use crate::domain::value_objects::WorkflowStep;
use crate::infrastructure::auth::InMemoryAuthProvider;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::prompt::TerminalPrompt;
use crate::infrastructure::router::HistoryRouter;
use crate::infrastructure::storage::build_storage;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub storage: Arc<dyn SliceStorage>,
    pub router: Arc<HistoryRouter>,
    pub auth: Arc<dyn AuthProvider>,
    pub session_gate: SessionGate,
    pub guard: Arc<NavigationGuard>,
    /// The running workflow; all reads and writes go through here
    pub workflow: WorkflowHandle,
}

impl AppState {
    /// Wire everything with the terminal prompt. Must run inside a tokio runtime.
    pub fn new(config: AppConfig) -> Result<Self> {
        Self::with_prompt(config, Arc::new(TerminalPrompt::stdio()))
    }

    pub fn with_prompt(config: AppConfig, prompt: Arc<dyn ConfirmPrompt>) -> Result<Self> {
        let storage = build_storage(&config)?;

        let router = Arc::new(HistoryRouter::new(WorkflowStep::Start.path()));
        let auth: Arc<dyn AuthProvider> = Arc::new(InMemoryAuthProvider::new());
        let session_gate = SessionGate::new(auth.clone(), router.clone())
            .with_paths(config.login_path.clone(), config.sign_out_redirect.clone());
        let guard = Arc::new(
            NavigationGuard::new(router.clone(), prompt).with_message(config.unload_message.clone()),
        );

        let workflow = NovelWorkflow::load(storage.clone());
        let workflow = WorkflowHandle::spawn(workflow, config.autosave_interval());

        Ok(Self {
            config,
            storage,
            router,
            auth,
            session_gate,
            guard,
            workflow,
        })
    }

    /// The unload guard, evaluated against the live workflow
    pub async fn before_unload(&self) -> Result<BeforeUnloadEvent, RuntimeError> {
        let guard = self.guard.clone();
        self.workflow
            .read(move |wf| {
                let mut event = BeforeUnloadEvent::new();
                guard.before_unload(wf, &mut event);
                event
            })
            .await
    }

    /// Leave the workflow for `path`, asking first if anything is unsaved.
    /// The question is asked on a blocking thread, never inside the runtime
    /// task, so auto-save and other handles keep running while it waits.
    pub async fn leave_workflow(&self, path: &str) -> Result<NavigationOutcome, RuntimeError> {
        let mut decision = None;
        loop {
            let guard = self.guard.clone();
            let target = path.to_string();
            let resolved = self
                .workflow
                .with(move |wf| guard.navigate_decided(wf, &target, decision))
                .await?;
            if let Some(outcome) = resolved {
                return Ok(outcome);
            }

            let guard = self.guard.clone();
            let answer = tokio::task::spawn_blocking(move || guard.confirm())
                .await
                .map_err(|e| {
                    warn!(error = %e, "Navigation prompt did not complete");
                    RuntimeError::Closed
                })?;
            decision = Some(answer);
        }
    }

    pub async fn open_step(&self, step: WorkflowStep) -> Result<bool, RuntimeError> {
        let guard = self.guard.clone();
        self.workflow.with(move |wf| guard.open_step(wf, step)).await
    }
}
