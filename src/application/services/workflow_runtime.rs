//! Workflow runtime - owns the workflow on a background task
//!
//! Every read and mutation is sent to the task as a closure, so the workflow
//! has a single owner and the auto-save timer can never race a mutation.
//! After each event the coordinator observes the workflow and the task
//! publishes a fresh [`WorkflowStatus`].

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, instrument, warn};

use crate::application::state::{AutoSaveCoordinator, NovelWorkflow};
use crate::domain::value_objects::WorkflowStep;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("Workflow runtime has shut down")]
    Closed,
}

/// What the UI needs to render save indicators without touching the workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowStatus {
    pub dirty: bool,
    pub dirty_slices: Vec<&'static str>,
    pub current_step: WorkflowStep,
    pub revision: u64,
    /// When the pending auto-save will run, if one is armed
    pub autosave_deadline: Option<Instant>,
    pub autosaves: u64,
}

impl WorkflowStatus {
    fn capture(workflow: &NovelWorkflow, coordinator: &AutoSaveCoordinator) -> Self {
        Self {
            dirty: workflow.is_dirty(),
            dirty_slices: workflow.dirty_slices(),
            current_step: workflow.current_step(),
            revision: workflow.revision(),
            autosave_deadline: coordinator.deadline(),
            autosaves: coordinator.flushes(),
        }
    }
}

type Job = Box<dyn FnOnce(&mut NovelWorkflow) + Send>;

enum Command {
    Run(Job),
    Shutdown(oneshot::Sender<NovelWorkflow>),
}

enum Wake {
    Timer,
    Command(Option<Command>),
}

/// Cloneable handle to a running workflow
#[derive(Clone)]
pub struct WorkflowHandle {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<WorkflowStatus>,
}

impl WorkflowHandle {
    /// Start the runtime task. Must be called within a tokio runtime.
    pub fn spawn(workflow: NovelWorkflow, autosave_interval: Duration) -> Self {
        let coordinator = AutoSaveCoordinator::new(autosave_interval);
        let (commands, rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(WorkflowStatus::capture(&workflow, &coordinator));

        tokio::spawn(run(workflow, coordinator, rx, status_tx));
        Self { commands, status }
    }

    /// Run `f` against the workflow on the runtime task
    pub async fn with<R, F>(&self, f: F) -> Result<R, RuntimeError>
    where
        F: FnOnce(&mut NovelWorkflow) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply, result) = oneshot::channel();
        let job: Job = Box::new(move |workflow| {
            let _ = reply.send(f(workflow));
        });
        self.commands
            .send(Command::Run(job))
            .map_err(|_| RuntimeError::Closed)?;
        result.await.map_err(|_| RuntimeError::Closed)
    }

    pub async fn read<R, F>(&self, f: F) -> Result<R, RuntimeError>
    where
        F: FnOnce(&NovelWorkflow) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.with(move |workflow| f(workflow)).await
    }

    /// Explicit save; cancels any pending auto-save
    pub async fn save_now(&self) -> Result<usize, RuntimeError> {
        self.with(|workflow| workflow.flush()).await
    }

    /// Latest published status
    pub fn status(&self) -> WorkflowStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowStatus> {
        self.status.clone()
    }

    /// Stop the runtime and take the workflow back. A pending auto-save is
    /// dropped, not run.
    pub async fn shutdown(&self) -> Result<NovelWorkflow, RuntimeError> {
        let (reply, workflow) = oneshot::channel();
        self.commands
            .send(Command::Shutdown(reply))
            .map_err(|_| RuntimeError::Closed)?;
        workflow.await.map_err(|_| RuntimeError::Closed)
    }
}

#[instrument(skip_all, name = "workflow_runtime")]
async fn run(
    mut workflow: NovelWorkflow,
    mut coordinator: AutoSaveCoordinator,
    mut commands: mpsc::UnboundedReceiver<Command>,
    status: watch::Sender<WorkflowStatus>,
) {
    debug!(interval = ?coordinator.interval(), "Workflow runtime started");
    loop {
        let deadline = coordinator.deadline();
        let wake = tokio::select! {
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => Wake::Timer,
            command = commands.recv() => Wake::Command(command),
        };

        // An overdue flush always happens before the next command runs
        coordinator.fire_if_due(Instant::now(), workflow.slices_mut());

        match wake {
            Wake::Timer => {}
            Wake::Command(Some(Command::Run(job))) => job(&mut workflow),
            Wake::Command(Some(Command::Shutdown(reply))) => {
                coordinator.cancel();
                info!("Workflow runtime shut down");
                if reply.send(workflow).is_err() {
                    warn!("Shutdown requester went away before taking the workflow");
                }
                return;
            }
            Wake::Command(None) => {
                coordinator.cancel();
                info!("All workflow handles dropped, runtime stopping");
                return;
            }
        }

        coordinator.observe(Instant::now(), workflow.is_dirty(), workflow.revision());
        status.send_replace(WorkflowStatus::capture(&workflow, &coordinator));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::value_objects::Genre;
    use crate::infrastructure::storage::InMemorySliceStorage;
    use tokio::time::advance;

    const INTERVAL: Duration = Duration::from_secs(30);

    fn spawn() -> WorkflowHandle {
        let workflow = NovelWorkflow::load(Arc::new(InMemorySliceStorage::new()));
        WorkflowHandle::spawn(workflow, INTERVAL)
    }

    async fn pick_genre(handle: &WorkflowHandle, genre: Genre) {
        handle
            .with(move |wf| wf.genre.update(|g| g.set_primary_genre(genre)))
            .await
            .unwrap()
            .unwrap();
    }

    async fn is_dirty(handle: &WorkflowHandle) -> bool {
        handle.read(|wf| wf.is_dirty()).await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_waits_for_quiet_period() {
        let handle = spawn();

        pick_genre(&handle, Genre::Fantasy).await;
        advance(Duration::from_secs(20)).await;
        pick_genre(&handle, Genre::ScienceFiction).await;

        // 30s after the first change, but only 10s after the second
        advance(Duration::from_secs(10)).await;
        assert!(is_dirty(&handle).await);

        advance(Duration::from_secs(20)).await;
        assert!(!is_dirty(&handle).await);
        assert_eq!(handle.status().autosaves, 1);
        assert_eq!(
            handle.read(|wf| wf.genre.get().primary_genre).await.unwrap(),
            Some(Genre::ScienceFiction)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_reports_pending_autosave() {
        let handle = spawn();
        let start = Instant::now();
        assert!(!handle.status().dirty);

        pick_genre(&handle, Genre::Mystery).await;
        let status = handle.status();
        assert!(status.dirty);
        assert_eq!(status.dirty_slices, vec!["novel-genre-storage"]);
        assert_eq!(status.autosave_deadline, Some(start + INTERVAL));
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_now_disarms_timer() {
        let handle = spawn();
        pick_genre(&handle, Genre::Horror).await;

        assert_eq!(handle.save_now().await.unwrap(), 1);
        let status = handle.status();
        assert!(!status.dirty);
        assert_eq!(status.autosave_deadline, None);

        advance(Duration::from_secs(60)).await;
        assert!(!is_dirty(&handle).await);
        assert_eq!(handle.status().autosaves, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drops_pending_autosave() {
        let handle = spawn();
        pick_genre(&handle, Genre::Romance).await;

        let workflow = handle.shutdown().await.unwrap();
        assert!(workflow.is_dirty());
        assert_eq!(handle.save_now().await, Err(RuntimeError::Closed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_every_handle_drops_pending_autosave() {
        let handle = spawn();
        let mut status = handle.subscribe();
        pick_genre(&handle, Genre::Adventure).await;
        assert!(handle.status().autosave_deadline.is_some());

        drop(handle);
        advance(Duration::from_secs(60)).await;
        // The runtime has stopped once its status sender is gone
        while status.changed().await.is_ok() {}

        let last = status.borrow().clone();
        assert!(last.dirty);
        assert_eq!(last.autosaves, 0);
    }
}
