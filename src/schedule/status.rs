use crate::foundation::error::{GifError, GifResult};
use crossbeam_channel::Sender;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lifecycle of the most recent run of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RunState {
    /// No run has started.
    #[default]
    Idle,
    /// Frames are being encoded.
    Running,
    /// The artifact was produced.
    Finished,
    /// The caller aborted the run.
    Aborted,
    /// The run stopped on an error.
    Failed,
}

impl RunState {
    /// Whether this is an end state of a run.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Aborted | Self::Failed)
    }
}

/// Shared run state plus the wake-up channel of the active coordinator.
///
/// Every transition out of `Running` is taken under one lock, so exactly one of finish, fail
/// and abort wins for a given run.
#[derive(Debug, Default)]
pub(crate) struct RunStatus {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    state: RunState,
    abort_tx: Option<Sender<()>>,
}

impl RunStatus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn state(&self) -> RunState {
        self.lock().state
    }

    pub(crate) fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// Enter `Running`, remembering how to wake the coordinator on abort.
    pub(crate) fn begin(&self, abort_tx: Sender<()>) -> GifResult<()> {
        let mut inner = self.lock();
        if inner.state == RunState::Running {
            return Err(GifError::invalid_state("a run is already in progress"));
        }
        inner.state = RunState::Running;
        inner.abort_tx = Some(abort_tx);
        Ok(())
    }

    /// `Running -> Aborted`. Returns `false` (and does nothing) in any other state.
    pub(crate) fn request_abort(&self) -> bool {
        let mut inner = self.lock();
        if inner.state != RunState::Running {
            return false;
        }
        inner.state = RunState::Aborted;
        if let Some(tx) = inner.abort_tx.take() {
            // The coordinator may already be gone; the state change is what matters.
            let _ = tx.try_send(());
        }
        true
    }

    /// `Running -> to`. Returns `false` when the run already left `Running`.
    pub(crate) fn settle(&self, to: RunState) -> bool {
        let mut inner = self.lock();
        if inner.state != RunState::Running {
            return false;
        }
        inner.state = to;
        inner.abort_tx = None;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/status.rs"]
mod tests;
