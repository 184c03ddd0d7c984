use crate::foundation::core::FrameIndex;
use crate::foundation::error::{GifError, GifResult};
use crate::worker::encoder::FrameEncoder;
use crate::worker::result::EncodedFrame;
use crate::worker::task::Task;
use anyhow::Context as _;
use crossbeam_channel::{Receiver, Sender, bounded};
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Identity of one worker unit within a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message a unit sends back after each task.
#[derive(Debug)]
pub(crate) struct Completion {
    pub(crate) unit: UnitId,
    pub(crate) index: FrameIndex,
    pub(crate) outcome: Result<EncodedFrame, String>,
}

/// One worker thread with a single-slot task channel.
///
/// The thread owns nothing but its encoder handle and channels; it never sees the result
/// table, the frame queue or scheduler state.
pub(crate) struct WorkerUnit {
    id: UnitId,
    task_tx: Option<Sender<Task>>,
    handle: Option<JoinHandle<()>>,
}

impl WorkerUnit {
    pub(crate) fn spawn(
        id: UnitId,
        encoder: Arc<dyn FrameEncoder>,
        done_tx: Sender<Completion>,
    ) -> GifResult<Self> {
        let (task_tx, task_rx) = bounded::<Task>(1);
        let handle = thread::Builder::new()
            .name(format!("gif-worker-{id}"))
            .spawn(move || worker_loop(id, task_rx, done_tx, encoder))
            .with_context(|| format!("failed to spawn worker thread {id}"))?;
        Ok(Self {
            id,
            task_tx: Some(task_tx),
            handle: Some(handle),
        })
    }

    pub(crate) fn send(&self, task: Task) -> GifResult<()> {
        let tx = self
            .task_tx
            .as_ref()
            .ok_or_else(|| GifError::invalid_state(format!("worker {} is terminated", self.id)))?;
        tx.send(task).map_err(|_| {
            GifError::Other(anyhow::anyhow!("worker {} is no longer receiving tasks", self.id))
        })
    }

    /// Stop accepting tasks and detach the thread.
    ///
    /// A task already running finishes in the background; its completion is dropped by whoever
    /// still holds the receiver, or fails to send once the run is gone.
    pub(crate) fn terminate(mut self) {
        self.task_tx.take();
        self.handle.take();
    }

    /// Stop accepting tasks and wait for the (idle) thread to exit.
    pub(crate) fn shutdown(mut self) {
        self.task_tx.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!(unit = self.id.0, "worker thread panicked during shutdown");
        }
    }
}

fn worker_loop(
    id: UnitId,
    task_rx: Receiver<Task>,
    done_tx: Sender<Completion>,
    encoder: Arc<dyn FrameEncoder>,
) {
    for task in task_rx.iter() {
        let index = task.index;
        let outcome = match catch_unwind(AssertUnwindSafe(|| encoder.encode(&task))) {
            Ok(Ok(frame)) => Ok(frame),
            Ok(Err(e)) => Err(format!("{e:#}")),
            Err(panic) => Err(panic_message(panic.as_ref())),
        };
        drop(task);
        if done_tx
            .send(Completion {
                unit: id,
                index,
                outcome,
            })
            .is_err()
        {
            break;
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("encoder panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("encoder panicked: {s}")
    } else {
        "encoder panicked".to_string()
    }
}
