//! [`EncodeSession`]: configure, queue frames, run, collect the artifact.
//!
//! Configuration and the frame queue are only mutable while no run is in progress. `start()`
//! freezes both into a per-run snapshot, does the initial dispatch on the caller's thread, and
//! hands the run to a coordinator thread. Events are delivered on whichever thread raised them:
//! `start` and the first `progress` on the caller's, everything after on the coordinator's.

use crate::config::options::{FrameOptions, SessionOptions};
use crate::config::session::{SessionConfig, positive};
use crate::events::bus::{Emission, EventBus, ListenerId};
use crate::events::event::{EncoderEvent, EventKind};
use crate::foundation::error::{GifError, GifResult};
use crate::frame::queue::FrameQueue;
use crate::frame::source::FrameInput;
use crate::schedule::reassemble::Artifact;
use crate::schedule::scheduler::Scheduler;
use crate::schedule::status::{RunState, RunStatus};
use crate::worker::encoder::FrameEncoder;
use anyhow::Context as _;
use crossbeam_channel::bounded;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Parallel GIF encode session.
///
/// ```no_run
/// use wavyte_gif::{EncodeSession, EncodedFrame, FrameOptions, ImageData, PageWriter, Task};
///
/// let mut session = EncodeSession::new(|task: &Task| -> anyhow::Result<EncodedFrame> {
///     let mut out = PageWriter::new();
///     out.write_bytes(&task.data[..16]);
///     Ok(EncodedFrame::from_writer(task.index, out, None))
/// });
/// for _ in 0..3 {
///     let frame = ImageData::new(4, 4, vec![0; 64]);
///     session.add_frame(frame, &FrameOptions::default())?;
/// }
/// session.start()?;
/// let gif = session.wait()?;
/// gif.write_to("out/anim.gif")?;
/// # Ok::<(), wavyte_gif::GifError>(())
/// ```
pub struct EncodeSession {
    encoder: Arc<dyn FrameEncoder>,
    config: SessionConfig,
    queue: FrameQueue,
    bus: Arc<EventBus<EncoderEvent>>,
    status: Arc<RunStatus>,
    coordinator: Option<JoinHandle<GifResult<Artifact>>>,
}

/// Cloneable, thread-safe way to abort a session's current run.
///
/// Usable from event listeners, which cannot borrow the session.
#[derive(Clone, Debug)]
pub struct AbortHandle {
    status: Arc<RunStatus>,
}

impl AbortHandle {
    /// Abort the current run. Returns `false` when no run is in progress.
    pub fn abort(&self) -> bool {
        self.status.request_abort()
    }
}

impl EncodeSession {
    /// Session with default configuration, encoding frames with `encoder`.
    pub fn new(encoder: impl FrameEncoder) -> Self {
        Self::with_encoder(Arc::new(encoder))
    }

    /// Session sharing an existing encoder.
    pub fn with_encoder(encoder: Arc<dyn FrameEncoder>) -> Self {
        Self {
            encoder,
            config: SessionConfig::default(),
            queue: FrameQueue::default(),
            bus: Arc::new(EventBus::new()),
            status: Arc::new(RunStatus::new()),
            coordinator: None,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// State of the most recent run.
    pub fn state(&self) -> RunState {
        self.status.state()
    }

    /// Number of queued frames.
    pub fn frame_count(&self) -> usize {
        self.queue.len()
    }

    /// Merge `opts` into the configuration.
    pub fn configure(&mut self, opts: &SessionOptions) -> GifResult<()> {
        self.ensure_idle("configure")?;
        self.config.apply(opts)
    }

    /// Merge options given as a JSON object. Unrecognized keys are ignored.
    pub fn configure_json(&mut self, value: &serde_json::Value) -> GifResult<()> {
        let opts = SessionOptions::from_json(value)?;
        self.configure(&opts)
    }

    /// Set the output width.
    pub fn set_width(&mut self, width: u32) -> GifResult<()> {
        self.ensure_idle("set width")?;
        self.config.width = Some(positive("width", width)?);
        Ok(())
    }

    /// Set the output height.
    pub fn set_height(&mut self, height: u32) -> GifResult<()> {
        self.ensure_idle("set height")?;
        self.config.height = Some(positive("height", height)?);
        Ok(())
    }

    /// Queue a frame. Returns the new frame count.
    ///
    /// The first frame also supplies the output width and height when they are not set yet.
    pub fn add_frame(
        &mut self,
        input: impl Into<FrameInput>,
        opts: &FrameOptions,
    ) -> GifResult<usize> {
        self.ensure_idle("add a frame")?;
        let (count, (width, height)) = self.queue.push(input.into(), opts, &self.config)?;
        if self.config.width.is_none() {
            self.config.width = Some(width);
        }
        if self.config.height.is_none() {
            self.config.height = Some(height);
        }
        tracing::debug!(count, width, height, copy = opts.copy, "queued frame");
        Ok(count)
    }

    /// Register a listener for one event kind.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&Emission<'_, EncoderEvent>) + Send + Sync + 'static,
    {
        self.bus.subscribe(kind, listener)
    }

    /// Remove a listener. Returns `false` when `id` was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Handle for aborting runs from other threads or from listeners.
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            status: Arc::clone(&self.status),
        }
    }

    /// Begin a run over the queued frames.
    ///
    /// Usage errors (`InvalidState`, `MissingDimensions`, `NoFrames`) leave the session as it
    /// was. An error during the initial dispatch ends the new run in [`RunState::Failed`].
    #[tracing::instrument(skip_all)]
    pub fn start(&mut self) -> GifResult<()> {
        if self.status.is_running() {
            return Err(GifError::invalid_state("a run is already in progress"));
        }
        let cfg = self.config.freeze()?;
        if self.queue.is_empty() {
            return Err(GifError::NoFrames);
        }
        if let Some(previous) = self.coordinator.take() {
            let _ = previous.join();
        }

        let (abort_tx, abort_rx) = bounded(1);
        self.status.begin(abort_tx)?;
        let mut scheduler = Scheduler::new(
            cfg,
            self.queue.snapshot(),
            Arc::clone(&self.encoder),
            Arc::clone(&self.bus),
            Arc::clone(&self.status),
        );
        if let Err(err) = scheduler.start() {
            return Err(scheduler.fail(err));
        }

        let spawned = thread::Builder::new()
            .name("gif-coordinator".to_string())
            .spawn(move || scheduler.run(abort_rx))
            .context("failed to spawn coordinator thread");
        match spawned {
            Ok(handle) => {
                self.coordinator = Some(handle);
                Ok(())
            }
            Err(e) => {
                let err = GifError::from(e);
                if self.status.settle(RunState::Failed) {
                    self.bus.emit(&EncoderEvent::Error {
                        message: err.to_string(),
                    });
                }
                Err(err)
            }
        }
    }

    /// Abort the current run. Returns `false` (and does nothing) when no run is in progress.
    ///
    /// Busy workers are detached and their results discarded; the `abort` event follows from
    /// the coordinator thread.
    pub fn abort(&self) -> bool {
        let aborted = self.status.request_abort();
        if aborted {
            tracing::debug!("abort requested");
        }
        aborted
    }

    /// Block until the current run ends.
    ///
    /// Returns the artifact, [`GifError::Aborted`], or the error that failed the run.
    pub fn wait(&mut self) -> GifResult<Artifact> {
        let handle = self
            .coordinator
            .take()
            .ok_or_else(|| GifError::invalid_state("no run to wait for"))?;
        handle
            .join()
            .map_err(|_| GifError::Other(anyhow::anyhow!("coordinator thread panicked")))?
    }

    fn ensure_idle(&self, action: &str) -> GifResult<()> {
        if self.status.is_running() {
            return Err(GifError::invalid_state(format!(
                "cannot {action} while a run is in progress"
            )));
        }
        Ok(())
    }
}

impl Drop for EncodeSession {
    fn drop(&mut self) {
        self.status.request_abort();
        if let Some(handle) = self.coordinator.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/encode_session.rs"]
mod tests;
