//! Run coordinator: dispatch in queue order, collect out-of-order completions, reassemble.
//!
//! A [`Scheduler`] is built and started on the caller's thread (initial dispatch plus the
//! `start` and `progress(0, n)` events), then moved onto a coordinator thread by
//! [`Scheduler::run`]. From there it is the only reader of the completion channel and the only
//! writer of the result table.

use crate::config::session::RunConfig;
use crate::events::bus::EventBus;
use crate::events::event::EncoderEvent;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{GifError, GifResult};
use crate::frame::queue::Frame;
use crate::schedule::reassemble::{Artifact, reassemble};
use crate::schedule::status::{RunState, RunStatus};
use crate::schedule::table::ResultTable;
use crate::worker::encoder::FrameEncoder;
use crate::worker::pool::WorkerPool;
use crate::worker::result::EncodedFrame;
use crate::worker::task::{Palette, PaletteMode, Task};
use crate::worker::unit::Completion;
use crossbeam_channel::{Receiver, after, never, select, unbounded};
use std::sync::Arc;
use std::time::Instant;

pub(crate) struct Scheduler {
    cfg: RunConfig,
    frames: Arc<[Frame]>,
    pool: WorkerPool,
    done_rx: Receiver<Completion>,
    table: ResultTable,
    next_frame: usize,
    finished: usize,
    palette: PaletteMode,
    bus: Arc<EventBus<EncoderEvent>>,
    status: Arc<RunStatus>,
}

impl Scheduler {
    pub(crate) fn new(
        cfg: RunConfig,
        frames: Arc<[Frame]>,
        encoder: Arc<dyn FrameEncoder>,
        bus: Arc<EventBus<EncoderEvent>>,
        status: Arc<RunStatus>,
    ) -> Self {
        let (done_tx, done_rx) = unbounded();
        let palette = if cfg.global_palette {
            PaletteMode::Discover
        } else {
            PaletteMode::Off
        };
        Self {
            table: ResultTable::new(frames.len()),
            pool: WorkerPool::new(encoder, done_tx),
            done_rx,
            cfg,
            frames,
            next_frame: 0,
            finished: 0,
            palette,
            bus,
            status,
        }
    }

    /// Size the pool and send the initial batch.
    ///
    /// Without a global palette every unit gets a frame. With one, a single discovery frame goes
    /// out and the rest wait for its palette.
    #[tracing::instrument(skip_all)]
    pub(crate) fn start(&mut self) -> GifResult<()> {
        if self.frames.is_empty() {
            return Err(GifError::NoFrames);
        }
        let target = self.cfg.workers.min(self.frames.len());
        let available = self.pool.ensure_capacity(target)?;
        let initial = match self.palette {
            PaletteMode::Discover => 1,
            _ => available,
        };
        for _ in 0..initial {
            self.dispatch_next()?;
        }
        tracing::info!(
            frames = self.frames.len(),
            units = self.pool.len(),
            dispatched = initial,
            global_palette = self.cfg.global_palette,
            "run started"
        );

        self.bus.emit(&EncoderEvent::Start);
        self.bus.emit(&EncoderEvent::Progress {
            loaded: 0,
            total: self.frames.len(),
        });
        Ok(())
    }

    /// Coordinator loop. Returns the artifact, or the error that ended the run.
    pub(crate) fn run(mut self, abort_rx: Receiver<()>) -> GifResult<Artifact> {
        let done_rx = self.done_rx.clone();
        loop {
            if !self.status.is_running() {
                return Err(self.aborted());
            }
            let timer = match self.cfg.worker_timeout {
                Some(window) if self.pool.busy_count() > 0 => after(window),
                _ => never::<Instant>(),
            };
            select! {
                recv(abort_rx) -> _ => return Err(self.aborted()),
                recv(done_rx) -> msg => {
                    let step = match msg {
                        Ok(completion) => self.on_worker_result(completion),
                        Err(_) => Err(GifError::invalid_state("completion channel closed")),
                    };
                    match step {
                        Ok(Some(artifact)) => return Ok(artifact),
                        Ok(None) => {}
                        Err(GifError::Aborted) => return Err(GifError::Aborted),
                        Err(err) => return Err(self.fail(err)),
                    }
                }
                recv(timer) -> _ => {
                    let ms = self
                        .cfg
                        .worker_timeout
                        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
                    tracing::warn!(timeout_ms = ms, busy = self.pool.busy_count(), "no worker completed in time");
                    return Err(self.fail(GifError::WorkerTimeout(ms)));
                }
            }
        }
    }

    /// Handle one completion. Returns the artifact once the table is full.
    pub(crate) fn on_worker_result(&mut self, completion: Completion) -> GifResult<Option<Artifact>> {
        let Completion {
            unit,
            index,
            outcome,
        } = completion;
        let Some(held) = self.pool.complete(unit) else {
            tracing::warn!(unit = unit.0, index = index.0, "discarding result from an inactive worker");
            return Ok(None);
        };
        if held != index {
            return Err(GifError::invalid_result(format!(
                "worker {unit} reported frame {index} while holding frame {held}"
            )));
        }
        let mut frame = outcome.map_err(|message| GifError::WorkerFailed { index, message })?;
        if frame.index != index {
            return Err(GifError::invalid_result(format!(
                "result for frame {index} is labelled frame {}",
                frame.index
            )));
        }
        frame.validate()?;
        let discovered = frame.palette.take();
        let total = self.frames.len();

        self.finished += 1;
        tracing::debug!(
            unit = unit.0,
            index = index.0,
            bytes = frame.byte_len(),
            finished = self.finished,
            "frame encoded"
        );
        self.bus.emit(&EncoderEvent::Progress {
            loaded: self.finished,
            total,
        });
        self.table.insert(frame)?;
        if !self.status.is_running() {
            return Ok(None);
        }

        if matches!(self.palette, PaletteMode::Discover) {
            self.adopt_palette(discovered);
            if total > 2 {
                for _ in 1..self.pool.idle_count() {
                    self.dispatch_next()?;
                }
            }
        }

        if self.table.is_full() {
            self.finish().map(Some)
        } else {
            self.dispatch_next()?;
            Ok(None)
        }
    }

    /// Send the next queued frame to the longest-idle unit.
    ///
    /// `NoFreeWorker` when no unit is idle; a no-op once every frame has been dispatched.
    pub(crate) fn dispatch_next(&mut self) -> GifResult<()> {
        let Some(unit) = self.pool.next_idle() else {
            return Err(GifError::NoFreeWorker);
        };
        if self.next_frame >= self.frames.len() {
            return Ok(());
        }
        let index = FrameIndex(self.next_frame);
        self.next_frame += 1;
        let task = self.build_task(index)?;
        self.pool.dispatch(unit, task)?;
        tracing::debug!(unit = unit.0, index = index.0, "dispatched frame");
        Ok(())
    }

    fn build_task(&self, index: FrameIndex) -> GifResult<Task> {
        let frame = self
            .frames
            .get(index.0)
            .ok_or_else(|| GifError::invalid_frame(index, "frame is not in the run snapshot"))?;
        let data = frame
            .pixels
            .acquire(self.cfg.width, self.cfg.height, self.cfg.background)
            .map_err(|e| GifError::invalid_frame(index, format!("{e:#}")))?;
        let expected = self.cfg.frame_bytes();
        if data.len() != expected {
            return Err(GifError::invalid_frame(
                index,
                format!(
                    "pixel buffer is {} bytes, expected {expected} for {}x{} RGBA8",
                    data.len(),
                    self.cfg.width,
                    self.cfg.height
                ),
            ));
        }
        if frame.pixels.is_lazy() {
            tracing::debug!(index = index.0, "rasterized lazy source");
        }
        Ok(Task {
            index,
            last: index.0 + 1 == self.frames.len(),
            delay_ms: frame.delay_ms,
            dispose: frame.dispose,
            transparent: frame.transparent,
            width: self.cfg.width,
            height: self.cfg.height,
            quality: self.cfg.quality,
            dither: self.cfg.dither,
            palette: self.palette.clone(),
            repeat: self.cfg.repeat,
            data,
        })
    }

    fn adopt_palette(&mut self, discovered: Option<Palette>) {
        self.palette = match discovered {
            Some(palette) => {
                tracing::info!(colors = palette.len(), "adopted shared palette");
                PaletteMode::Shared(Arc::new(palette))
            }
            None => {
                tracing::warn!("discovery result carried no palette; using per-frame palettes");
                PaletteMode::Off
            }
        };
    }

    fn finish(&mut self) -> GifResult<Artifact> {
        let ordered: Vec<&EncodedFrame> = self.table.ordered()?;
        let artifact = reassemble(&ordered)?;
        if !self.status.settle(RunState::Finished) {
            return Err(self.aborted());
        }
        tracing::info!(frames = self.table.len(), bytes = artifact.len(), "run finished");
        self.bus.emit(&EncoderEvent::Finished {
            artifact: artifact.clone(),
        });
        Ok(artifact)
    }

    /// End an aborted run: drop every unit and announce it.
    pub(crate) fn aborted(&mut self) -> GifError {
        self.pool.terminate_all();
        tracing::info!(finished = self.finished, "run aborted");
        self.bus.emit(&EncoderEvent::Abort);
        GifError::Aborted
    }

    /// End the run on `err`. An abort that already won the race takes precedence.
    pub(crate) fn fail(&mut self, err: GifError) -> GifError {
        if !self.status.settle(RunState::Failed) {
            return self.aborted();
        }
        self.pool.terminate_all();
        tracing::warn!(error = %err, "run failed");
        self.bus.emit(&EncoderEvent::Error {
            message: err.to_string(),
        });
        err
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
