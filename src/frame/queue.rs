use crate::config::options::FrameOptions;
use crate::config::session::{DisposeMode, SessionConfig};
use crate::foundation::core::Rgb8;
use crate::foundation::error::GifResult;
use crate::frame::source::{FrameInput, FramePixels};
use std::sync::Arc;

/// One queued frame: pixel source plus resolved display metadata.
#[derive(Clone)]
pub(crate) struct Frame {
    pub(crate) pixels: FramePixels,
    pub(crate) delay_ms: u32,
    pub(crate) dispose: DisposeMode,
    pub(crate) transparent: Option<Rgb8>,
}

/// Ordered frames submitted before a run.
///
/// Runs borrow a frozen snapshot ([`FrameQueue::snapshot`]), so frames are never mutated while
/// a run reads them.
#[derive(Clone, Default)]
pub(crate) struct FrameQueue {
    frames: Vec<Frame>,
}

impl FrameQueue {
    /// Validate `input`, resolve per-frame defaults from `cfg`, and append.
    ///
    /// Returns the new frame count and the natural size of the source.
    pub(crate) fn push(
        &mut self,
        input: FrameInput,
        opts: &FrameOptions,
        cfg: &SessionConfig,
    ) -> GifResult<(usize, (u32, u32))> {
        let accepted = FramePixels::accept(
            input,
            opts.copy,
            (cfg.width, cfg.height),
            cfg.background,
        )?;
        self.frames.push(Frame {
            pixels: accepted.pixels,
            delay_ms: opts.delay.unwrap_or(cfg.delay_ms),
            dispose: opts.dispose.unwrap_or(cfg.dispose),
            transparent: opts.transparent.or(cfg.transparent),
        });
        Ok((self.frames.len(), accepted.dimensions))
    }

    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub(crate) fn snapshot(&self) -> Arc<[Frame]> {
        self.frames.clone().into()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/queue.rs"]
mod tests;
