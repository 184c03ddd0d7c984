use crate::worker::result::EncodedFrame;
use crate::worker::task::Task;

/// Per-frame encoder run inside a worker unit.
///
/// Implementations receive one task at a time per unit and must return the frame's encoded
/// bytes as pages (see [`crate::PageWriter`]). The first frame's output carries the file header
/// and the last frame's output carries the trailer; the orchestrator only concatenates.
///
/// When the task's palette is [`crate::PaletteMode::Discover`] the result must carry the
/// computed palette. Errors and panics fail the run.
pub trait FrameEncoder: Send + Sync + 'static {
    /// Encode one frame.
    fn encode(&self, task: &Task) -> anyhow::Result<EncodedFrame>;
}

impl<F> FrameEncoder for F
where
    F: Fn(&Task) -> anyhow::Result<EncodedFrame> + Send + Sync + 'static,
{
    fn encode(&self, task: &Task) -> anyhow::Result<EncodedFrame> {
        self(task)
    }
}
