//! Frame sources and the frame queue.

pub(crate) mod queue;
/// Pixel source forms accepted by `add_frame`.
pub mod source;
