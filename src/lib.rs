//! Parallel animated-GIF encoding orchestrator.
//!
//! A caller queues raster frames on an [`EncodeSession`] and starts a run. Frames are encoded
//! concurrently by a bounded pool of worker threads, each running a caller-supplied
//! [`FrameEncoder`]; results arrive in any order and are reassembled into one GIF byte stream in
//! queue order.
//!
//! # Run overview
//!
//! 1. **Start**: freeze the configuration and the frame queue, size the pool to
//!    `min(workers, frames)`, dispatch the initial tasks
//! 2. **Collect**: each completion fills one slot of the result table, emits `progress`, and
//!    frees its worker for the next queued frame
//! 3. **Reassemble**: once every slot is filled the paged outputs are concatenated into an
//!    [`Artifact`] and `finished` is emitted
//!
//! With `global_palette` enabled, step 1 dispatches a single discovery frame; the palette it
//! returns is shared by every later task.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Message passing only**: workers see nothing but their task and never touch run state.
//! - **Queue order out**: the artifact layout never depends on completion order.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod events;
mod foundation;
mod frame;
mod schedule;
mod session;
mod worker;

pub use config::options::{FrameOptions, SessionOptions};
pub use config::session::{
    DEFAULT_DELAY_MS, DEFAULT_QUALITY, DEFAULT_WORKERS, Dither, DitherKernel, DisposeMode,
    Repeat, SessionConfig,
};
pub use events::bus::{BusEvent, Emission, EventBus, ListenerId};
pub use events::event::{EncoderEvent, EventKind};
pub use foundation::core::{FrameIndex, Rgb8, Rgba8};
pub use foundation::error::{GifError, GifResult};
pub use frame::source::{Drawable, FrameInput, ImageData, PixelSurface};
pub use schedule::reassemble::{Artifact, GIF_MEDIA_TYPE, assembled_len, reassemble};
pub use schedule::status::RunState;
pub use session::encode_session::{AbortHandle, EncodeSession};
pub use worker::encoder::FrameEncoder;
pub use worker::result::{DEFAULT_PAGE_SIZE, EncodedFrame, PageWriter};
pub use worker::task::{MAX_PALETTE_BYTES, Palette, PaletteMode, Task};
