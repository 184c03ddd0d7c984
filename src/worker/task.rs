use crate::config::session::{Dither, DisposeMode, Repeat};
use crate::foundation::core::{FrameIndex, Rgb8};
use crate::foundation::error::{GifError, GifResult};
use std::fmt;
use std::sync::Arc;

/// Largest GIF color table: 256 RGB entries.
pub const MAX_PALETTE_BYTES: usize = 256 * 3;

/// A color table as packed RGB triples.
#[derive(Clone, PartialEq, Eq)]
pub struct Palette(Vec<u8>);

impl Palette {
    /// Validate packed RGB triples (1..=256 entries).
    pub fn new(rgb: Vec<u8>) -> GifResult<Self> {
        if rgb.is_empty() || !rgb.len().is_multiple_of(3) || rgb.len() > MAX_PALETTE_BYTES {
            return Err(GifError::invalid_result(format!(
                "palette must hold 1..=256 RGB triples, got {} bytes",
                rgb.len()
            )));
        }
        Ok(Self(rgb))
    }

    /// Packed RGB bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.0.len() / 3
    }

    /// Always `false`; a palette holds at least one color.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Palette({} colors)", self.len())
    }
}

/// Palette instruction carried by a task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaletteMode {
    /// Each frame computes its own local palette.
    Off,
    /// Compute a palette and return it with the result; it becomes the shared palette.
    Discover,
    /// Map pixels onto this shared palette.
    Shared(Arc<Palette>),
}

/// One encode request, sent to exactly one worker unit.
#[derive(Clone)]
pub struct Task {
    /// Queue position of the frame.
    pub index: FrameIndex,
    /// Whether this is the final frame (the encoder writes the trailer).
    pub last: bool,
    /// Display time in milliseconds.
    pub delay_ms: u32,
    /// Disposal method.
    pub dispose: DisposeMode,
    /// Transparency marker.
    pub transparent: Option<Rgb8>,
    /// Output width.
    pub width: u32,
    /// Output height.
    pub height: u32,
    /// Encoder quality.
    pub quality: u32,
    /// Dithering request.
    pub dither: Dither,
    /// Palette instruction.
    pub palette: PaletteMode,
    /// Loop behavior (written by the first frame).
    pub repeat: Repeat,
    /// Straight-alpha RGBA8 pixels, `width * height * 4` bytes.
    pub data: Arc<[u8]>,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("index", &self.index)
            .field("last", &self.last)
            .field("size", &(self.width, self.height))
            .field("palette", &self.palette)
            .field("data_len", &self.data.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/worker/task.rs"]
mod tests;
