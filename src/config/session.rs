use crate::config::options::SessionOptions;
use crate::foundation::core::{Rgb8, Rgba8};
use crate::foundation::error::{GifError, GifResult};
use std::time::Duration;

/// Default per-frame delay in milliseconds.
pub const DEFAULT_DELAY_MS: u32 = 500;
/// Default worker cap.
pub const DEFAULT_WORKERS: usize = 2;
/// Default encoder quality (sampling factor, lower is better).
pub const DEFAULT_QUALITY: u32 = 10;

/// Animation loop behavior written into the output.
///
/// Wire form is an integer: `-1` plays once, `0` loops forever, `n > 0` repeats `n` times.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "i32")]
pub enum Repeat {
    /// Play once; no looping extension.
    NoLoop,
    /// Loop forever.
    #[default]
    Infinite,
    /// Repeat this many times.
    Count(u16),
}

impl Repeat {
    /// Integer wire form.
    pub fn to_wire(self) -> i32 {
        match self {
            Self::NoLoop => -1,
            Self::Infinite => 0,
            Self::Count(n) => i32::from(n),
        }
    }
}

impl TryFrom<i32> for Repeat {
    type Error = GifError;

    fn try_from(v: i32) -> GifResult<Self> {
        match v {
            -1 => Ok(Self::NoLoop),
            0 => Ok(Self::Infinite),
            n => u16::try_from(n)
                .map(Self::Count)
                .map_err(|_| GifError::validation(format!("repeat {n} out of range -1..=65535"))),
        }
    }
}

/// GIF frame disposal method.
///
/// Wire form is an integer: `-1` lets the encoder decide, `0..=3` are the GIF disposal codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "i32")]
pub enum DisposeMode {
    /// Encoder decides (based on transparency).
    #[default]
    Auto,
    /// No disposal specified.
    Unspecified,
    /// Leave the frame in place.
    Keep,
    /// Restore the frame area to the background color.
    RestoreBackground,
    /// Restore the frame area to the previous frame.
    RestorePrevious,
}

impl DisposeMode {
    /// Integer wire form.
    pub fn to_wire(self) -> i32 {
        match self {
            Self::Auto => -1,
            Self::Unspecified => 0,
            Self::Keep => 1,
            Self::RestoreBackground => 2,
            Self::RestorePrevious => 3,
        }
    }
}

impl TryFrom<i32> for DisposeMode {
    type Error = GifError;

    fn try_from(v: i32) -> GifResult<Self> {
        match v {
            -1 => Ok(Self::Auto),
            0 => Ok(Self::Unspecified),
            1 => Ok(Self::Keep),
            2 => Ok(Self::RestoreBackground),
            3 => Ok(Self::RestorePrevious),
            n => Err(GifError::validation(format!("dispose {n} out of range -1..=3"))),
        }
    }
}

/// Error-diffusion kernel requested from the encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DitherKernel {
    /// Floyd–Steinberg.
    FloydSteinberg,
    /// Simplified 3-neighbour Floyd–Steinberg.
    FalseFloydSteinberg,
    /// Stucki.
    Stucki,
    /// Atkinson.
    Atkinson,
}

/// Dithering request passed through to the encoder.
///
/// Wire form is `false`, `true` (Floyd–Steinberg) or a kernel name with an optional
/// `-serpentine` suffix, e.g. `"Atkinson-serpentine"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "DitherValue")]
pub enum Dither {
    /// Nearest palette color.
    #[default]
    Off,
    /// Error diffusion.
    Kernel {
        /// Diffusion matrix.
        kernel: DitherKernel,
        /// Alternate scan direction per row.
        serpentine: bool,
    },
}

impl Dither {
    /// Parse a kernel name such as `FloydSteinberg` or `Stucki-serpentine`.
    pub fn parse(s: &str) -> GifResult<Self> {
        let (name, serpentine) = match s.strip_suffix("-serpentine") {
            Some(name) => (name, true),
            None => (s, false),
        };
        let kernel = match name {
            "FloydSteinberg" => DitherKernel::FloydSteinberg,
            "FalseFloydSteinberg" => DitherKernel::FalseFloydSteinberg,
            "Stucki" => DitherKernel::Stucki,
            "Atkinson" => DitherKernel::Atkinson,
            _ => return Err(GifError::validation(format!("unknown dither kernel '{s}'"))),
        };
        Ok(Self::Kernel { kernel, serpentine })
    }
}

/// Wire forms accepted for [`Dither`].
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum DitherValue {
    /// `false` disables, `true` selects Floyd–Steinberg.
    Flag(bool),
    /// Kernel name.
    Kernel(String),
}

impl TryFrom<DitherValue> for Dither {
    type Error = GifError;

    fn try_from(v: DitherValue) -> GifResult<Self> {
        match v {
            DitherValue::Flag(false) => Ok(Self::Off),
            DitherValue::Flag(true) => Ok(Self::Kernel {
                kernel: DitherKernel::FloydSteinberg,
                serpentine: false,
            }),
            DitherValue::Kernel(s) => Self::parse(&s),
        }
    }
}

/// Mutable session configuration, edited between runs.
///
/// A run never reads this directly: `start()` snapshots it into a [`RunConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Worker cap (>= 1).
    pub workers: usize,
    /// Loop behavior.
    pub repeat: Repeat,
    /// Canvas fill for drawable frame sources.
    pub background: Rgba8,
    /// Encoder quality (>= 1).
    pub quality: u32,
    /// Output width in pixels.
    pub width: Option<u32>,
    /// Output height in pixels.
    pub height: Option<u32>,
    /// Default transparency marker for new frames.
    pub transparent: Option<Rgb8>,
    /// Dithering request.
    pub dither: Dither,
    /// Share one palette computed from the first frame across all frames.
    pub global_palette: bool,
    /// Default delay for new frames, in milliseconds.
    pub delay_ms: u32,
    /// Default disposal for new frames.
    pub dispose: DisposeMode,
    /// Fail the run if no worker completes within this window.
    pub worker_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            repeat: Repeat::Infinite,
            background: Rgba8::BLACK,
            quality: DEFAULT_QUALITY,
            width: None,
            height: None,
            transparent: None,
            dither: Dither::Off,
            global_palette: false,
            delay_ms: DEFAULT_DELAY_MS,
            dispose: DisposeMode::Auto,
            worker_timeout: None,
        }
    }
}

impl SessionConfig {
    /// Merge the options that are set. Nothing changes unless every set value is valid.
    pub fn apply(&mut self, opts: &SessionOptions) -> GifResult<()> {
        let mut next = self.clone();
        if let Some(workers) = opts.workers {
            if workers == 0 {
                return Err(GifError::validation("workers must be >= 1"));
            }
            next.workers = workers;
        }
        if let Some(quality) = opts.quality {
            if quality == 0 {
                return Err(GifError::validation("quality must be >= 1"));
            }
            next.quality = quality;
        }
        if let Some(width) = opts.width {
            next.width = Some(positive("width", width)?);
        }
        if let Some(height) = opts.height {
            next.height = Some(positive("height", height)?);
        }
        if let Some(repeat) = opts.repeat {
            next.repeat = repeat;
        }
        if let Some(background) = opts.background {
            next.background = background;
        }
        if let Some(transparent) = opts.transparent {
            next.transparent = Some(transparent);
        }
        if let Some(dither) = opts.dither {
            next.dither = dither;
        }
        if let Some(global_palette) = opts.global_palette {
            next.global_palette = global_palette;
        }
        if let Some(delay) = opts.delay {
            next.delay_ms = delay;
        }
        if let Some(dispose) = opts.dispose {
            next.dispose = dispose;
        }
        if let Some(ms) = opts.worker_timeout_ms {
            if ms == 0 {
                return Err(GifError::validation("workerTimeoutMs must be >= 1"));
            }
            next.worker_timeout = Some(Duration::from_millis(ms));
        }
        *self = next;
        Ok(())
    }

    /// Snapshot for one run. Fails with `MissingDimensions` while width or height is unset.
    pub(crate) fn freeze(&self) -> GifResult<RunConfig> {
        let (Some(width), Some(height)) = (self.width, self.height) else {
            return Err(GifError::MissingDimensions);
        };
        Ok(RunConfig {
            workers: self.workers,
            width,
            height,
            quality: self.quality,
            dither: self.dither,
            repeat: self.repeat,
            background: self.background,
            global_palette: self.global_palette,
            worker_timeout: self.worker_timeout,
        })
    }
}

pub(crate) fn positive(name: &str, v: u32) -> GifResult<u32> {
    if v == 0 {
        return Err(GifError::validation(format!("{name} must be > 0")));
    }
    Ok(v)
}

/// Immutable per-run configuration captured at `start()`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RunConfig {
    pub(crate) workers: usize,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) quality: u32,
    pub(crate) dither: Dither,
    pub(crate) repeat: Repeat,
    pub(crate) background: Rgba8,
    pub(crate) global_palette: bool,
    pub(crate) worker_timeout: Option<Duration>,
}

impl RunConfig {
    /// RGBA8 byte length of one full frame.
    pub(crate) fn frame_bytes(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/session.rs"]
mod tests;
