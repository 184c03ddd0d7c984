use crate::config::session::{Dither, DisposeMode, Repeat};
use crate::foundation::core::{Rgb8, Rgba8};
use crate::foundation::error::{GifError, GifResult};

/// Partial session configuration accepted by [`crate::EncodeSession::configure`].
///
/// Unset fields leave the current value alone. When parsed from JSON the keys are camelCase
/// (`globalPalette`, `workerTimeoutMs`) and unrecognized keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionOptions {
    /// Worker cap.
    pub workers: Option<usize>,
    /// Loop behavior.
    pub repeat: Option<Repeat>,
    /// Canvas fill for drawable frame sources.
    pub background: Option<Rgba8>,
    /// Encoder quality.
    pub quality: Option<u32>,
    /// Output width.
    pub width: Option<u32>,
    /// Output height.
    pub height: Option<u32>,
    /// Default transparency marker.
    pub transparent: Option<Rgb8>,
    /// Dithering request.
    pub dither: Option<Dither>,
    /// Shared-palette protocol.
    pub global_palette: Option<bool>,
    /// Default per-frame delay in milliseconds.
    pub delay: Option<u32>,
    /// Default per-frame disposal.
    pub dispose: Option<DisposeMode>,
    /// Stalled-worker timeout in milliseconds.
    pub worker_timeout_ms: Option<u64>,
}

impl SessionOptions {
    /// Parse options from a JSON object.
    pub fn from_json(value: &serde_json::Value) -> GifResult<Self> {
        if !value.is_object() {
            return Err(GifError::validation("session options must be a JSON object"));
        }
        serde_json::from_value(value.clone())
            .map_err(|e| GifError::validation(format!("parse session options: {e}")))
    }
}

/// Per-frame overrides accepted by [`crate::EncodeSession::add_frame`].
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameOptions {
    /// Display time in milliseconds; defaults to the session delay.
    pub delay: Option<u32>,
    /// Disposal; defaults to the session dispose mode.
    pub dispose: Option<DisposeMode>,
    /// Transparency marker; defaults to the session marker.
    pub transparent: Option<Rgb8>,
    /// Read a surface or drawable into a buffer now instead of at dispatch time.
    pub copy: bool,
}

impl FrameOptions {
    /// Options with only the delay set.
    pub fn with_delay(delay_ms: u32) -> Self {
        Self {
            delay: Some(delay_ms),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/options.rs"]
mod tests;
