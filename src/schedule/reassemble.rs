//! Paginated per-frame output → one contiguous GIF byte stream.
//!
//! Each frame contributes its full pages at `page_size` stride plus the first `cursor` bytes of
//! its last page. The allocated length follows the historical rule in [`assembled_len`], where
//! the final frame's tail term is `page_size - cursor` rather than `cursor`; unused bytes at the
//! end stay zero.

use crate::foundation::error::{GifError, GifResult};
use crate::worker::result::EncodedFrame;
use anyhow::Context as _;
use std::borrow::Borrow;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// MIME type of every artifact.
pub const GIF_MEDIA_TYPE: &str = "image/gif";

/// The finished animation.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    media_type: &'static str,
    bytes: Arc<[u8]>,
}

impl Artifact {
    /// Always [`GIF_MEDIA_TYPE`].
    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the encoded bytes.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the artifact holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the bytes to `path`, creating parent directories as needed.
    pub fn write_to(&self, path: impl AsRef<Path>) -> GifResult<()> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(())
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn ensure_parent_dir(path: &Path) -> GifResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Length the reassembled buffer is allocated with.
///
/// Every frame but the last adds `(pages - 1) * page_size + cursor`; the last adds
/// `(pages - 1) * page_size + (page_size - cursor)`.
pub fn assembled_len<F: Borrow<EncodedFrame>>(frames: &[F]) -> usize {
    let last = frames.len().saturating_sub(1);
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let frame = frame.borrow();
            let full = frame.pages.len().saturating_sub(1) * frame.page_size;
            if i == last {
                full + frame.page_size.saturating_sub(frame.cursor)
            } else {
                full + frame.cursor
            }
        })
        .sum()
}

/// Concatenate `frames` (already in frame order) into an [`Artifact`].
///
/// All frames must share one page size. If the allocated length from [`assembled_len`] cannot
/// hold every valid byte, the buffer grows to fit; bytes are never truncated.
#[tracing::instrument(skip_all, fields(frames = frames.len()))]
pub fn reassemble<F: Borrow<EncodedFrame>>(frames: &[F]) -> GifResult<Artifact> {
    let Some(first) = frames.first() else {
        return Err(GifError::NoFrames);
    };
    let page_size = first.borrow().page_size;
    for frame in frames {
        let frame = frame.borrow();
        frame.validate()?;
        if frame.page_size != page_size {
            return Err(GifError::invalid_result(format!(
                "frame {} uses page size {}, expected {page_size}",
                frame.index, frame.page_size
            )));
        }
    }

    let allocated = assembled_len(frames);
    let needed: usize = frames.iter().map(|f| f.borrow().byte_len()).sum();
    if needed > allocated {
        tracing::warn!(
            allocated,
            needed,
            "final frame tail exceeds the allocated length; growing buffer"
        );
    }

    let mut buf = vec![0u8; allocated.max(needed)];
    let mut offset = 0usize;
    for frame in frames {
        let frame = frame.borrow();
        if let Some((tail, full)) = frame.pages.split_last() {
            for page in full {
                buf[offset..offset + page_size].copy_from_slice(&page[..page_size]);
                offset += page_size;
            }
            buf[offset..offset + frame.cursor].copy_from_slice(&tail[..frame.cursor]);
            offset += frame.cursor;
        }
    }
    tracing::debug!(len = buf.len(), written = offset, "reassembled artifact");

    Ok(Artifact {
        media_type: GIF_MEDIA_TYPE,
        bytes: buf.into(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/reassemble.rs"]
mod tests;
