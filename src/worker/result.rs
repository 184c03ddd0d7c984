use crate::foundation::core::FrameIndex;
use crate::foundation::error::{GifError, GifResult};
use crate::worker::task::Palette;

/// Page size used by [`PageWriter::new`].
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Encoded bytes for one frame, as fixed-capacity pages.
///
/// Every page but the last is full to `page_size`; the last page is valid up to `cursor`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedFrame {
    /// Frame this result belongs to.
    pub index: FrameIndex,
    /// Pages in write order.
    pub pages: Vec<Box<[u8]>>,
    /// Capacity of every page.
    pub page_size: usize,
    /// Valid bytes in the last page.
    pub cursor: usize,
    /// Palette computed during shared-palette discovery.
    pub palette: Option<Palette>,
}

impl EncodedFrame {
    /// Package the pages of a finished writer.
    pub fn from_writer(index: FrameIndex, writer: PageWriter, palette: Option<Palette>) -> Self {
        let page_size = writer.page_size;
        let cursor = writer.cursor;
        Self {
            index,
            pages: writer.pages,
            page_size,
            cursor,
            palette,
        }
    }

    /// Number of valid bytes across all pages.
    pub fn byte_len(&self) -> usize {
        match self.pages.len() {
            0 => 0,
            n => (n - 1) * self.page_size + self.cursor,
        }
    }

    /// Check the page contract.
    pub fn validate(&self) -> GifResult<()> {
        if self.page_size == 0 {
            return Err(GifError::invalid_result(format!(
                "frame {}: page size is zero",
                self.index
            )));
        }
        let Some((tail, full)) = self.pages.split_last() else {
            return Err(GifError::invalid_result(format!(
                "frame {}: no pages",
                self.index
            )));
        };
        if self.cursor > self.page_size {
            return Err(GifError::invalid_result(format!(
                "frame {}: cursor {} exceeds page size {}",
                self.index, self.cursor, self.page_size
            )));
        }
        if let Some(short) = full.iter().position(|p| p.len() < self.page_size) {
            return Err(GifError::invalid_result(format!(
                "frame {}: page {short} holds fewer than {} bytes",
                self.index, self.page_size
            )));
        }
        if tail.len() < self.cursor {
            return Err(GifError::invalid_result(format!(
                "frame {}: last page holds {} bytes, cursor is {}",
                self.index,
                tail.len(),
                self.cursor
            )));
        }
        Ok(())
    }
}

/// Growable byte writer that stores its output in fixed-capacity pages.
///
/// A new page is allocated on the first write past a full page, so a stream that ends exactly
/// on a page boundary has `cursor == page_size`.
#[derive(Debug)]
pub struct PageWriter {
    pages: Vec<Box<[u8]>>,
    page_size: usize,
    cursor: usize,
}

impl PageWriter {
    /// Writer with [`DEFAULT_PAGE_SIZE`] pages.
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Writer with `page_size`-byte pages (at least 1).
    pub fn with_page_size(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            pages: vec![vec![0u8; page_size].into_boxed_slice()],
            page_size,
            cursor: 0,
        }
    }

    /// Append one byte.
    pub fn write_byte(&mut self, b: u8) {
        if self.cursor >= self.page_size {
            self.new_page();
        }
        if let Some(page) = self.pages.last_mut() {
            page[self.cursor] = b;
            self.cursor += 1;
        }
    }

    /// Append a slice.
    pub fn write_bytes(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            if self.cursor >= self.page_size {
                self.new_page();
            }
            let room = self.page_size - self.cursor;
            let n = room.min(bytes.len());
            if let Some(page) = self.pages.last_mut() {
                page[self.cursor..self.cursor + n].copy_from_slice(&bytes[..n]);
            }
            self.cursor += n;
            bytes = &bytes[n..];
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        (self.pages.len() - 1) * self.page_size + self.cursor
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn new_page(&mut self) {
        self.pages
            .push(vec![0u8; self.page_size].into_boxed_slice());
        self.cursor = 0;
    }
}

impl Default for PageWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::io::Write for PageWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/worker/result.rs"]
mod tests;
