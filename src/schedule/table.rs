use crate::foundation::error::{GifError, GifResult};
use crate::worker::result::EncodedFrame;

/// One slot per frame, filled as results arrive in any order.
///
/// Complete when no slot is empty. Only the scheduler writes to it.
#[derive(Debug)]
pub(crate) struct ResultTable {
    slots: Vec<Option<EncodedFrame>>,
    filled: usize,
}

impl ResultTable {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
            filled: 0,
        }
    }

    /// Store `frame` in the slot named by its index.
    pub(crate) fn insert(&mut self, frame: EncodedFrame) -> GifResult<()> {
        let index = frame.index;
        let len = self.slots.len();
        let slot = self.slots.get_mut(index.0).ok_or_else(|| {
            GifError::invalid_result(format!("frame index {index} outside table of {len}"))
        })?;
        if slot.is_some() {
            return Err(GifError::invalid_result(format!(
                "duplicate result for frame {index}"
            )));
        }
        *slot = Some(frame);
        self.filled += 1;
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn filled(&self) -> usize {
        self.filled
    }

    pub(crate) fn is_full(&self) -> bool {
        self.filled == self.slots.len()
    }

    /// Results in frame order. Fails while any slot is empty.
    pub(crate) fn ordered(&self) -> GifResult<Vec<&EncodedFrame>> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.as_ref().ok_or_else(|| {
                    GifError::invalid_state(format!("result table slot {i} is still empty"))
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/table.rs"]
mod tests;
