//! Bounded pool of worker units.
//!
//! The pool owns every unit and tracks which are idle (a FIFO, so the longest-idle unit is
//! reused first) and which are busy (with the frame each one holds). All units report into one
//! completion channel; the scheduler is its only receiver.

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{GifError, GifResult};
use crate::worker::encoder::FrameEncoder;
use crate::worker::task::Task;
use crate::worker::unit::{Completion, UnitId, WorkerUnit};
use crossbeam_channel::Sender;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

pub(crate) struct WorkerPool {
    encoder: Arc<dyn FrameEncoder>,
    done_tx: Sender<Completion>,
    units: HashMap<UnitId, WorkerUnit>,
    idle: VecDeque<UnitId>,
    busy: HashMap<UnitId, FrameIndex>,
    next_id: u32,
}

impl WorkerPool {
    pub(crate) fn new(encoder: Arc<dyn FrameEncoder>, done_tx: Sender<Completion>) -> Self {
        Self {
            encoder,
            done_tx,
            units: HashMap::new(),
            idle: VecDeque::new(),
            busy: HashMap::new(),
            next_id: 0,
        }
    }

    /// Grow to `target` units; never shrinks. Returns the number of units available, capped at
    /// `target`.
    pub(crate) fn ensure_capacity(&mut self, target: usize) -> GifResult<usize> {
        while self.units.len() < target {
            let id = UnitId(self.next_id);
            self.next_id += 1;
            let unit = WorkerUnit::spawn(id, Arc::clone(&self.encoder), self.done_tx.clone())?;
            tracing::debug!(unit = id.0, "spawned worker");
            self.units.insert(id, unit);
            self.idle.push_back(id);
        }
        Ok(self.units.len().min(target))
    }

    pub(crate) fn len(&self) -> usize {
        self.units.len()
    }

    pub(crate) fn idle_count(&self) -> usize {
        self.idle.len()
    }

    pub(crate) fn busy_count(&self) -> usize {
        self.busy.len()
    }

    /// Longest-idle unit, if any.
    pub(crate) fn next_idle(&self) -> Option<UnitId> {
        self.idle.front().copied()
    }

    /// Move `unit` from idle to busy and send it `task`.
    pub(crate) fn dispatch(&mut self, unit: UnitId, task: Task) -> GifResult<()> {
        let Some(pos) = self.idle.iter().position(|&id| id == unit) else {
            return Err(GifError::WorkerBusy(unit.0));
        };
        let worker = self
            .units
            .get(&unit)
            .ok_or_else(|| GifError::invalid_state(format!("worker {unit} is not in the pool")))?;
        let index = task.index;
        worker.send(task)?;
        self.idle.remove(pos);
        self.busy.insert(unit, index);
        Ok(())
    }

    /// Completion handler: move `unit` back to idle.
    ///
    /// Returns the frame the unit was holding, or `None` when the unit is not busy in this pool
    /// (terminated, or a stray message); such results must be discarded.
    pub(crate) fn complete(&mut self, unit: UnitId) -> Option<FrameIndex> {
        let index = self.busy.remove(&unit)?;
        self.idle.push_back(unit);
        Some(index)
    }

    /// Drop every unit immediately. Busy units are detached; whatever they produce is lost.
    pub(crate) fn terminate_all(&mut self) {
        let busy = self.busy.len();
        for (_, unit) in self.units.drain() {
            unit.terminate();
        }
        self.idle.clear();
        self.busy.clear();
        tracing::debug!(busy, "terminated worker pool");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for (id, unit) in self.units.drain() {
            if self.busy.contains_key(&id) {
                unit.terminate();
            } else {
                unit.shutdown();
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/worker/pool.rs"]
mod tests;
