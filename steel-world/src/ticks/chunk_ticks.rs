//! Per-chunk scheduled tick storage.

use std::collections::BinaryHeap;
use std::hash::Hash;

use rustc_hash::FxHashSet;
use steel_utils::BlockPos;

use super::{ScheduledTick, TickKey};

/// Scheduled ticks of one chunk.
///
/// Holds a queue ordered by trigger time and a set preventing the same
/// (pos, type) from being scheduled twice. Scheduling an already pending
/// (pos, type) keeps the existing timing.
pub struct LevelChunkTicks<T: Copy + Eq + Hash> {
    tick_queue: BinaryHeap<ScheduledTick<T>>,
    ticks_per_position: FxHashSet<TickKey<T>>,
}

impl<T: Copy + Eq + Hash> LevelChunkTicks<T> {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_queue: BinaryHeap::new(),
            ticks_per_position: FxHashSet::default(),
        }
    }

    /// Schedules a tick unless one is already pending for its (pos, type).
    ///
    /// Returns `true` if the tick was added.
    pub fn schedule(&mut self, tick: ScheduledTick<T>) -> bool {
        if self.ticks_per_position.insert(TickKey::from(&tick)) {
            self.tick_queue.push(tick);
            true
        } else {
            false
        }
    }

    /// The next tick to fire, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&ScheduledTick<T>> {
        self.tick_queue.peek()
    }

    /// Removes and returns the next tick to fire.
    pub fn poll(&mut self) -> Option<ScheduledTick<T>> {
        let tick = self.tick_queue.pop()?;
        self.ticks_per_position.remove(&TickKey::from(&tick));
        Some(tick)
    }

    /// Checks if a tick is pending for the given position and type.
    #[must_use]
    pub fn has_scheduled_tick(&self, pos: BlockPos, tick_type: T) -> bool {
        self.ticks_per_position.contains(&TickKey { pos, tick_type })
    }

    /// Number of pending ticks.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tick_queue.len()
    }

    /// Returns `true` if no tick is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tick_queue.is_empty()
    }
}

impl<T: Copy + Eq + Hash> Default for LevelChunkTicks<T> {
    fn default() -> Self {
        Self::new()
    }
}
