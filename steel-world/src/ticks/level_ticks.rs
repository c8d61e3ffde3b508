//! Level-wide scheduled tick coordinator.

use std::collections::BinaryHeap;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use steel_utils::{BlockPos, ChunkPos};

use super::{LevelChunkTicks, ScheduledTick};

/// Scheduled ticks of all loaded chunks.
///
/// Each loaded chunk has a [`LevelChunkTicks`] container; `next_tick_for_container`
/// tracks the earliest trigger tick per chunk so chunks without due ticks are
/// skipped. Ticks of one game tick run in global scheduling order across chunks.
pub struct LevelTicks<T: Copy + Eq + Hash> {
    all_containers: FxHashMap<ChunkPos, LevelChunkTicks<T>>,
    next_tick_for_container: FxHashMap<ChunkPos, u64>,
    sub_tick_counter: u64,
}

impl<T: Copy + Eq + Hash> LevelTicks<T> {
    /// Creates an empty coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            all_containers: FxHashMap::default(),
            next_tick_for_container: FxHashMap::default(),
            sub_tick_counter: 0,
        }
    }

    /// Registers the container of a newly loaded chunk.
    pub fn add_container(&mut self, pos: ChunkPos, container: LevelChunkTicks<T>) {
        if let Some(next_tick) = container.peek() {
            self.next_tick_for_container.insert(pos, next_tick.trigger_tick);
        }
        self.all_containers.insert(pos, container);
    }

    /// Schedules a tick firing at `current_tick + delay`.
    ///
    /// Returns `false` if the chunk is not loaded or the (pos, type) already
    /// has a pending tick.
    pub fn schedule(&mut self, pos: BlockPos, tick_type: T, current_tick: u64, delay: u32) -> bool {
        let chunk_pos = pos.chunk_pos();
        let trigger_tick = current_tick + u64::from(delay);

        let Some(container) = self.all_containers.get_mut(&chunk_pos) else {
            log::warn!("Attempted to schedule tick in unloaded chunk {chunk_pos:?}");
            return false;
        };

        let tick = ScheduledTick::new(tick_type, pos, trigger_tick, self.sub_tick_counter);
        self.sub_tick_counter += 1;

        if !container.schedule(tick) {
            return false;
        }
        self.next_tick_for_container
            .entry(chunk_pos)
            .and_modify(|earliest| *earliest = (*earliest).min(trigger_tick))
            .or_insert(trigger_tick);
        true
    }

    /// Checks if a tick is pending for the given position and type.
    #[must_use]
    pub fn has_scheduled_tick(&self, pos: BlockPos, tick_type: T) -> bool {
        self.all_containers
            .get(&pos.chunk_pos())
            .is_some_and(|container| container.has_scheduled_tick(pos, tick_type))
    }

    /// Removes every tick due at or before `current_tick`, at most
    /// `max_ticks` of them, and returns them in firing order. Ticks over
    /// the budget stay queued for the next call.
    #[must_use]
    pub fn tick(&mut self, current_tick: u64, max_ticks: usize) -> Vec<(BlockPos, T)> {
        let chunks_to_tick: Vec<ChunkPos> = self
            .next_tick_for_container
            .iter()
            .filter(|(_, earliest)| **earliest <= current_tick)
            .map(|(pos, _)| *pos)
            .collect();

        // Merge the chunk queues by always taking the globally next tick.
        let mut merged_heap: BinaryHeap<(ScheduledTick<T>, ChunkPos)> = BinaryHeap::new();
        for chunk_pos in &chunks_to_tick {
            if let Some(container) = self.all_containers.get(chunk_pos)
                && let Some(tick) = container.peek()
                && tick.trigger_tick <= current_tick
            {
                merged_heap.push((tick.clone(), *chunk_pos));
            }
        }

        let mut result = Vec::new();
        while result.len() < max_ticks {
            let Some((_, chunk_pos)) = merged_heap.pop() else {
                break;
            };
            let Some(container) = self.all_containers.get_mut(&chunk_pos) else {
                continue;
            };
            if let Some(tick) = container.poll() {
                result.push((tick.pos, tick.tick_type));
            }
            if let Some(next) = container.peek()
                && next.trigger_tick <= current_tick
            {
                merged_heap.push((next.clone(), chunk_pos));
            }
        }

        for chunk_pos in chunks_to_tick {
            match self.all_containers.get(&chunk_pos).and_then(LevelChunkTicks::peek) {
                Some(next) => {
                    self.next_tick_for_container.insert(chunk_pos, next.trigger_tick);
                }
                None => {
                    self.next_tick_for_container.remove(&chunk_pos);
                }
            }
        }

        result
    }

    /// Total number of pending ticks.
    #[must_use]
    pub fn count(&self) -> usize {
        self.all_containers.values().map(LevelChunkTicks::count).sum()
    }
}

impl<T: Copy + Eq + Hash> Default for LevelTicks<T> {
    fn default() -> Self {
        Self::new()
    }
}
