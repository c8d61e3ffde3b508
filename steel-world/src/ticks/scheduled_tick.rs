//! Scheduled tick types.

use std::cmp::Ordering;

use steel_utils::BlockPos;

/// A tick waiting to fire at a position.
///
/// `T` identifies what is ticked; the liquid level uses the liquid kind, so
/// a cell that changed kind in the meantime does not run a stale tick.
#[derive(Debug, Clone)]
pub struct ScheduledTick<T> {
    /// What is being ticked.
    pub tick_type: T,
    /// The position of the ticked cell.
    pub pos: BlockPos,
    /// The absolute game tick at which this fires.
    pub trigger_tick: u64,
    /// Scheduling order, used to run ticks of the same game tick first in,
    /// first out.
    pub sub_tick_order: u64,
}

impl<T> ScheduledTick<T> {
    /// Creates a new scheduled tick.
    pub const fn new(tick_type: T, pos: BlockPos, trigger_tick: u64, sub_tick_order: u64) -> Self {
        Self {
            tick_type,
            pos,
            trigger_tick,
            sub_tick_order,
        }
    }
}

impl<T> PartialEq for ScheduledTick<T> {
    fn eq(&self, other: &Self) -> bool {
        self.trigger_tick == other.trigger_tick && self.sub_tick_order == other.sub_tick_order
    }
}

impl<T> Eq for ScheduledTick<T> {}

impl<T> PartialOrd for ScheduledTick<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScheduledTick<T> {
    /// `BinaryHeap` is a max-heap, so earlier ticks compare greater.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .trigger_tick
            .cmp(&self.trigger_tick)
            .then_with(|| other.sub_tick_order.cmp(&self.sub_tick_order))
    }
}

/// Deduplication key of a scheduled tick. Ignores timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickKey<T> {
    /// The position of the ticked cell.
    pub pos: BlockPos,
    /// What is being ticked.
    pub tick_type: T,
}

impl<T: Copy> From<&ScheduledTick<T>> for TickKey<T> {
    fn from(tick: &ScheduledTick<T>) -> Self {
        Self {
            pos: tick.pos,
            tick_type: tick.tick_type,
        }
    }
}
