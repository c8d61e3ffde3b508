//! An in-memory level hosting the liquid engine.
//!
//! The level stores two layers per cell, runs scheduled liquid ticks through
//! per-chunk tick queues, samples random ticks per chunk section and delivers
//! neighbour updates after every mutation the engine makes.

use std::collections::VecDeque;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::{FxHashMap, FxHashSet};
use steel_core::block::{BlockRef, BlockState};
use steel_core::event::LiquidHandler;
use steel_core::fluid::{self, LiquidKind, LiquidState};
use steel_core::item::ItemStack;
use steel_core::world::{LiquidWorld, Sound};
use steel_utils::math::Vector3;
use steel_utils::{BlockPos, ChunkPos, WorldRange};

use crate::chunk::{Cell, LevelChunk, SECTION_SIZE};
use crate::config::SimulationConfig;
use crate::ticks::{LevelChunkTicks, LevelTicks};

/// Neighbour updates delivered after one engine call at most. Stops runaway
/// update chains.
const MAX_CHAINED_UPDATES: usize = 1 << 16;

/// An item entity spawned by the level.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedItem {
    /// Where the item spawned.
    pub pos: Vector3<f64>,
    /// The dropped items.
    pub stack: ItemStack,
    /// The initial velocity of the item.
    pub velocity: Vector3<f64>,
}

/// What happened during one game tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// The game time after the tick.
    pub game_time: u64,
    /// Scheduled liquid ticks run.
    pub scheduled_ticks: usize,
    /// Random ticks that hit a liquid.
    pub random_ticks: usize,
    /// Neighbour updates delivered.
    pub neighbour_updates: usize,
}

/// A block grid with liquid simulation.
pub struct Level {
    range: WorldRange,
    ultrawarm: bool,
    random_tick_speed: u32,
    max_scheduled_ticks: usize,
    game_time: u64,
    chunks: FxHashMap<ChunkPos, LevelChunk>,
    liquid_ticks: LevelTicks<LiquidKind>,
    pending_updates: VecDeque<BlockPos>,
    queued_updates: FxHashSet<BlockPos>,
    handler: Arc<dyn LiquidHandler>,
    random: StdRng,
    dropped_items: Vec<DroppedItem>,
    sounds: Vec<(Vector3<f64>, Sound)>,
}

impl Level {
    /// Creates an empty level.
    #[must_use]
    pub fn new(config: &SimulationConfig, handler: Arc<dyn LiquidHandler>) -> Self {
        Self {
            range: config.range(),
            ultrawarm: config.ultrawarm,
            random_tick_speed: config.random_tick_speed,
            max_scheduled_ticks: config.max_scheduled_ticks_per_tick,
            game_time: 0,
            chunks: FxHashMap::default(),
            liquid_ticks: LevelTicks::new(),
            pending_updates: VecDeque::new(),
            queued_updates: FxHashSet::default(),
            handler,
            random: StdRng::seed_from_u64(config.seed),
            dropped_items: Vec::new(),
            sounds: Vec::new(),
        }
    }

    /// The number of game ticks run so far.
    #[must_use]
    pub const fn game_time(&self) -> u64 {
        self.game_time
    }

    /// Number of pending scheduled liquid ticks.
    #[must_use]
    pub fn pending_ticks(&self) -> usize {
        self.liquid_ticks.count()
    }

    /// Items spawned so far.
    #[must_use]
    pub fn dropped_items(&self) -> &[DroppedItem] {
        &self.dropped_items
    }

    /// Sounds played so far, with their positions.
    #[must_use]
    pub fn sounds(&self) -> &[(Vector3<f64>, Sound)] {
        &self.sounds
    }

    /// Iterates every liquid cell of the level.
    pub fn liquids(&self) -> impl Iterator<Item = (BlockPos, LiquidState)> + '_ {
        self.chunks.values().flat_map(|chunk| chunk.liquids())
    }

    /// Places a block as a player would, notifying the neighbours.
    pub fn place_block(&mut self, pos: BlockPos, block: BlockRef) {
        self.set_block(pos, BlockState::Block(block));
        self.flush_updates();
    }

    /// Places a liquid as a player would. The placed liquid gets an update of
    /// its own, which schedules its first tick or hardens it on the spot.
    pub fn place_liquid(&mut self, pos: BlockPos, liquid: LiquidState) {
        self.set_liquid(pos, Some(liquid));
        self.queue_update(pos);
        self.flush_updates();
    }

    /// Clears a cell as a player breaking it would.
    pub fn remove_block(&mut self, pos: BlockPos) {
        self.set_block(pos, BlockState::air());
        self.flush_updates();
    }

    /// Fills a horizontal square of `block` around `center`, without updates.
    pub fn fill_layer(&mut self, center: BlockPos, radius: i32, block: BlockRef) {
        for x in -radius..=radius {
            for z in -radius..=radius {
                self.write_cell(
                    center.offset(x, 0, z),
                    Cell {
                        block: BlockState::Block(block),
                        liquid: None,
                    },
                );
            }
        }
    }

    /// Advances the level by one game tick.
    pub fn tick(&mut self) -> TickSummary {
        self.game_time += 1;
        let mut summary = TickSummary {
            game_time: self.game_time,
            ..TickSummary::default()
        };

        let due = self.liquid_ticks.tick(self.game_time, self.max_scheduled_ticks);
        for (pos, kind) in due {
            // The cell may have changed kind or lost its liquid since.
            if self.liquid(pos).is_some_and(|liquid| liquid.kind() == kind) {
                fluid::scheduled_tick(self, pos);
                summary.scheduled_ticks += 1;
                summary.neighbour_updates += self.flush_updates();
            }
        }

        if self.random_tick_speed > 0 {
            self.random_ticks(&mut summary);
        }

        if summary.scheduled_ticks > 0 || summary.random_ticks > 0 {
            log::debug!(
                "tick {}: {} scheduled, {} random, {} neighbour updates",
                summary.game_time,
                summary.scheduled_ticks,
                summary.random_ticks,
                summary.neighbour_updates
            );
        }
        summary
    }

    /// Ticks until no scheduled tick is pending or `max_ticks` ran. Returns
    /// the number of game ticks run.
    pub fn run_until_settled(&mut self, max_ticks: u64) -> u64 {
        let mut ran = 0;
        while ran < max_ticks && self.pending_ticks() > 0 {
            self.tick();
            ran += 1;
        }
        ran
    }

    fn random_ticks(&mut self, summary: &mut TickSummary) {
        let mut sections: Vec<(ChunkPos, i32)> = self
            .chunks
            .values()
            .flat_map(|chunk| {
                chunk
                    .non_empty_sections()
                    .map(move |(_, base_y)| (chunk.pos, base_y))
            })
            .collect();
        // Hash order is not stable, and the seeded generator should be.
        sections.sort_unstable();

        let size = SECTION_SIZE as i32;
        for (chunk_pos, base_y) in sections {
            for _ in 0..self.random_tick_speed {
                let pos = BlockPos::new(
                    chunk_pos.0.x * size + self.random.random_range(0..size),
                    base_y + self.random.random_range(0..size),
                    chunk_pos.0.y * size + self.random.random_range(0..size),
                );
                if self.liquid(pos).is_some() {
                    fluid::random_tick(self, pos);
                    summary.random_ticks += 1;
                    summary.neighbour_updates += self.flush_updates();
                }
            }
        }
    }

    /// Delivers queued neighbour updates, including those the updates cause.
    fn flush_updates(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(pos) = self.pending_updates.pop_front() {
            if delivered >= MAX_CHAINED_UPDATES {
                log::warn!(
                    "Dropped {} neighbour updates after a chain of {delivered}",
                    self.pending_updates.len() + 1
                );
                self.pending_updates.clear();
                self.queued_updates.clear();
                break;
            }
            self.queued_updates.remove(&pos);
            delivered += 1;
            fluid::neighbour_update_tick(self, pos);
        }
        delivered
    }

    fn queue_update(&mut self, pos: BlockPos) {
        if self.queued_updates.insert(pos) {
            self.pending_updates.push_back(pos);
        }
    }

    fn cell(&self, pos: BlockPos) -> Cell {
        if !self.range.contains(pos.y()) {
            return Cell::empty();
        }
        self.chunks
            .get(&pos.chunk_pos())
            .map_or_else(Cell::empty, |chunk| chunk.get(pos))
    }

    fn write_cell(&mut self, pos: BlockPos, cell: Cell) {
        if !self.range.contains(pos.y()) {
            log::trace!("Ignored write outside the level at {pos}");
            return;
        }
        let chunk_pos = pos.chunk_pos();
        let range = self.range;
        let liquid_ticks = &mut self.liquid_ticks;
        self.chunks
            .entry(chunk_pos)
            .or_insert_with(|| {
                liquid_ticks.add_container(chunk_pos, LevelChunkTicks::new());
                LevelChunk::new(chunk_pos, range)
            })
            .set(pos, cell);
    }

    fn notify_neighbours(&mut self, pos: BlockPos) {
        for (_, neighbour) in pos.neighbours(self.range) {
            self.queue_update(neighbour);
        }
    }

    #[cfg(test)]
    fn discard_updates(&mut self) {
        self.pending_updates.clear();
        self.queued_updates.clear();
    }
}

impl LiquidWorld for Level {
    fn block(&self, pos: BlockPos) -> BlockState {
        self.cell(pos).block
    }

    fn liquid(&self, pos: BlockPos) -> Option<LiquidState> {
        self.cell(pos).liquid()
    }

    fn set_block(&mut self, pos: BlockPos, state: BlockState) {
        self.write_cell(
            pos,
            Cell {
                block: state,
                liquid: None,
            },
        );
        self.notify_neighbours(pos);
    }

    fn set_liquid(&mut self, pos: BlockPos, liquid: Option<LiquidState>) {
        let mut cell = self.cell(pos);
        match liquid {
            Some(liquid) => {
                if cell
                    .block
                    .liquid_displacer()
                    .is_some_and(|displacer| displacer.can_displace(liquid))
                {
                    cell.liquid = Some(liquid);
                } else {
                    cell = Cell {
                        block: BlockState::Liquid(liquid),
                        liquid: None,
                    };
                }
            }
            None => {
                if cell.liquid.take().is_none() && cell.block.as_liquid().is_some() {
                    cell.block = BlockState::air();
                }
            }
        }
        self.write_cell(pos, cell);
        self.notify_neighbours(pos);
    }

    fn schedule_block_update(&mut self, pos: BlockPos, delay: u32) {
        let Some(liquid) = self.liquid(pos) else {
            log::trace!("Skipped scheduling {pos}, it holds no liquid");
            return;
        };
        self.liquid_ticks
            .schedule(pos, liquid.kind(), self.game_time, delay);
    }

    fn range(&self) -> WorldRange {
        self.range
    }

    fn ultrawarm(&self) -> bool {
        self.ultrawarm
    }

    fn drop_item(&mut self, pos: Vector3<f64>, stack: ItemStack, velocity: Vector3<f64>) {
        self.dropped_items.push(DroppedItem {
            pos,
            stack,
            velocity,
        });
    }

    fn play_sound(&mut self, pos: Vector3<f64>, sound: Sound) {
        self.sounds.push((pos, sound));
    }

    fn handler(&self) -> &dyn LiquidHandler {
        self.handler.as_ref()
    }
}
