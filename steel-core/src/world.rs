//! The interface the liquid engine needs from the block grid that hosts it.

use steel_utils::math::Vector3;
use steel_utils::{BlockPos, WorldRange};

use crate::block::BlockState;
use crate::event::LiquidHandler;
use crate::fluid::LiquidState;
use crate::item::ItemStack;

/// Sounds the liquid engine plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    /// Lava meeting water.
    Fizz,
}

/// A block grid the liquid engine can read and mutate.
///
/// The host guarantees that no other liquid tick mutates the touched region
/// while one engine call is running.
pub trait LiquidWorld {
    /// The main layer of the cell at `pos`. Positions outside the world are air.
    fn block(&self, pos: BlockPos) -> BlockState;

    /// The liquid at `pos`: the main layer if it is a liquid, otherwise the
    /// liquid a displacer block is hosting.
    fn liquid(&self, pos: BlockPos) -> Option<LiquidState>;

    /// Replaces the main layer of `pos`, dropping any hosted liquid.
    fn set_block(&mut self, pos: BlockPos, state: BlockState);

    /// Places or removes the liquid at `pos`.
    ///
    /// A displacer block that accepts the liquid keeps its place and hosts the
    /// liquid; otherwise the liquid becomes the main layer. Removing clears the
    /// hosted liquid if there is one, or turns a main layer liquid into air.
    fn set_liquid(&mut self, pos: BlockPos, liquid: Option<LiquidState>);

    /// Requests a scheduled tick for the liquid at `pos` after `delay` ticks.
    fn schedule_block_update(&mut self, pos: BlockPos, delay: u32);

    /// The vertical bounds of the world.
    fn range(&self) -> WorldRange;

    /// Whether the dimension is ultrawarm, which makes lava flow faster.
    fn ultrawarm(&self) -> bool {
        false
    }

    /// Spawns an item entity at `pos` moving with `velocity`.
    fn drop_item(&mut self, pos: Vector3<f64>, stack: ItemStack, velocity: Vector3<f64>);

    /// Plays a sound at `pos`.
    fn play_sound(&mut self, pos: Vector3<f64>, sound: Sound);

    /// The handler asked before every liquid mutation.
    fn handler(&self) -> &dyn LiquidHandler;
}
