//! Liquid behavior system.
//!
//! This module handles liquid mechanics: spreading, falling, receding,
//! waterlogging and water/lava hardening.
//!
//! The host calls [`scheduled_tick`], [`random_tick`] and
//! [`neighbour_update_tick`]; everything else is driven from there.

mod displacement;
pub mod flowing;
mod harden;
mod lava;
mod liquid;
pub mod path;
pub mod queue_pool;
mod water;

#[cfg(test)]
pub(crate) mod test_world;

use steel_utils::BlockPos;

use crate::world::LiquidWorld;

pub use displacement::{LiquidDisplacer, LiquidRemovable};
pub use flowing::{can_flow_into, flow_into, source_around, tick_liquid};
pub use lava::LavaLiquid;
pub use liquid::{LiquidBehaviour, LiquidError, LiquidKind, LiquidState};
pub use path::{LiquidPath, calculate_liquid_paths};
pub use water::WaterLiquid;

/// Runs the scheduled tick of the liquid at `pos`, if there still is one.
pub fn scheduled_tick(world: &mut dyn LiquidWorld, pos: BlockPos) {
    if let Some(liquid) = world.liquid(pos) {
        liquid.behaviour().scheduled_tick(world, pos, liquid);
    }
}

/// Runs a random tick for the liquid at `pos`.
///
/// Still liquids ignore random ticks; they are only re-evaluated when a
/// neighbour update schedules them.
pub fn random_tick(world: &mut dyn LiquidWorld, pos: BlockPos) {
    if let Some(liquid) = world.liquid(pos)
        && !liquid.still()
    {
        liquid.behaviour().scheduled_tick(world, pos, liquid);
    }
}

/// Notifies the liquid at `pos` that a neighbouring cell changed.
pub fn neighbour_update_tick(world: &mut dyn LiquidWorld, pos: BlockPos) {
    if let Some(liquid) = world.liquid(pos) {
        liquid.behaviour().neighbour_update_tick(world, pos, liquid);
    }
}
