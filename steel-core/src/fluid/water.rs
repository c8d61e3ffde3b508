//! Water liquid implementation.

use steel_utils::BlockPos;

use crate::block::vanilla_blocks;
use crate::event::EventContext;
use crate::world::LiquidWorld;

use super::flowing::{can_flow_into, tick_liquid};
use super::harden::commit_harden;
use super::{LiquidBehaviour, LiquidKind, LiquidState};

/// Water behavior.
///
/// Water spreads one level per step and ticks every 5 game ticks. It never
/// hardens on its own; lava flowing into it turns the lava to stone.
pub struct WaterLiquid;

impl WaterLiquid {
    /// Ticks between scheduled water updates.
    pub const TICK_DELAY: u32 = 5;

    /// Turns a depth 7 cell between two sources into a new still source.
    ///
    /// Returns the new state if a source formed.
    fn form_source(
        world: &mut dyn LiquidWorld,
        pos: BlockPos,
        liquid: LiquidState,
    ) -> Option<LiquidState> {
        if liquid.depth() != LiquidState::MAX_DEPTH - 1 || liquid.falling() {
            return None;
        }

        let sources = pos
            .horizontal_neighbours()
            .filter(|(_, neighbour)| {
                world
                    .liquid(*neighbour)
                    .is_some_and(|side| side.kind() == LiquidKind::Water && side.is_source())
            })
            .count();
        if sources < 2 {
            return None;
        }
        // Keep flowing down instead while the cell below takes water.
        if can_flow_into(&*world, liquid, pos.below(), true) {
            return None;
        }

        let source = LiquidState::still_source(LiquidKind::Water);
        let mut ctx = EventContext::new();
        let replaced = world.block(pos);
        world
            .handler()
            .handle_liquid_flow(&mut ctx, pos, pos, source, replaced);
        if ctx.is_cancelled() {
            return None;
        }

        world.set_liquid(pos, Some(source));
        log::trace!("water source formed at {pos}");
        Some(source)
    }
}

impl LiquidBehaviour for WaterLiquid {
    fn kind(&self) -> LiquidKind {
        LiquidKind::Water
    }

    fn tick_delay(&self, _ultrawarm: bool) -> u32 {
        Self::TICK_DELAY
    }

    fn scheduled_tick(&self, world: &mut dyn LiquidWorld, pos: BlockPos, liquid: LiquidState) {
        let liquid = Self::form_source(world, pos, liquid).unwrap_or(liquid);
        tick_liquid(world, pos, liquid);
    }

    fn neighbour_update_tick(&self, world: &mut dyn LiquidWorld, pos: BlockPos, _liquid: LiquidState) {
        world.schedule_block_update(pos, Self::TICK_DELAY);
    }

    fn harden(
        &self,
        world: &mut dyn LiquidWorld,
        pos: BlockPos,
        liquid: LiquidState,
        flown_into_by: Option<BlockPos>,
    ) -> bool {
        let Some(from) = flown_into_by else {
            return false;
        };

        let above = pos.above();
        if let Some(lava) = world.liquid(above)
            && lava.kind() == LiquidKind::Lava
        {
            return commit_harden(world, above, lava, Some(liquid), &vanilla_blocks::STONE);
        }
        if let Some(lava) = world.liquid(from)
            && lava.kind() == LiquidKind::Lava
        {
            return commit_harden(world, from, lava, Some(liquid), &vanilla_blocks::COBBLESTONE);
        }
        false
    }
}
