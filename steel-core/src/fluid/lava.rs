//! Lava liquid implementation.

use steel_utils::{BlockPos, Direction};

use crate::block::{BlockRef, vanilla_blocks};
use crate::world::LiquidWorld;

use super::flowing::tick_liquid;
use super::harden::commit_harden;
use super::{LiquidBehaviour, LiquidKind, LiquidState};

/// Lava behavior.
///
/// Lava spreads two levels per step, so it reaches half as far as water. It
/// ticks every 30 game ticks, or every 10 in an ultrawarm dimension.
pub struct LavaLiquid;

impl LavaLiquid {
    /// Ticks between scheduled lava updates.
    pub const TICK_DELAY: u32 = 30;
    /// Ticks between scheduled lava updates in an ultrawarm dimension.
    pub const ULTRAWARM_TICK_DELAY: u32 = 10;

    /// What the lava at `pos` turns into because of its own surroundings.
    fn proactive_result(
        world: &dyn LiquidWorld,
        pos: BlockPos,
        liquid: LiquidState,
    ) -> Option<(BlockRef, Option<LiquidState>)> {
        let on_soul_soil = world.block(pos.below()).is(&vanilla_blocks::SOUL_SOIL);
        let mut water = None;

        for (direction, neighbour) in pos.neighbours(world.range()) {
            if direction == Direction::Down {
                continue;
            }
            if on_soul_soil && world.block(neighbour).is(&vanilla_blocks::BLUE_ICE) {
                return Some((&vanilla_blocks::BASALT, None));
            }
            if water.is_none()
                && let Some(side) = world.liquid(neighbour)
                && side.kind() == LiquidKind::Water
            {
                water = Some(side);
            }
        }

        water.map(|water| (Self::result_for(liquid), Some(water)))
    }

    /// Sources turn into obsidian, flowing lava into cobblestone.
    fn result_for(liquid: LiquidState) -> BlockRef {
        if liquid.is_source() {
            &vanilla_blocks::OBSIDIAN
        } else {
            &vanilla_blocks::COBBLESTONE
        }
    }
}

impl LiquidBehaviour for LavaLiquid {
    fn kind(&self) -> LiquidKind {
        LiquidKind::Lava
    }

    fn tick_delay(&self, ultrawarm: bool) -> u32 {
        if ultrawarm {
            Self::ULTRAWARM_TICK_DELAY
        } else {
            Self::TICK_DELAY
        }
    }

    fn scheduled_tick(&self, world: &mut dyn LiquidWorld, pos: BlockPos, liquid: LiquidState) {
        if !self.harden(world, pos, liquid, None) {
            tick_liquid(world, pos, liquid);
        }
    }

    fn neighbour_update_tick(&self, world: &mut dyn LiquidWorld, pos: BlockPos, liquid: LiquidState) {
        if !self.harden(world, pos, liquid, None) {
            let delay = self.tick_delay(world.ultrawarm());
            world.schedule_block_update(pos, delay);
        }
    }

    fn harden(
        &self,
        world: &mut dyn LiquidWorld,
        pos: BlockPos,
        liquid: LiquidState,
        flown_into_by: Option<BlockPos>,
    ) -> bool {
        let hardening = match flown_into_by {
            None => Self::proactive_result(&*world, pos, liquid),
            Some(from) => world
                .liquid(from)
                .filter(|side| side.kind() == LiquidKind::Water)
                .map(|water| (Self::result_for(liquid), Some(water))),
        };

        match hardening {
            Some((result, other)) => commit_harden(world, pos, liquid, other, result),
            None => false,
        }
    }
}
