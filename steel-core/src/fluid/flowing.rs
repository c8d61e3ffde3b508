//! Core liquid flowing behavior.
//!
//! [`tick_liquid`] decides, for one liquid cell, whether it recedes, falls or
//! spreads. [`flow_into`] applies a single flow step to a target cell.

use smallvec::SmallVec;
use steel_utils::math::Vector3;
use steel_utils::{BlockPos, Direction};

use crate::block::{BlockState, Breakable};
use crate::event::EventContext;
use crate::world::LiquidWorld;

use super::path::calculate_liquid_paths;
use super::{LiquidDisplacer, LiquidState};

/// Runs one tick of flow logic for `liquid` at `pos`.
///
/// An unsupported cell recedes by twice its spread decay (or disappears once
/// that would leave nothing). A supported cell first falls into the cell
/// below if it can, then spreads sideways towards the nearest drop, or into
/// every horizontal neighbour if there is no drop within reach.
pub fn tick_liquid(world: &mut dyn LiquidWorld, pos: BlockPos, liquid: LiquidState) {
    if !liquid.is_source() && !source_around(&*world, pos, liquid) {
        recede(world, pos, liquid);
        return;
    }

    let displacer = world.block(pos).liquid_displacer();
    let below = pos.below();
    let can_flow_below = can_flow_into(&*world, liquid, below, false)
        && !displacer.is_some_and(|d| d.side_closed(pos, below, &*world))
        && !face_closed(&*world, below, pos);

    let mut liquid = liquid;
    if liquid.falling() && !can_flow_below {
        // Falling stays falling until support below returns.
        liquid = liquid.with_depth(LiquidState::MAX_DEPTH, true);
    } else if can_flow_below {
        flow_into(
            world,
            liquid.with_depth(LiquidState::MAX_DEPTH, true),
            pos,
            below,
            true,
        );
    }

    if liquid.depth() <= liquid.spread_decay() {
        return;
    }
    if !liquid.is_source() && can_flow_below {
        return;
    }

    let paths = calculate_liquid_paths(&*world, pos, liquid, displacer);
    if paths.is_empty() {
        spread_outwards(world, liquid, pos, displacer);
        return;
    }

    let mut first_steps: SmallVec<[BlockPos; 4]> = SmallVec::new();
    for path in &paths {
        let step = path.first_step();
        if !first_steps.contains(&step) {
            first_steps.push(step);
        }
    }
    for step in first_steps {
        flow_into(world, liquid, pos, step, false);
    }
}

/// Shrinks or removes an unsupported liquid.
fn recede(world: &mut dyn LiquidWorld, pos: BlockPos, liquid: LiquidState) {
    let depth = liquid.depth();
    let after = if depth <= 4 {
        None
    } else {
        Some(liquid.with_depth(depth - 2 * liquid.spread_decay(), false))
    };

    let mut ctx = EventContext::new();
    world
        .handler()
        .handle_liquid_decay(&mut ctx, pos, liquid, after);
    if ctx.is_cancelled() {
        log::debug!("{} decay at {pos} was cancelled", liquid.kind());
        return;
    }

    world.set_liquid(pos, after);
    if let Some(after) = after {
        world.schedule_block_update(pos, after.tick_delay(world.ultrawarm()));
    }
}

/// Flows into all four horizontal neighbours not fenced off by `displacer`.
fn spread_outwards(
    world: &mut dyn LiquidWorld,
    liquid: LiquidState,
    pos: BlockPos,
    displacer: Option<&dyn LiquidDisplacer>,
) {
    for direction in Direction::HORIZONTAL {
        let neighbour = pos.relative(direction);
        if displacer.is_some_and(|d| d.side_closed(pos, neighbour, &*world)) {
            continue;
        }
        flow_into(world, liquid, pos, neighbour, false);
    }
}

/// Checks whether a liquid of the same kind as `liquid` at `pos` is fed by a
/// neighbour: a source, a falling column directly above, or a deeper liquid.
/// A falling cell is fed by any liquid of its kind directly above. The cell
/// below never counts.
#[must_use]
pub fn source_around(world: &dyn LiquidWorld, pos: BlockPos, liquid: LiquidState) -> bool {
    pos.neighbours(world.range()).any(|(direction, neighbour)| {
        if direction == Direction::Down {
            return false;
        }
        let Some(side) = world.liquid(neighbour) else {
            return false;
        };
        if side.kind() != liquid.kind() {
            return false;
        }
        if face_closed(world, neighbour, pos) || face_closed(world, pos, neighbour) {
            return false;
        }
        side.is_source()
            || (direction == Direction::Up && (side.falling() || liquid.falling()))
            || side.depth() > liquid.depth()
    })
}

/// Checks whether the displacer at `at`, if any, closes its face towards
/// `side`.
pub(super) fn face_closed(world: &dyn LiquidWorld, at: BlockPos, side: BlockPos) -> bool {
    world
        .block(at)
        .liquid_displacer()
        .is_some_and(|d| d.side_closed(at, side, world))
}

/// Checks whether `liquid` could flow into the cell at `pos`.
///
/// Air, removable blocks, liquids and empty displacers that accept the liquid
/// can be flowed into. Sideways flow additionally requires a liquid in the
/// cell to be of the same kind and not a source.
#[must_use]
pub fn can_flow_into(
    world: &dyn LiquidWorld,
    liquid: LiquidState,
    pos: BlockPos,
    sideways: bool,
) -> bool {
    if !world.range().contains(pos.y()) {
        return false;
    }
    match world.block(pos) {
        BlockState::Liquid(existing) => {
            !sideways || (existing.kind() == liquid.kind() && !existing.is_source())
        }
        BlockState::Block(block) => {
            if block.is_air() || block.as_liquid_removable().is_some() {
                return true;
            }
            block
                .as_liquid_displacer()
                .is_some_and(|d| world.liquid(pos).is_none() && d.can_displace(liquid))
        }
    }
}

/// Flows `liquid` from `from` into the cell at `into`.
///
/// Lateral flow loses the liquid's spread decay; a fall (`falling`) keeps the
/// depth. A displacer at `into` whose face towards `from` is closed refuses
/// the flow. Returns `true` if the cell now holds at least as much of the
/// liquid as the flow would have produced.
pub fn flow_into(
    world: &mut dyn LiquidWorld,
    liquid: LiquidState,
    from: BlockPos,
    into: BlockPos,
    falling: bool,
) -> bool {
    if !world.range().contains(into.y()) {
        return false;
    }

    let new_depth = if falling {
        liquid.depth()
    } else {
        liquid.depth().saturating_sub(liquid.spread_decay())
    };
    if new_depth == 0 && !falling {
        return false;
    }
    let new_liquid = liquid.with_depth(new_depth, falling);

    let existing = world.block(into);
    if existing
        .liquid_displacer()
        .is_some_and(|d| d.side_closed(into, from, &*world))
    {
        return false;
    }
    if let Some(existing_liquid) = existing.as_liquid() {
        if existing_liquid.kind() != liquid.kind() {
            existing_liquid
                .behaviour()
                .harden(world, into, existing_liquid, Some(from));
            return false;
        }
        if existing_liquid.depth() >= new_depth || existing_liquid.falling() {
            return true;
        }
    }

    if let Some(displacer) = existing.liquid_displacer() {
        if world.liquid(into).is_some() {
            return false;
        }
        if existing.as_block().is_some_and(|b| b.as_liquid_removable().is_none()) {
            if !displacer.can_displace(new_liquid) {
                return false;
            }
            return place_liquid(world, from, into, new_liquid, existing);
        }
    }

    let removable = match existing {
        BlockState::Liquid(_) => None,
        BlockState::Block(block) => match block.as_liquid_removable() {
            Some(removable) => Some((block, removable)),
            None => return false,
        },
    };

    let mut ctx = EventContext::new();
    world
        .handler()
        .handle_liquid_flow(&mut ctx, from, into, new_liquid, existing);
    if ctx.is_cancelled() {
        log::debug!("{} flow {from} -> {into} was cancelled", liquid.kind());
        return false;
    }

    if let Some((block, removable)) = removable
        && !block.is_air()
    {
        world.set_block(into, BlockState::air());
        if removable.has_liquid_drops() {
            let center = into.center();
            for stack in removable.break_drops() {
                world.drop_item(center, stack, scatter_velocity());
            }
        }
    }

    world.set_liquid(into, Some(new_liquid));
    world.schedule_block_update(into, new_liquid.tick_delay(world.ultrawarm()));
    true
}

/// Puts `liquid` into the liquid layer of the displacer at `into`.
fn place_liquid(
    world: &mut dyn LiquidWorld,
    from: BlockPos,
    into: BlockPos,
    liquid: LiquidState,
    existing: BlockState,
) -> bool {
    let mut ctx = EventContext::new();
    world
        .handler()
        .handle_liquid_flow(&mut ctx, from, into, liquid, existing);
    if ctx.is_cancelled() {
        return false;
    }
    world.set_liquid(into, Some(liquid));
    world.schedule_block_update(into, liquid.tick_delay(world.ultrawarm()));
    true
}

/// A small random push for items washed out of their block.
fn scatter_velocity() -> Vector3<f64> {
    Vector3::new(
        rand::random::<f64>() * 0.1 - 0.05,
        0.1,
        rand::random::<f64>() * 0.1 - 0.05,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::vanilla_blocks;
    use crate::fluid::LiquidKind;
    use crate::fluid::test_world::{ClosedTowards, TestWorld, WATERLOGGABLE};

    fn water(depth: u8) -> LiquidState {
        LiquidState::new(LiquidKind::Water, depth, false)
    }

    fn platform() -> TestWorld {
        let mut world = TestWorld::new();
        world.floor(0, 16, &vanilla_blocks::STONE);
        world
    }

    #[test]
    fn test_source_spreads_to_all_sides_on_flat_ground() {
        let mut world = platform();
        let origin = BlockPos::new(0, 1, 0);
        world.put_liquid(origin, water(8));

        tick_liquid(&mut world, origin, water(8));

        for (_, neighbour) in origin.horizontal_neighbours() {
            assert_eq!(world.liquid(neighbour), Some(water(7)));
            assert!(world.scheduled.contains(&(neighbour, 5)));
        }
        assert_eq!(world.liquid(origin), Some(water(8)));
    }

    #[test]
    fn test_spread_follows_shortest_path_only() {
        let mut world = platform();
        let origin = BlockPos::new(0, 1, 0);
        world.put_liquid(origin, water(8));
        world.clear(BlockPos::new(2, 0, 0));

        tick_liquid(&mut world, origin, water(8));

        assert_eq!(world.liquid(BlockPos::new(1, 1, 0)), Some(water(7)));
        assert_eq!(world.liquid(BlockPos::new(-1, 1, 0)), None);
        assert_eq!(world.liquid(BlockPos::new(0, 1, 1)), None);
        assert_eq!(world.liquid(BlockPos::new(0, 1, -1)), None);
    }

    #[test]
    fn test_equal_drops_on_both_sides_are_both_followed() {
        let mut world = platform();
        let origin = BlockPos::new(0, 1, 0);
        world.put_liquid(origin, water(8));
        world.clear(BlockPos::new(2, 0, 0));
        world.clear(BlockPos::new(-2, 0, 0));

        tick_liquid(&mut world, origin, water(8));

        assert_eq!(world.liquid(BlockPos::new(1, 1, 0)), Some(water(7)));
        assert_eq!(world.liquid(BlockPos::new(-1, 1, 0)), Some(water(7)));
        assert_eq!(world.liquid(BlockPos::new(0, 1, 1)), None);
        assert_eq!(world.liquid(BlockPos::new(0, 1, -1)), None);
    }

    #[test]
    fn test_unsupported_liquid_recedes_then_vanishes() {
        let mut world = platform();
        let pos = BlockPos::new(0, 1, 0);
        world.put_liquid(pos, water(7));

        tick_liquid(&mut world, pos, water(7));
        assert_eq!(world.liquid(pos), Some(water(5)));
        tick_liquid(&mut world, pos, water(5));
        assert_eq!(world.liquid(pos), Some(water(3)));
        tick_liquid(&mut world, pos, water(3));
        assert_eq!(world.liquid(pos), None);
        assert!(world.block(pos).is_air());
    }

    #[test]
    fn test_source_falls_as_full_column() {
        let mut world = TestWorld::new();
        let origin = BlockPos::new(0, 10, 0);
        world.put_liquid(origin, water(8));

        tick_liquid(&mut world, origin, water(8));

        let below = world.liquid(origin.below()).expect("water fell");
        assert_eq!(below.depth(), 8);
        assert!(below.falling());
    }

    #[test]
    fn test_falling_liquid_lands_and_spreads_at_full_depth() {
        let mut world = platform();
        let pos = BlockPos::new(0, 1, 0);
        let falling = LiquidState::new(LiquidKind::Water, 8, true);
        world.put_liquid(pos.above(), water(8));
        world.put_liquid(pos, falling);

        tick_liquid(&mut world, pos, falling);

        assert_eq!(world.liquid(pos), Some(falling));
        assert_eq!(world.liquid(BlockPos::new(1, 1, 0)), Some(water(7)));
    }

    #[test]
    fn test_flowing_liquid_over_drop_does_not_spread_sideways() {
        let mut world = TestWorld::new();
        let pos = BlockPos::new(0, 5, 0);
        world.put_liquid(pos.offset(1, 0, 0), water(8));
        world.put_liquid(pos, water(7));

        tick_liquid(&mut world, pos, water(7));

        assert_eq!(
            world.liquid(pos.below()),
            Some(LiquidState::new(LiquidKind::Water, 8, true))
        );
        assert_eq!(world.liquid(pos.offset(-1, 0, 0)), None);
    }

    #[test]
    fn test_thin_liquid_does_not_spread() {
        let mut world = platform();
        let pos = BlockPos::new(0, 1, 0);
        world.put_liquid(pos.offset(1, 0, 0), water(2));
        world.put_liquid(pos, water(1));

        tick_liquid(&mut world, pos, water(1));

        assert_eq!(world.liquid(pos.offset(-1, 0, 0)), None);
    }

    #[test]
    fn test_stable_source_is_idempotent() {
        let mut world = platform();
        let origin = BlockPos::new(0, 1, 0);
        world.put_liquid(origin, water(8));
        for (_, neighbour) in origin.horizontal_neighbours() {
            world.put_block(neighbour, &vanilla_blocks::STONE);
        }
        world.reset_log();

        tick_liquid(&mut world, origin, water(8));
        assert_eq!(world.mutations, 0);
    }

    #[test]
    fn test_flow_into_keeps_deeper_liquid() {
        let mut world = platform();
        let into = BlockPos::new(1, 1, 0);
        world.put_liquid(into, water(7));
        world.reset_log();

        assert!(flow_into(&mut world, water(8), BlockPos::new(0, 1, 0), into, false));
        assert_eq!(world.mutations, 0);
        assert_eq!(world.liquid(into), Some(water(7)));

        assert!(flow_into(&mut world, water(5), BlockPos::new(0, 1, 0), into, false));
        assert_eq!(world.liquid(into), Some(water(7)));
    }

    #[test]
    fn test_flow_into_raises_shallower_liquid() {
        let mut world = platform();
        let into = BlockPos::new(1, 1, 0);
        world.put_liquid(into, water(3));

        assert!(flow_into(&mut world, water(8), BlockPos::new(0, 1, 0), into, false));
        assert_eq!(world.liquid(into), Some(water(7)));
    }

    #[test]
    fn test_flow_into_solid_is_refused() {
        let mut world = platform();
        let into = BlockPos::new(1, 1, 0);
        world.put_block(into, &vanilla_blocks::OBSIDIAN);

        assert!(!flow_into(&mut world, water(8), BlockPos::new(0, 1, 0), into, false));
        assert!(world.block(into).is(&vanilla_blocks::OBSIDIAN));
    }

    #[test]
    fn test_flow_into_removable_drops_items_once() {
        let mut world = platform();
        let into = BlockPos::new(1, 1, 0);
        world.put_block(into, &crate::fluid::test_world::FLOWER);

        assert!(flow_into(&mut world, water(8), BlockPos::new(0, 1, 0), into, false));
        assert_eq!(world.liquid(into), Some(water(7)));
        assert_eq!(world.drops.len(), 1);
        let (at, stack, velocity) = &world.drops[0];
        assert_eq!(*at, into.center());
        assert_eq!(stack.count, 1);
        assert!(velocity.x.abs() <= 0.05 && velocity.z.abs() <= 0.05);
    }

    #[test]
    fn test_flow_into_removable_without_drops() {
        let mut world = platform();
        let into = BlockPos::new(1, 1, 0);
        world.put_block(into, &crate::fluid::test_world::SNOW_LAYER);

        assert!(flow_into(&mut world, water(8), BlockPos::new(0, 1, 0), into, false));
        assert!(world.drops.is_empty());
        assert_eq!(world.liquid(into), Some(water(7)));
    }

    #[test]
    fn test_cancelled_flow_leaves_target_untouched() {
        let mut world = platform();
        world.cancel_all = true;
        let into = BlockPos::new(1, 1, 0);
        world.put_block(into, &crate::fluid::test_world::FLOWER);

        assert!(!flow_into(&mut world, water(8), BlockPos::new(0, 1, 0), into, false));
        assert!(world.block(into).is(&crate::fluid::test_world::FLOWER));
        assert!(world.drops.is_empty());
    }

    #[test]
    fn test_cancelled_decay_keeps_liquid() {
        let mut world = platform();
        world.cancel_all = true;
        let pos = BlockPos::new(0, 1, 0);
        world.put_liquid(pos, water(7));

        tick_liquid(&mut world, pos, water(7));
        assert_eq!(world.liquid(pos), Some(water(7)));
    }

    #[test]
    fn test_displacer_takes_liquid_in_its_layer() {
        let mut world = platform();
        let into = BlockPos::new(1, 1, 0);
        world.put_block(into, &WATERLOGGABLE);

        assert!(flow_into(&mut world, water(8), BlockPos::new(0, 1, 0), into, false));
        assert!(world.block(into).is(&WATERLOGGABLE));
        assert_eq!(world.liquid(into), Some(water(7)));

        // A filled displacer refuses any further flow.
        assert!(!flow_into(
            &mut world,
            LiquidState::source(LiquidKind::Lava),
            BlockPos::new(2, 1, 0),
            into,
            false
        ));
        assert_eq!(world.liquid(into), Some(water(7)));
    }

    #[test]
    fn test_displacer_closed_face_stops_spread() {
        let mut world = platform();
        let origin = BlockPos::new(0, 1, 0);
        let closed = BlockPos::new(1, 1, 0);
        world.put_displacer(origin, ClosedTowards(closed));
        world.put_liquid(origin, water(8));

        tick_liquid(&mut world, origin, water(8));

        assert_eq!(world.liquid(closed), None);
        assert_eq!(world.liquid(BlockPos::new(-1, 1, 0)), Some(water(7)));
    }

    #[test]
    fn test_closed_top_below_stops_the_fall() {
        let mut world = TestWorld::new();
        let origin = BlockPos::new(0, 10, 0);
        let below = origin.below();
        world.put_displacer(below, ClosedTowards(origin));
        world.put_liquid(origin, water(8));

        tick_liquid(&mut world, origin, water(8));

        assert_eq!(world.liquid(below), None);
        assert_eq!(world.liquid(origin), Some(water(8)));
        // Without the fall the source spreads towards the drops around it.
        assert_eq!(world.liquid(origin.offset(1, 0, 0)), Some(water(7)));
    }

    #[test]
    fn test_target_face_closed_towards_origin_refuses_flow() {
        let mut world = platform();
        let origin = BlockPos::new(0, 1, 0);
        let closed = BlockPos::new(1, 1, 0);
        world.put_displacer(closed, ClosedTowards(origin));
        world.put_liquid(origin, water(8));

        assert!(!flow_into(&mut world, water(8), origin, closed, false));
        assert_eq!(world.liquid(closed), None);

        tick_liquid(&mut world, origin, water(8));
        assert_eq!(world.liquid(closed), None);
        assert_eq!(world.liquid(BlockPos::new(-1, 1, 0)), Some(water(7)));

        // The open faces still take the liquid.
        assert!(flow_into(&mut world, water(8), BlockPos::new(1, 1, 1), closed, false));
        assert_eq!(world.liquid(closed), Some(water(7)));
    }

    #[test]
    fn test_falling_cell_is_fed_by_any_liquid_above() {
        let mut world = TestWorld::new();
        let pos = BlockPos::new(0, 5, 0);
        let falling = LiquidState::new(LiquidKind::Water, 8, true);
        world.put_liquid(pos.above(), water(7));
        world.put_liquid(pos, falling);

        assert!(source_around(&world, pos, falling));
        assert!(!source_around(&world, pos, water(7)));

        // Fed from above, the falling cell keeps falling instead of receding.
        tick_liquid(&mut world, pos, falling);
        assert_eq!(world.liquid(pos), Some(falling));
        assert_eq!(world.liquid(pos.below()), Some(falling));
    }

    #[test]
    fn test_source_around_ignores_below_and_other_kinds() {
        let mut world = platform();
        let pos = BlockPos::new(0, 2, 0);
        world.put_liquid(pos.below(), water(8));
        world.put_liquid(pos.offset(1, 0, 0), LiquidState::source(LiquidKind::Lava));
        assert!(!source_around(&world, pos, water(5)));

        world.put_liquid(pos.offset(-1, 0, 0), water(6));
        assert!(source_around(&world, pos, water(5)));
        assert!(!source_around(&world, pos, water(6)));

        world.put_liquid(pos.above(), LiquidState::new(LiquidKind::Water, 8, true));
        assert!(source_around(&world, pos, water(6)));
    }

    #[test]
    fn test_source_around_respects_closed_neighbour_face() {
        let mut world = platform();
        let pos = BlockPos::new(0, 1, 0);
        let neighbour = BlockPos::new(1, 1, 0);
        world.put_displacer(neighbour, ClosedTowards(pos));
        world.put_liquid(neighbour, water(8));

        assert!(!source_around(&world, pos, water(5)));
    }

    #[test]
    fn test_can_flow_into_sideways_rules() {
        let mut world = platform();
        let pos = BlockPos::new(1, 1, 0);
        assert!(can_flow_into(&world, water(8), pos, true));

        world.put_liquid(pos, water(8));
        assert!(!can_flow_into(&world, water(8), pos, true));
        assert!(can_flow_into(&world, water(8), pos, false));

        world.put_liquid(pos, water(4));
        assert!(can_flow_into(&world, water(8), pos, true));
        assert!(!can_flow_into(&world, LiquidState::source(LiquidKind::Lava), pos, true));

        assert!(!can_flow_into(&world, water(8), BlockPos::new(0, 0, 0), false));
        assert!(!can_flow_into(&world, water(8), BlockPos::new(0, -1000, 0), false));
    }
}
