//! Committing a water/lava collision.

use steel_utils::BlockPos;

use crate::block::{BlockRef, BlockState};
use crate::event::EventContext;
use crate::world::{LiquidWorld, Sound};

use super::LiquidState;

/// Offers the hardening of `liquid` at `pos` into `result` to the handler and
/// applies it unless cancelled. `other` is the liquid it collided with.
///
/// Returns `true` if the cell was replaced.
pub(super) fn commit_harden(
    world: &mut dyn LiquidWorld,
    pos: BlockPos,
    liquid: LiquidState,
    other: Option<LiquidState>,
    result: BlockRef,
) -> bool {
    let mut ctx = EventContext::new();
    world
        .handler()
        .handle_liquid_harden(&mut ctx, pos, liquid, other, result);
    if ctx.is_cancelled() {
        log::debug!("{} at {pos} hardening into {} was cancelled", liquid.kind(), result.key());
        return false;
    }

    world.play_sound(pos.center(), Sound::Fizz);
    world.set_block(pos, BlockState::Block(result));
    log::trace!("{} at {pos} hardened into {}", liquid.kind(), result.key());
    true
}
