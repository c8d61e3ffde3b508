//! Capabilities a block can have towards liquids.

use steel_utils::BlockPos;

use crate::block::Breakable;
use crate::world::LiquidWorld;

use super::LiquidState;

/// A block that liquids destroy when flowing into its cell.
///
/// Liquid drops reuse the block's regular break drops, so every removable
/// block is also [`Breakable`].
pub trait LiquidRemovable: Breakable {
    /// Whether the block drops its items when washed away.
    fn has_liquid_drops(&self) -> bool;
}

/// A block that can share its cell with a liquid (waterlogging) and may block
/// flow through some of its faces.
pub trait LiquidDisplacer: Send + Sync {
    /// Whether `liquid` may enter the block's liquid layer.
    fn can_displace(&self, liquid: LiquidState) -> bool;

    /// Whether the face of the block at `pos` shared with `side` stops liquids.
    fn side_closed(&self, pos: BlockPos, side: BlockPos, world: &dyn LiquidWorld) -> bool;
}
