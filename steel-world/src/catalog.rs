//! Blocks of the level beyond the ones the liquid engine knows itself.
//!
//! Plants are washed away by liquids; fences, slabs and stairs hold water and
//! stop flow through their closed faces.

use steel_core::block::{Block, BlockRef, SimpleBlock};
use steel_core::fluid::{LiquidDisplacer, LiquidKind, LiquidState};
use steel_core::world::LiquidWorld;
use steel_utils::{BlockPos, Direction, ResourceLocation};

/// Short grass. Liquids wash it away and it drops itself.
pub static SHORT_GRASS: SimpleBlock = SimpleBlock::removable("short_grass", true);
/// A dandelion. Liquids wash it away and it drops itself.
pub static DANDELION: SimpleBlock = SimpleBlock::removable("dandelion", true);
/// Fire. Liquids put it out without drops.
pub static FIRE: SimpleBlock = SimpleBlock::removable("fire", false);
/// Glass, a full block liquids cannot enter.
pub static GLASS: SimpleBlock = SimpleBlock::solid("glass");

/// An oak fence. Holds water without closing any face.
pub static OAK_FENCE: Fence = Fence {
    key: ResourceLocation::vanilla_static("oak_fence"),
};
/// An oak slab in the lower half of its cell.
pub static OAK_SLAB_BOTTOM: Slab = Slab {
    key: ResourceLocation::vanilla_static("oak_slab"),
    top: false,
};
/// An oak slab in the upper half of its cell.
pub static OAK_SLAB_TOP: Slab = Slab {
    key: ResourceLocation::vanilla_static("oak_slab"),
    top: true,
};

static OAK_STAIRS: [Stairs; 4] = [
    Stairs::oak(Direction::North),
    Stairs::oak(Direction::South),
    Stairs::oak(Direction::West),
    Stairs::oak(Direction::East),
];

/// Upright oak stairs whose back faces `facing`, or `None` if `facing` is
/// not horizontal.
#[must_use]
pub fn oak_stairs(facing: Direction) -> Option<BlockRef> {
    let index = match facing {
        Direction::North => 0,
        Direction::South => 1,
        Direction::West => 2,
        Direction::East => 3,
        Direction::Up | Direction::Down => return None,
    };
    Some(&OAK_STAIRS[index])
}

/// Only water can share a cell with a block.
fn waterloggable(liquid: LiquidState) -> bool {
    liquid.kind() == LiquidKind::Water
}

/// A fence post. Water passes through it in every direction.
pub struct Fence {
    key: ResourceLocation,
}

impl Block for Fence {
    fn key(&self) -> &ResourceLocation {
        &self.key
    }

    fn as_liquid_displacer(&self) -> Option<&dyn LiquidDisplacer> {
        Some(self)
    }
}

impl LiquidDisplacer for Fence {
    fn can_displace(&self, liquid: LiquidState) -> bool {
        waterloggable(liquid)
    }

    fn side_closed(&self, _pos: BlockPos, _side: BlockPos, _world: &dyn LiquidWorld) -> bool {
        false
    }
}

/// A half block. Its solid face is the bottom of its cell for a bottom slab,
/// the top for a top slab.
pub struct Slab {
    key: ResourceLocation,
    top: bool,
}

impl Block for Slab {
    fn key(&self) -> &ResourceLocation {
        &self.key
    }

    fn as_liquid_displacer(&self) -> Option<&dyn LiquidDisplacer> {
        Some(self)
    }
}

impl LiquidDisplacer for Slab {
    fn can_displace(&self, liquid: LiquidState) -> bool {
        waterloggable(liquid)
    }

    fn side_closed(&self, pos: BlockPos, side: BlockPos, _world: &dyn LiquidWorld) -> bool {
        if self.top {
            side == pos.above()
        } else {
            side == pos.below()
        }
    }
}

/// Upright stairs. The bottom face and the full back face are closed.
pub struct Stairs {
    key: ResourceLocation,
    facing: Direction,
}

impl Stairs {
    const fn oak(facing: Direction) -> Self {
        Self {
            key: ResourceLocation::vanilla_static("oak_stairs"),
            facing,
        }
    }
}

impl Block for Stairs {
    fn key(&self) -> &ResourceLocation {
        &self.key
    }

    fn as_liquid_displacer(&self) -> Option<&dyn LiquidDisplacer> {
        Some(self)
    }
}

impl LiquidDisplacer for Stairs {
    fn can_displace(&self, liquid: LiquidState) -> bool {
        waterloggable(liquid)
    }

    fn side_closed(&self, pos: BlockPos, side: BlockPos, _world: &dyn LiquidWorld) -> bool {
        side == pos.below() || side == pos.relative(self.facing)
    }
}
