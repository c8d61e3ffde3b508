//! The block contracts the liquid engine consumes.
//!
//! The full block catalog lives with the host. The engine only needs to know
//! a block's key, whether it is air, and which liquid capabilities it has.

use std::fmt;

use smallvec::{SmallVec, smallvec};
use steel_utils::ResourceLocation;

use crate::fluid::{LiquidDisplacer, LiquidRemovable, LiquidState};
use crate::item::ItemStack;

/// Drops produced when a block is broken.
pub type Drops = SmallVec<[ItemStack; 2]>;

/// A block that yields items when broken.
pub trait Breakable {
    /// The items the block drops when broken without a tool.
    fn break_drops(&self) -> Drops;
}

/// A block type of the catalog.
pub trait Block: Send + Sync + 'static {
    /// The registry key of the block.
    fn key(&self) -> &ResourceLocation;

    /// Returns `true` for air.
    fn is_air(&self) -> bool {
        false
    }

    /// The block's removal behaviour if liquids may wash it away.
    fn as_liquid_removable(&self) -> Option<&dyn LiquidRemovable> {
        None
    }

    /// The block's displacement behaviour if it can share its cell with a liquid.
    fn as_liquid_displacer(&self) -> Option<&dyn LiquidDisplacer> {
        None
    }
}

/// A reference to a block of the catalog.
pub type BlockRef = &'static dyn Block;

/// The main layer of one grid cell.
#[derive(Clone, Copy)]
pub enum BlockState {
    /// A non-liquid block, air included.
    Block(BlockRef),
    /// A liquid occupying the whole cell.
    Liquid(LiquidState),
}

impl BlockState {
    /// The air state.
    #[must_use]
    pub fn air() -> Self {
        BlockState::Block(&vanilla_blocks::AIR)
    }

    /// Returns `true` if this cell holds air.
    #[must_use]
    pub fn is_air(&self) -> bool {
        matches!(self, BlockState::Block(block) if block.is_air())
    }

    /// Returns the liquid filling this cell, if any.
    #[must_use]
    pub const fn as_liquid(&self) -> Option<LiquidState> {
        match self {
            BlockState::Liquid(liquid) => Some(*liquid),
            BlockState::Block(_) => None,
        }
    }

    /// Returns the block in this cell unless it is a liquid.
    #[must_use]
    pub const fn as_block(&self) -> Option<BlockRef> {
        match self {
            BlockState::Block(block) => Some(*block),
            BlockState::Liquid(_) => None,
        }
    }

    /// The displacement behaviour of the block in this cell.
    #[must_use]
    pub fn liquid_displacer(&self) -> Option<&'static dyn LiquidDisplacer> {
        self.as_block().and_then(|block| block.as_liquid_displacer())
    }

    /// Returns `true` if this cell holds the given block.
    #[must_use]
    pub fn is(&self, block: &dyn Block) -> bool {
        self.as_block().is_some_and(|own| own.key() == block.key())
    }

    /// The registry key of whatever occupies this cell.
    #[must_use]
    pub fn key(&self) -> ResourceLocation {
        match self {
            BlockState::Block(block) => block.key().clone(),
            BlockState::Liquid(liquid) => liquid.encoded_key(),
        }
    }
}

impl PartialEq for BlockState {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (BlockState::Block(a), BlockState::Block(b)) => a.key() == b.key(),
            (BlockState::Liquid(a), BlockState::Liquid(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockState::Block(block) => write!(f, "Block({})", block.key()),
            BlockState::Liquid(liquid) => write!(f, "{liquid:?}"),
        }
    }
}

impl From<BlockRef> for BlockState {
    fn from(block: BlockRef) -> Self {
        BlockState::Block(block)
    }
}

impl From<LiquidState> for BlockState {
    fn from(liquid: LiquidState) -> Self {
        BlockState::Liquid(liquid)
    }
}

/// How a [`SimpleBlock`] reacts to liquids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiquidInteraction {
    /// Liquids replace it silently.
    Air,
    /// Liquids cannot enter the cell.
    Solid,
    /// Liquids wash it away, dropping its items if the flag is set.
    Removable { drops: bool },
}

/// A block without state or special behaviour.
pub struct SimpleBlock {
    key: ResourceLocation,
    interaction: LiquidInteraction,
}

impl SimpleBlock {
    /// An air-like block.
    #[must_use]
    pub const fn air(path: &'static str) -> Self {
        Self {
            key: ResourceLocation::vanilla_static(path),
            interaction: LiquidInteraction::Air,
        }
    }

    /// A full block liquids cannot enter.
    #[must_use]
    pub const fn solid(path: &'static str) -> Self {
        Self {
            key: ResourceLocation::vanilla_static(path),
            interaction: LiquidInteraction::Solid,
        }
    }

    /// A block liquids destroy when flowing into it.
    #[must_use]
    pub const fn removable(path: &'static str, drops: bool) -> Self {
        Self {
            key: ResourceLocation::vanilla_static(path),
            interaction: LiquidInteraction::Removable { drops },
        }
    }
}

impl Block for SimpleBlock {
    fn key(&self) -> &ResourceLocation {
        &self.key
    }

    fn is_air(&self) -> bool {
        self.interaction == LiquidInteraction::Air
    }

    fn as_liquid_removable(&self) -> Option<&dyn LiquidRemovable> {
        match self.interaction {
            LiquidInteraction::Solid => None,
            LiquidInteraction::Air | LiquidInteraction::Removable { .. } => Some(self),
        }
    }
}

impl Breakable for SimpleBlock {
    fn break_drops(&self) -> Drops {
        if self.interaction == LiquidInteraction::Air {
            return SmallVec::new();
        }
        smallvec![ItemStack::new(self.key.clone(), 1)]
    }
}

impl LiquidRemovable for SimpleBlock {
    fn has_liquid_drops(&self) -> bool {
        matches!(
            self.interaction,
            LiquidInteraction::Removable { drops: true }
        )
    }
}

/// The blocks the liquid engine itself reads or produces.
pub mod vanilla_blocks {
    use super::SimpleBlock;

    /// Air.
    pub static AIR: SimpleBlock = SimpleBlock::air("air");
    /// Stone, made when lava flows down onto water.
    pub static STONE: SimpleBlock = SimpleBlock::solid("stone");
    /// Cobblestone, made when flowing lava meets water.
    pub static COBBLESTONE: SimpleBlock = SimpleBlock::solid("cobblestone");
    /// Obsidian, made when a lava source meets water.
    pub static OBSIDIAN: SimpleBlock = SimpleBlock::solid("obsidian");
    /// Basalt, made when lava on soul soil touches blue ice.
    pub static BASALT: SimpleBlock = SimpleBlock::solid("basalt");
    /// Soul soil.
    pub static SOUL_SOIL: SimpleBlock = SimpleBlock::solid("soul_soil");
    /// Blue ice.
    pub static BLUE_ICE: SimpleBlock = SimpleBlock::solid("blue_ice");
}
