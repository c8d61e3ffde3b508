//! An in-memory grid for liquid engine tests.

use rustc_hash::FxHashMap;
use steel_utils::math::Vector3;
use steel_utils::{BlockPos, ResourceLocation, WorldRange};

use crate::block::{Block, BlockRef, BlockState, SimpleBlock};
use crate::event::{EventContext, LiquidHandler};
use crate::item::ItemStack;
use crate::world::{LiquidWorld, Sound};

use super::{LiquidDisplacer, LiquidKind, LiquidState};

/// A removable block that drops itself.
pub static FLOWER: SimpleBlock = SimpleBlock::removable("dandelion", true);
/// A removable block without drops.
pub static SNOW_LAYER: SimpleBlock = SimpleBlock::removable("snow", false);
/// A displacer that takes water and never closes a face.
pub static WATERLOGGABLE: Waterloggable = Waterloggable;

static DISPLACER_KEY: ResourceLocation = ResourceLocation::vanilla_static("test_displacer");

pub struct Waterloggable;

impl Block for Waterloggable {
    fn key(&self) -> &ResourceLocation {
        &DISPLACER_KEY
    }

    fn as_liquid_displacer(&self) -> Option<&dyn LiquidDisplacer> {
        Some(self)
    }
}

impl LiquidDisplacer for Waterloggable {
    fn can_displace(&self, liquid: LiquidState) -> bool {
        liquid.kind() == LiquidKind::Water
    }

    fn side_closed(&self, _pos: BlockPos, _side: BlockPos, _world: &dyn LiquidWorld) -> bool {
        false
    }
}

/// A displacer that accepts any liquid and closes the face towards one
/// position.
pub struct ClosedTowards(pub BlockPos);

impl Block for ClosedTowards {
    fn key(&self) -> &ResourceLocation {
        &DISPLACER_KEY
    }

    fn as_liquid_displacer(&self) -> Option<&dyn LiquidDisplacer> {
        Some(self)
    }
}

impl LiquidDisplacer for ClosedTowards {
    fn can_displace(&self, _liquid: LiquidState) -> bool {
        true
    }

    fn side_closed(&self, _pos: BlockPos, side: BlockPos, _world: &dyn LiquidWorld) -> bool {
        side == self.0
    }
}

#[derive(Default)]
pub struct TestWorld {
    blocks: FxHashMap<BlockPos, BlockState>,
    layer: FxHashMap<BlockPos, LiquidState>,
    pub scheduled: Vec<(BlockPos, u32)>,
    pub drops: Vec<(Vector3<f64>, ItemStack, Vector3<f64>)>,
    pub sounds: Vec<(Vector3<f64>, Sound)>,
    pub mutations: usize,
    pub cancel_all: bool,
    pub ultrawarm: bool,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills a square of `block` centred on the y axis.
    pub fn floor(&mut self, y: i32, radius: i32, block: BlockRef) {
        for x in -radius..=radius {
            for z in -radius..=radius {
                self.put_block(BlockPos::new(x, y, z), block);
            }
        }
    }

    pub fn put_block(&mut self, pos: BlockPos, block: BlockRef) {
        self.layer.remove(&pos);
        if block.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, BlockState::Block(block));
        }
    }

    pub fn put_displacer<B: Block>(&mut self, pos: BlockPos, block: B) {
        self.put_block(pos, Box::leak(Box::new(block)));
    }

    pub fn put_liquid(&mut self, pos: BlockPos, liquid: LiquidState) {
        self.write_liquid(pos, Some(liquid));
    }

    pub fn clear(&mut self, pos: BlockPos) {
        self.blocks.remove(&pos);
        self.layer.remove(&pos);
    }

    pub fn reset_log(&mut self) {
        self.scheduled.clear();
        self.drops.clear();
        self.sounds.clear();
        self.mutations = 0;
    }

    fn write_liquid(&mut self, pos: BlockPos, liquid: Option<LiquidState>) {
        let main = self.block(pos);
        match liquid {
            Some(liquid) => {
                if main.liquid_displacer().is_some_and(|d| d.can_displace(liquid)) {
                    self.layer.insert(pos, liquid);
                } else {
                    self.layer.remove(&pos);
                    self.blocks.insert(pos, BlockState::Liquid(liquid));
                }
            }
            None => {
                if self.layer.remove(&pos).is_none() && main.as_liquid().is_some() {
                    self.blocks.remove(&pos);
                }
            }
        }
    }
}

impl LiquidWorld for TestWorld {
    fn block(&self, pos: BlockPos) -> BlockState {
        self.blocks.get(&pos).copied().unwrap_or_else(BlockState::air)
    }

    fn liquid(&self, pos: BlockPos) -> Option<LiquidState> {
        self.block(pos)
            .as_liquid()
            .or_else(|| self.layer.get(&pos).copied())
    }

    fn set_block(&mut self, pos: BlockPos, state: BlockState) {
        self.mutations += 1;
        self.layer.remove(&pos);
        if state.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, state);
        }
    }

    fn set_liquid(&mut self, pos: BlockPos, liquid: Option<LiquidState>) {
        self.mutations += 1;
        self.write_liquid(pos, liquid);
    }

    fn schedule_block_update(&mut self, pos: BlockPos, delay: u32) {
        self.scheduled.push((pos, delay));
    }

    fn range(&self) -> WorldRange {
        WorldRange::OVERWORLD
    }

    fn ultrawarm(&self) -> bool {
        self.ultrawarm
    }

    fn drop_item(&mut self, pos: Vector3<f64>, stack: ItemStack, velocity: Vector3<f64>) {
        self.drops.push((pos, stack, velocity));
    }

    fn play_sound(&mut self, pos: Vector3<f64>, sound: Sound) {
        self.sounds.push((pos, sound));
    }

    fn handler(&self) -> &dyn LiquidHandler {
        self
    }
}

impl LiquidHandler for TestWorld {
    fn handle_liquid_flow(
        &self,
        ctx: &mut EventContext,
        _from: BlockPos,
        _into: BlockPos,
        _liquid: LiquidState,
        _replaced: BlockState,
    ) {
        if self.cancel_all {
            ctx.cancel();
        }
    }

    fn handle_liquid_decay(
        &self,
        ctx: &mut EventContext,
        _pos: BlockPos,
        _before: LiquidState,
        _after: Option<LiquidState>,
    ) {
        if self.cancel_all {
            ctx.cancel();
        }
    }

    fn handle_liquid_harden(
        &self,
        ctx: &mut EventContext,
        _pos: BlockPos,
        _liquid: LiquidState,
        _other: Option<LiquidState>,
        _result: BlockRef,
    ) {
        if self.cancel_all {
            ctx.cancel();
        }
    }
}
