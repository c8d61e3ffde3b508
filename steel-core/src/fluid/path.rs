//! Slope finding for horizontal liquid spread.
//!
//! A breadth-first search over the liquid's own level looks for the closest
//! cells from which the liquid could drop down. Liquid prefers to spread
//! towards those cells instead of in every direction.

use smallvec::SmallVec;
use steel_utils::{BlockPos, Direction};

use crate::world::LiquidWorld;

use super::flowing::{can_flow_into, face_closed};
use super::queue_pool::{self, LiquidNode, LiquidQueue};
use super::{LiquidDisplacer, LiquidState};

/// Positions from the first step next to the liquid up to a cell with a drop
/// below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidPath(SmallVec<[BlockPos; 4]>);

impl LiquidPath {
    /// The cell the liquid should flow into to follow this path.
    #[must_use]
    pub fn first_step(&self) -> BlockPos {
        self.0[0]
    }

    /// The cell with the drop below it.
    #[must_use]
    pub fn destination(&self) -> BlockPos {
        self.0[self.0.len() - 1]
    }

    /// Number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a path has at least one step.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The steps of the path in order.
    #[must_use]
    pub fn steps(&self) -> &[BlockPos] {
        &self.0
    }
}

/// Finds all shortest paths from the liquid at `pos` to a cell it could fall
/// down from.
///
/// Each step costs twice the liquid's spread decay from the depth budget; a
/// node whose budget is used up is not expanded further but may still be a
/// destination. `displacer` is the block sharing the liquid's cell, whose
/// closed faces are honoured for the first step; later steps check the
/// displacers on both sides of the face they cross. Returns an empty list if
/// no drop is within reach.
#[must_use]
pub fn calculate_liquid_paths(
    world: &dyn LiquidWorld,
    pos: BlockPos,
    liquid: LiquidState,
    displacer: Option<&dyn LiquidDisplacer>,
) -> Vec<LiquidPath> {
    let mut queue = queue_pool::acquire();
    let step_cost = 2 * liquid.spread_decay() as i8;

    queue.push(LiquidNode {
        x: pos.x(),
        z: pos.z(),
        depth: liquid.depth() as i8,
        previous: None,
    });

    let mut paths = Vec::new();
    let mut first = true;

    while let Some(index) = queue.fetch() {
        let node = queue.node(index);
        let here = BlockPos::new(node.x, pos.y(), node.z);
        let came_from = node.previous.map(|previous| queue.node(previous));

        for direction in Direction::HORIZONTAL {
            let (dx, _, dz) = direction.offset();
            let next = LiquidNode {
                x: node.x + dx,
                z: node.z + dz,
                depth: node.depth - step_cost,
                previous: Some(index),
            };
            if came_from.is_some_and(|back| back.x == next.x && back.z == next.z) {
                continue;
            }

            let next_pos = BlockPos::new(next.x, pos.y(), next.z);
            let leaves_closed = if first {
                displacer.is_some_and(|d| d.side_closed(pos, next_pos, world))
            } else {
                face_closed(world, here, next_pos)
            };
            if leaves_closed || face_closed(world, next_pos, here) {
                continue;
            }

            if let Some(path) = spread_neighbour(world, liquid, next_pos, next, &mut queue) {
                paths.push(path);
            }
        }
        first = false;
    }

    if let Some(shortest) = paths.iter().map(LiquidPath::len).min() {
        paths.retain(|path| path.len() == shortest);
    }
    log::trace!(
        "liquid path search from {pos}: {} path(s) of length {:?} towards {:?}",
        paths.len(),
        paths.first().map(LiquidPath::len),
        paths
            .iter()
            .map(LiquidPath::destination)
            .collect::<SmallVec<[BlockPos; 4]>>()
    );
    paths
}

/// Visits one candidate node. Returns the full path if the node's cell has a
/// drop below it, otherwise queues the node for expansion when it is worth it.
fn spread_neighbour(
    world: &dyn LiquidWorld,
    liquid: LiquidState,
    pos: BlockPos,
    node: LiquidNode,
    queue: &mut LiquidQueue,
) -> Option<LiquidPath> {
    if !can_flow_into(world, liquid, pos, true) {
        return None;
    }

    let parent = node.previous?;
    let len = queue.path_len(parent) + 1;

    let below = pos.below();
    if can_flow_into(world, liquid, below, false)
        && !face_closed(world, pos, below)
        && !face_closed(world, below, pos)
    {
        if queue.shortest_path().is_some_and(|shortest| len > shortest) {
            return None;
        }
        queue.confirm_path(len);

        let mut steps: SmallVec<[BlockPos; 4]> = queue
            .columns_to(parent)
            .into_iter()
            .map(|(x, z)| BlockPos::new(x, pos.y(), z))
            .collect();
        steps.push(pos);
        return Some(LiquidPath(steps));
    }

    if node.depth > 0 && queue.shortest_path().is_none_or(|shortest| len < shortest) {
        queue.push(node);
    }
    None
}
