//! Reusable search queues for the liquid path calculator.
//!
//! Path searches run for nearly every liquid tick. Their node buffers are kept
//! in a process-wide pool instead of being allocated per search.

use std::ops::{Deref, DerefMut};

use crossbeam::queue::SegQueue;

/// Idle queues kept around at most.
const MAX_IDLE_QUEUES: usize = 64;

static QUEUE_POOL: SegQueue<LiquidQueue> = SegQueue::new();

/// One step of a hypothetical flow path on the liquid's own level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidNode {
    /// Block x coordinate.
    pub x: i32,
    /// Block z coordinate.
    pub z: i32,
    /// Depth budget left at this node.
    pub depth: i8,
    /// Arena index of the node this one was reached from.
    pub previous: Option<u32>,
}

/// A FIFO of search nodes that doubles as the arena holding them.
///
/// Fetching only advances a cursor, so nodes stay addressable by index until
/// the queue is reset and back-links can be followed to rebuild a path.
#[derive(Debug, Default)]
pub struct LiquidQueue {
    nodes: Vec<LiquidNode>,
    cursor: usize,
    shortest_path: Option<usize>,
}

impl LiquidQueue {
    /// Appends a node and returns its arena index.
    pub fn push(&mut self, node: LiquidNode) -> u32 {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        index
    }

    /// Takes the oldest unvisited node.
    pub fn fetch(&mut self) -> Option<u32> {
        if self.cursor >= self.nodes.len() {
            return None;
        }
        let index = self.cursor as u32;
        self.cursor += 1;
        Some(index)
    }

    /// The node at `index`.
    #[must_use]
    pub fn node(&self, index: u32) -> LiquidNode {
        self.nodes[index as usize]
    }

    /// Number of nodes waiting to be fetched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() - self.cursor
    }

    /// Returns `true` if no node is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of steps between the root and the node at `index`.
    #[must_use]
    pub fn path_len(&self, index: u32) -> usize {
        let mut len = 0;
        let mut current = self.nodes[index as usize].previous;
        while let Some(previous) = current {
            len += 1;
            current = self.nodes[previous as usize].previous;
        }
        len
    }

    /// The `(x, z)` columns from the first step after the root up to the node
    /// at `index`.
    #[must_use]
    pub fn columns_to(&self, index: u32) -> Vec<(i32, i32)> {
        let mut columns = Vec::with_capacity(self.path_len(index));
        let mut current = Some(index);
        while let Some(i) = current {
            let node = self.nodes[i as usize];
            if node.previous.is_none() {
                break;
            }
            columns.push((node.x, node.z));
            current = node.previous;
        }
        columns.reverse();
        columns
    }

    /// Length of the shortest path confirmed so far, `None` while unbounded.
    #[must_use]
    pub const fn shortest_path(&self) -> Option<usize> {
        self.shortest_path
    }

    /// Tightens the shortest confirmed path length.
    pub fn confirm_path(&mut self, len: usize) {
        if self.shortest_path.is_none_or(|shortest| len < shortest) {
            self.shortest_path = Some(len);
        }
    }

    /// Clears all nodes and the shortest path bound, keeping the allocation.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.cursor = 0;
        self.shortest_path = None;
    }
}

/// A queue borrowed from the pool. Dropping it resets the queue and hands it
/// back.
pub struct PooledQueue {
    queue: LiquidQueue,
}

/// Borrows a reset queue from the pool, allocating one if the pool is empty.
#[must_use]
pub fn acquire() -> PooledQueue {
    PooledQueue {
        queue: QUEUE_POOL.pop().unwrap_or_default(),
    }
}

impl Deref for PooledQueue {
    type Target = LiquidQueue;

    fn deref(&self) -> &Self::Target {
        &self.queue
    }
}

impl DerefMut for PooledQueue {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.queue
    }
}

impl Drop for PooledQueue {
    fn drop(&mut self) {
        let mut queue = std::mem::take(&mut self.queue);
        queue.reset();
        if QUEUE_POOL.len() < MAX_IDLE_QUEUES {
            QUEUE_POOL.push(queue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(x: i32, z: i32, previous: Option<u32>) -> LiquidNode {
        LiquidNode {
            x,
            z,
            depth: 8,
            previous,
        }
    }

    #[test]
    fn test_fifo_order_and_back_links() {
        let mut queue = LiquidQueue::default();
        let root = queue.push(node(0, 0, None));
        assert_eq!(queue.fetch(), Some(root));

        let a = queue.push(node(1, 0, Some(root)));
        let b = queue.push(node(0, 1, Some(root)));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.fetch(), Some(a));

        let c = queue.push(node(2, 0, Some(a)));
        assert_eq!(queue.fetch(), Some(b));
        assert_eq!(queue.fetch(), Some(c));
        assert!(queue.fetch().is_none());

        assert_eq!(queue.path_len(root), 0);
        assert_eq!(queue.path_len(c), 2);
        assert_eq!(queue.columns_to(c), vec![(1, 0), (2, 0)]);
        assert!(queue.columns_to(root).is_empty());
    }

    #[test]
    fn test_shortest_path_only_tightens() {
        let mut queue = LiquidQueue::default();
        assert_eq!(queue.shortest_path(), None);
        queue.confirm_path(3);
        queue.confirm_path(5);
        assert_eq!(queue.shortest_path(), Some(3));
        queue.confirm_path(2);
        assert_eq!(queue.shortest_path(), Some(2));
    }

    #[test]
    fn test_pooled_queues_come_back_reset() {
        {
            let mut queue = acquire();
            let root = queue.push(node(4, 4, None));
            queue.push(node(5, 4, Some(root)));
            queue.confirm_path(1);
        }
        for _ in 0..4 {
            let queue = acquire();
            assert!(queue.is_empty());
            assert_eq!(queue.shortest_path(), None);
        }
    }
}
