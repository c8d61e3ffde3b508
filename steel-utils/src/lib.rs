//! # Steel Utils
//!
//! Shared value types for the Steel liquid simulation: block positions,
//! directions, vector math and the vertical range of a world.

pub mod direction;
pub mod math;
pub mod range;
pub mod types;

pub use direction::Direction;
pub use range::WorldRange;
pub use types::{BlockPos, ChunkPos, ResourceLocation};
