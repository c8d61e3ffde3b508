//! Scheduled liquid ticks.
//!
//! - [`ScheduledTick`] - A single pending tick
//! - [`LevelChunkTicks`] - Per-chunk tick storage with deduplication
//! - [`LevelTicks`] - Level-wide coordinator over all chunk containers

mod chunk_ticks;
mod level_ticks;
mod scheduled_tick;

pub use chunk_ticks::LevelChunkTicks;
pub use level_ticks::LevelTicks;
pub use scheduled_tick::{ScheduledTick, TickKey};
