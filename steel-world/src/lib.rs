//! # Steel World
//!
//! An in-memory level that hosts the liquid engine of `steel-core`: chunked
//! block storage, per-chunk scheduled ticks, random ticks, neighbour updates
//! and a small catalog of blocks liquids interact with.
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    clippy::unwrap_used
)]
#![allow(
    clippy::single_call_fn,
    clippy::multiple_inherent_impl,
    clippy::shadow_unrelated,
    clippy::missing_errors_doc,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::new_without_default
)]

pub mod catalog;
pub mod chunk;
pub mod config;
pub mod handler;
pub mod level;
pub mod ticks;

pub use config::{ConfigError, SimulationConfig};
pub use handler::{LiquidStats, ProtectedRegion, StatsHandler};
pub use level::{DroppedItem, Level, TickSummary};
