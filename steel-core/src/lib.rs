//! # Steel Core
//!
//! The liquid flow and hardening engine of the Steel server.
//!
//! The engine does not own the block grid. A host implements
//! [`world::LiquidWorld`] and calls into [`fluid`] whenever a liquid cell gets
//! a scheduled tick, a random tick or a neighbour update.
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
    clippy::struct_excessive_bools,
    clippy::needless_pass_by_value
)]

pub mod block;
pub mod event;
pub mod fluid;
pub mod item;
pub mod world;

pub use block::{Block, BlockRef, BlockState, Breakable};
pub use event::{EventContext, LiquidHandler};
pub use item::ItemStack;
pub use world::{LiquidWorld, Sound};
