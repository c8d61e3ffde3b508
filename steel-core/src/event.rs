//! Cancellable liquid events.
//!
//! Every grid mutation the liquid engine makes is offered to the host's
//! [`LiquidHandler`] first. A handler that cancels the [`EventContext`] vetoes
//! the mutation; the engine then behaves as if the condition had not been met.

use steel_utils::BlockPos;

use crate::block::{BlockRef, BlockState};
use crate::fluid::LiquidState;

/// Carries the cancellation flag of one event.
#[derive(Debug, Default)]
pub struct EventContext {
    cancelled: bool,
}

impl EventContext {
    /// Creates a context that is not cancelled.
    #[must_use]
    pub const fn new() -> Self {
        Self { cancelled: false }
    }

    /// Vetoes the mutation.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether a handler vetoed the mutation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Receives liquid events before they are applied. All methods default to
/// letting the event through.
pub trait LiquidHandler: Send + Sync {
    /// `liquid` is about to flow from `from` into `into`, replacing `replaced`.
    /// `from` equals `into` when a new source forms in place.
    fn handle_liquid_flow(
        &self,
        ctx: &mut EventContext,
        from: BlockPos,
        into: BlockPos,
        liquid: LiquidState,
        replaced: BlockState,
    ) {
        let _ = (ctx, from, into, liquid, replaced);
    }

    /// The unsupported liquid at `pos` is about to recede to `after`, or to
    /// disappear when `after` is `None`.
    fn handle_liquid_decay(
        &self,
        ctx: &mut EventContext,
        pos: BlockPos,
        before: LiquidState,
        after: Option<LiquidState>,
    ) {
        let _ = (ctx, pos, before, after);
    }

    /// `liquid` at `pos` is about to harden into `result` through contact
    /// with `other`.
    fn handle_liquid_harden(
        &self,
        ctx: &mut EventContext,
        pos: BlockPos,
        liquid: LiquidState,
        other: Option<LiquidState>,
        result: BlockRef,
    ) {
        let _ = (ctx, pos, liquid, other, result);
    }
}

/// A handler that lets every event through.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopHandler;

impl LiquidHandler for NopHandler {}
