//! Liquid event handlers of the level.

use std::sync::atomic::{AtomicU64, Ordering};

use steel_core::block::{BlockRef, BlockState};
use steel_core::event::{EventContext, LiquidHandler, NopHandler};
use steel_core::fluid::LiquidState;
use steel_utils::BlockPos;

/// Cancels every liquid mutation inside an axis aligned box, like spawn
/// protection.
#[derive(Debug, Clone, Copy)]
pub struct ProtectedRegion {
    min: BlockPos,
    max: BlockPos,
}

impl ProtectedRegion {
    /// Creates a region spanning both corners, inclusive.
    #[must_use]
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x().min(b.x()), a.y().min(b.y()), a.z().min(b.z())),
            max: BlockPos::new(a.x().max(b.x()), a.y().max(b.y()), a.z().max(b.z())),
        }
    }

    /// Returns `true` if `pos` lies inside the region.
    #[must_use]
    pub fn contains(&self, pos: BlockPos) -> bool {
        (self.min.x()..=self.max.x()).contains(&pos.x())
            && (self.min.y()..=self.max.y()).contains(&pos.y())
            && (self.min.z()..=self.max.z()).contains(&pos.z())
    }
}

impl LiquidHandler for ProtectedRegion {
    fn handle_liquid_flow(
        &self,
        ctx: &mut EventContext,
        _from: BlockPos,
        into: BlockPos,
        _liquid: LiquidState,
        _replaced: BlockState,
    ) {
        if self.contains(into) {
            ctx.cancel();
        }
    }

    fn handle_liquid_decay(
        &self,
        ctx: &mut EventContext,
        pos: BlockPos,
        _before: LiquidState,
        _after: Option<LiquidState>,
    ) {
        if self.contains(pos) {
            ctx.cancel();
        }
    }

    fn handle_liquid_harden(
        &self,
        ctx: &mut EventContext,
        pos: BlockPos,
        _liquid: LiquidState,
        _other: Option<LiquidState>,
        _result: BlockRef,
    ) {
        if self.contains(pos) {
            ctx.cancel();
        }
    }
}

/// Counts of the liquid events a [`StatsHandler`] let through or saw vetoed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiquidStats {
    /// Flows applied.
    pub flows: u64,
    /// Decays applied.
    pub decays: u64,
    /// Hardenings applied.
    pub hardens: u64,
    /// Events of any kind the inner handler cancelled.
    pub cancelled: u64,
}

/// Wraps another handler and counts the events passing through it.
#[derive(Debug, Default)]
pub struct StatsHandler<H = NopHandler> {
    inner: H,
    flows: AtomicU64,
    decays: AtomicU64,
    hardens: AtomicU64,
    cancelled: AtomicU64,
}

impl<H: LiquidHandler> StatsHandler<H> {
    /// Counts the events `inner` decides on.
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            flows: AtomicU64::new(0),
            decays: AtomicU64::new(0),
            hardens: AtomicU64::new(0),
            cancelled: AtomicU64::new(0),
        }
    }

    /// A snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> LiquidStats {
        LiquidStats {
            flows: self.flows.load(Ordering::Relaxed),
            decays: self.decays.load(Ordering::Relaxed),
            hardens: self.hardens.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }

    fn record(&self, ctx: &EventContext, counter: &AtomicU64) {
        if ctx.is_cancelled() {
            self.cancelled.fetch_add(1, Ordering::Relaxed);
        } else {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl<H: LiquidHandler> LiquidHandler for StatsHandler<H> {
    fn handle_liquid_flow(
        &self,
        ctx: &mut EventContext,
        from: BlockPos,
        into: BlockPos,
        liquid: LiquidState,
        replaced: BlockState,
    ) {
        self.inner
            .handle_liquid_flow(ctx, from, into, liquid, replaced);
        log::trace!("{} flow {from} -> {into}, replacing {replaced:?}", liquid.kind());
        self.record(ctx, &self.flows);
    }

    fn handle_liquid_decay(
        &self,
        ctx: &mut EventContext,
        pos: BlockPos,
        before: LiquidState,
        after: Option<LiquidState>,
    ) {
        self.inner.handle_liquid_decay(ctx, pos, before, after);
        self.record(ctx, &self.decays);
    }

    fn handle_liquid_harden(
        &self,
        ctx: &mut EventContext,
        pos: BlockPos,
        liquid: LiquidState,
        other: Option<LiquidState>,
        result: BlockRef,
    ) {
        self.inner
            .handle_liquid_harden(ctx, pos, liquid, other, result);
        log::trace!("{} at {pos} hardens into {}", liquid.kind(), result.key());
        self.record(ctx, &self.hardens);
    }
}
