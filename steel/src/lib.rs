//! # Steel
//!
//! Runs the Steel liquid simulation: one level ticked at a fixed rate.
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    missing_docs,
    clippy::unwrap_used
)]
#![allow(
    clippy::single_call_fn,
    clippy::multiple_inherent_impl,
    clippy::shadow_unrelated,
    clippy::missing_errors_doc,
    clippy::struct_excessive_bools,
    clippy::needless_pass_by_value,
    clippy::cargo_common_metadata
)]
use std::sync::Arc;

use steel_core::block::vanilla_blocks;
use steel_core::fluid::{LiquidKind, LiquidState};
use steel_utils::{BlockPos, Direction};
use steel_world::{Level, SimulationConfig, StatsHandler, catalog};
use tokio::select;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::info_span;

/// Where the demo scene is built.
const SCENE_ORIGIN: BlockPos = BlockPos::new(0, 64, 0);

/// The simulation server.
pub struct SteelServer {
    /// The cancellation token for graceful shutdown.
    pub cancel_token: CancellationToken,
    /// The simulated level.
    pub level: Level,
    /// Counts the liquid events of the level.
    pub stats: Arc<StatsHandler>,
    config: SimulationConfig,
}

impl SteelServer {
    /// Creates the server and builds the demo scene.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        log::info!("Starting Steel liquid simulation");

        let stats = Arc::new(StatsHandler::default());
        let mut level = Level::new(&config, stats.clone());
        build_demo_scene(&mut level);

        Self {
            cancel_token: CancellationToken::new(),
            level,
            stats,
            config,
        }
    }

    /// Ticks the level until the configured tick count is reached or the
    /// server is stopped.
    pub async fn run(&mut self) {
        let mut ticker = interval(self.config.tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let run_ticks = self.config.run_ticks;
        log::info!(
            "Ticking at {} tps{}",
            self.config.ticks_per_second,
            if run_ticks == 0 {
                String::from(" until interrupted")
            } else {
                format!(" for {run_ticks} ticks")
            }
        );

        loop {
            select! {
                () = self.cancel_token.cancelled() => {
                    log::info!("Tick loop interrupted");
                    break;
                }
                _ = ticker.tick() => {
                    let summary = {
                        let _span = info_span!("tick", game_time = self.level.game_time() + 1).entered();
                        self.level.tick()
                    };
                    if summary.scheduled_ticks > 0 {
                        tracing::debug!(
                            scheduled = summary.scheduled_ticks,
                            random = summary.random_ticks,
                            updates = summary.neighbour_updates,
                            "tick done"
                        );
                    }
                    if run_ticks != 0 && summary.game_time >= run_ticks {
                        break;
                    }
                }
            }
        }

        let stats = self.stats.stats();
        log::info!(
            "Stopped after {} ticks: {} liquid cells, {} flows, {} decays, {} hardens, {} cancelled",
            self.level.game_time(),
            self.level.liquids().count(),
            stats.flows,
            stats.decays,
            stats.hardens,
            stats.cancelled
        );
    }

    /// Stops the server.
    pub fn stop(&self) {
        self.cancel_token.cancel();
    }
}

/// A stone platform with a water spring, a lava spring beside it, a ledge
/// for the water to fall over and a few blocks in the way.
fn build_demo_scene(level: &mut Level) {
    let floor = SCENE_ORIGIN.below();
    level.fill_layer(floor, 16, &vanilla_blocks::STONE);
    level.fill_layer(floor.offset(0, -8, 0), 24, &vanilla_blocks::STONE);

    // A gap in the platform the water falls through.
    for z in -2..=2 {
        level.remove_block(floor.offset(6, 0, z));
    }

    level.place_block(SCENE_ORIGIN.offset(-2, 0, 1), &catalog::SHORT_GRASS);
    level.place_block(SCENE_ORIGIN.offset(-1, 0, -2), &catalog::DANDELION);
    level.place_block(SCENE_ORIGIN.offset(2, 0, 2), &catalog::OAK_FENCE);
    if let Some(stairs) = catalog::oak_stairs(Direction::North) {
        level.place_block(SCENE_ORIGIN.offset(0, 0, -3), stairs);
    }
    level.place_block(SCENE_ORIGIN.offset(-3, 0, 0), &catalog::OAK_SLAB_BOTTOM);

    level.place_liquid(SCENE_ORIGIN, LiquidState::source(LiquidKind::Water));
    level.place_liquid(
        SCENE_ORIGIN.offset(-8, 0, 0),
        LiquidState::source(LiquidKind::Lava),
    );
    log::info!("Built demo scene around {SCENE_ORIGIN}");
}
