//! The liquid value type and the behaviour contract of liquid kinds.

use std::fmt;

use steel_utils::{BlockPos, ResourceLocation};
use thiserror::Error;

use crate::world::LiquidWorld;

use super::lava::LavaLiquid;
use super::water::WaterLiquid;

/// Errors produced when decoding persisted liquid data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LiquidError {
    /// The level property of a liquid block is outside 0..=15.
    #[error("invalid {kind} level {level}, must be between 0 and 15")]
    InvalidLevel {
        /// The kind of liquid being decoded.
        kind: LiquidKind,
        /// The offending level value.
        level: u8,
    },
}

/// The kinds of liquid. Liquids of different kinds never merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiquidKind {
    /// Water.
    Water,
    /// Lava.
    Lava,
}

impl LiquidKind {
    /// Returns the behaviour implementation of this kind.
    #[must_use]
    pub fn behaviour(self) -> &'static dyn LiquidBehaviour {
        match self {
            LiquidKind::Water => &WaterLiquid,
            LiquidKind::Lava => &LavaLiquid,
        }
    }

    /// Depth lost per horizontal step.
    #[must_use]
    pub const fn spread_decay(self) -> u8 {
        match self {
            LiquidKind::Water => 1,
            LiquidKind::Lava => 2,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            LiquidKind::Water => "water",
            LiquidKind::Lava => "lava",
        }
    }
}

impl fmt::Display for LiquidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The state of one liquid cell.
///
/// `depth` is always within `1..=8`; 8 is a full cell. A cell is a source
/// when it is full and not falling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiquidState {
    kind: LiquidKind,
    depth: u8,
    falling: bool,
    still: bool,
}

impl LiquidState {
    /// Depth of a full cell.
    pub const MAX_DEPTH: u8 = 8;

    /// Creates a flowing liquid state.
    ///
    /// # Panics
    /// Panics if `depth` is not within `1..=8`.
    #[must_use]
    #[track_caller]
    pub fn new(kind: LiquidKind, depth: u8, falling: bool) -> Self {
        assert_valid_depth(depth);
        Self {
            kind,
            depth,
            falling,
            still: false,
        }
    }

    /// A full, non-falling source of `kind`.
    #[must_use]
    pub const fn source(kind: LiquidKind) -> Self {
        Self {
            kind,
            depth: Self::MAX_DEPTH,
            falling: false,
            still: false,
        }
    }

    /// A source that does not spread until a neighbour update schedules it.
    #[must_use]
    pub const fn still_source(kind: LiquidKind) -> Self {
        Self {
            still: true,
            ..Self::source(kind)
        }
    }

    /// The kind of liquid.
    #[must_use]
    pub const fn kind(self) -> LiquidKind {
        self.kind
    }

    /// The depth, between 1 and 8.
    #[must_use]
    pub const fn depth(self) -> u8 {
        self.depth
    }

    /// Whether the liquid is a falling column.
    #[must_use]
    pub const fn falling(self) -> bool {
        self.falling
    }

    /// Whether the liquid is still.
    #[must_use]
    pub const fn still(self) -> bool {
        self.still
    }

    /// Returns `true` for a full, non-falling liquid.
    #[must_use]
    pub const fn is_source(self) -> bool {
        self.depth == Self::MAX_DEPTH && !self.falling
    }

    /// Depth lost per horizontal step.
    #[must_use]
    pub const fn spread_decay(self) -> u8 {
        self.kind.spread_decay()
    }

    /// Returns the same liquid at a new depth and falling state. The result
    /// is never still.
    ///
    /// # Panics
    /// Panics if `depth` is not within `1..=8`.
    #[must_use]
    #[track_caller]
    pub fn with_depth(self, depth: u8, falling: bool) -> Self {
        Self::new(self.kind, depth, falling)
    }

    /// Returns the same liquid with the still flag changed.
    #[must_use]
    pub const fn with_still(self, still: bool) -> Self {
        Self { still, ..self }
    }

    /// The behaviour of this liquid's kind.
    #[must_use]
    pub fn behaviour(self) -> &'static dyn LiquidBehaviour {
        self.kind.behaviour()
    }

    /// Ticks between scheduled updates of this liquid.
    #[must_use]
    pub fn tick_delay(self, ultrawarm: bool) -> u32 {
        self.behaviour().tick_delay(ultrawarm)
    }

    /// Encodes the state into the block `level` property.
    ///
    /// Level 0 is a source, 1 to 7 is flowing liquid (7 the thinnest) and
    /// falling liquid adds 8.
    ///
    /// # Panics
    /// Panics if the depth is not within `1..=8`.
    #[must_use]
    #[track_caller]
    pub fn to_level(self) -> u8 {
        assert_valid_depth(self.depth);
        let level = Self::MAX_DEPTH - self.depth;
        if self.falling { level + 8 } else { level }
    }

    /// Decodes a block `level` property.
    pub fn from_level(kind: LiquidKind, level: u8) -> Result<Self, LiquidError> {
        if level > 15 {
            return Err(LiquidError::InvalidLevel { kind, level });
        }
        let falling = level >= 8;
        Ok(Self::new(kind, Self::MAX_DEPTH - (level & 7), falling))
    }

    /// The key of the block this liquid is encoded as.
    #[must_use]
    pub fn encoded_key(self) -> ResourceLocation {
        match (self.kind, self.still) {
            (LiquidKind::Water, true) => ResourceLocation::vanilla_static("water"),
            (LiquidKind::Water, false) => ResourceLocation::vanilla_static("flowing_water"),
            (LiquidKind::Lava, true) => ResourceLocation::vanilla_static("lava"),
            (LiquidKind::Lava, false) => ResourceLocation::vanilla_static("flowing_lava"),
        }
    }
}

#[track_caller]
fn assert_valid_depth(depth: u8) {
    assert!(
        (1..=LiquidState::MAX_DEPTH).contains(&depth),
        "invalid liquid depth {depth}, must be between 1 and 8"
    );
}

/// Behaviour shared by every liquid kind.
pub trait LiquidBehaviour: Send + Sync {
    /// The kind this behaviour implements.
    fn kind(&self) -> LiquidKind;

    /// Ticks between scheduled updates.
    fn tick_delay(&self, ultrawarm: bool) -> u32;

    /// Called when a scheduled (or random) tick fires for the liquid at `pos`.
    fn scheduled_tick(&self, world: &mut dyn LiquidWorld, pos: BlockPos, liquid: LiquidState);

    /// Called when a neighbour of the liquid at `pos` changed.
    fn neighbour_update_tick(&self, world: &mut dyn LiquidWorld, pos: BlockPos, liquid: LiquidState);

    /// Tries to turn the liquid at `pos` into a solid block through contact
    /// with the other liquid kind.
    ///
    /// `flown_into_by` is the position of a liquid that just tried to flow
    /// into `pos`, or `None` when the liquid checks its own surroundings.
    /// Returns `true` if the cell hardened.
    fn harden(
        &self,
        world: &mut dyn LiquidWorld,
        pos: BlockPos,
        liquid: LiquidState,
        flown_into_by: Option<BlockPos>,
    ) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_invariant() {
        assert!(LiquidState::source(LiquidKind::Water).is_source());
        assert!(!LiquidState::new(LiquidKind::Water, 8, true).is_source());
        assert!(!LiquidState::new(LiquidKind::Lava, 7, false).is_source());
    }

    #[test]
    fn test_level_encoding() {
        let water = LiquidState::source(LiquidKind::Water);
        assert_eq!(water.to_level(), 0);
        assert_eq!(water.with_depth(1, false).to_level(), 7);
        assert_eq!(water.with_depth(8, true).to_level(), 8);
        assert_eq!(water.with_depth(3, true).to_level(), 13);

        for level in 0..=15 {
            let decoded = LiquidState::from_level(LiquidKind::Lava, level).expect("level in range");
            assert_eq!(decoded.to_level(), level);
        }
    }

    #[test]
    fn test_decoding_rejects_out_of_range_levels() {
        assert_eq!(
            LiquidState::from_level(LiquidKind::Water, 16),
            Err(LiquidError::InvalidLevel {
                kind: LiquidKind::Water,
                level: 16
            })
        );
    }

    #[test]
    #[should_panic(expected = "invalid liquid depth 9")]
    fn test_depth_above_range_panics() {
        let _ = LiquidState::new(LiquidKind::Water, 9, false);
    }

    #[test]
    #[should_panic(expected = "invalid liquid depth 0")]
    fn test_depth_zero_panics() {
        let _ = LiquidState::source(LiquidKind::Lava).with_depth(0, false);
    }

    #[test]
    fn test_still_only_changes_encoding() {
        let still = LiquidState::still_source(LiquidKind::Lava);
        assert!(still.is_source());
        assert_eq!(still.encoded_key(), ResourceLocation::vanilla_static("lava"));
        assert!(!still.with_depth(6, false).still());
        assert_eq!(
            still.with_still(false).encoded_key(),
            ResourceLocation::vanilla_static("flowing_lava")
        );
    }

    #[test]
    fn test_spread_decay_per_kind() {
        assert_eq!(LiquidKind::Water.spread_decay(), 1);
        assert_eq!(LiquidKind::Lava.spread_decay(), 2);
    }
}
