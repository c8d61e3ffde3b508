//! Item stacks produced when liquids wash blocks away.

use steel_utils::ResourceLocation;

/// A stack of items of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    /// The item's registry key.
    pub item: ResourceLocation,
    /// Number of items, at least 1.
    pub count: u8,
}

impl ItemStack {
    /// Creates a new stack.
    #[must_use]
    pub const fn new(item: ResourceLocation, count: u8) -> Self {
        Self { item, count }
    }
}
