//! Block storage of a level, split into chunk columns of 16x16x16 sections.

use steel_core::BlockState;
use steel_core::fluid::LiquidState;
use steel_utils::{BlockPos, ChunkPos, WorldRange};

/// Edge length of a chunk section.
pub const SECTION_SIZE: usize = 16;
const SECTION_VOLUME: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;

/// One grid cell: the main layer and, for displacer blocks, the liquid they
/// host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// The block or liquid filling the cell.
    pub block: BlockState,
    /// The liquid hosted by a displacer block in the main layer.
    pub liquid: Option<LiquidState>,
}

impl Cell {
    /// An air cell.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            block: BlockState::air(),
            liquid: None,
        }
    }

    /// The liquid in this cell, whichever layer holds it.
    #[must_use]
    pub fn liquid(&self) -> Option<LiquidState> {
        self.block.as_liquid().or(self.liquid)
    }

    fn is_empty(&self) -> bool {
        self.block.is_air() && self.liquid.is_none()
    }
}

/// A 16x16x16 cube of cells.
pub struct ChunkSection {
    cells: Box<[Cell]>,
    non_empty_cells: u16,
}

impl ChunkSection {
    /// Creates a section full of air.
    #[must_use]
    pub fn new_empty() -> Self {
        Self {
            cells: vec![Cell::empty(); SECTION_VOLUME].into_boxed_slice(),
            non_empty_cells: 0,
        }
    }

    const fn index(x: usize, y: usize, z: usize) -> usize {
        (y * SECTION_SIZE + z) * SECTION_SIZE + x
    }

    /// The cell at section-relative coordinates.
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Cell {
        self.cells[Self::index(x, y, z)]
    }

    /// Replaces the cell at section-relative coordinates and returns the old
    /// one.
    pub fn set(&mut self, x: usize, y: usize, z: usize, cell: Cell) -> Cell {
        let slot = &mut self.cells[Self::index(x, y, z)];
        let old = std::mem::replace(slot, cell);
        match (old.is_empty(), cell.is_empty()) {
            (true, false) => self.non_empty_cells += 1,
            (false, true) => self.non_empty_cells -= 1,
            _ => {}
        }
        old
    }

    /// Returns `true` if every cell is air.
    #[must_use]
    pub const fn has_only_air(&self) -> bool {
        self.non_empty_cells == 0
    }
}

/// A column of sections covering the level's height.
pub struct LevelChunk {
    /// The position of this chunk.
    pub pos: ChunkPos,
    min_y: i32,
    sections: Box<[Option<ChunkSection>]>,
}

impl LevelChunk {
    /// Creates an empty chunk. Sections are allocated on first write.
    #[must_use]
    pub fn new(pos: ChunkPos, range: WorldRange) -> Self {
        let height = usize::try_from(range.height()).unwrap_or(0);
        let section_count = height.div_ceil(SECTION_SIZE);
        Self {
            pos,
            min_y: range.min_y,
            sections: (0..section_count).map(|_| None).collect(),
        }
    }

    fn locate(&self, pos: BlockPos) -> Option<(usize, usize, usize, usize)> {
        let relative_y = usize::try_from(pos.y() - self.min_y).ok()?;
        let section = relative_y / SECTION_SIZE;
        if section >= self.sections.len() {
            return None;
        }
        let x = (pos.x() & 15) as usize;
        let z = (pos.z() & 15) as usize;
        Some((section, x, relative_y % SECTION_SIZE, z))
    }

    /// The cell at `pos`, air if nothing was written there.
    #[must_use]
    pub fn get(&self, pos: BlockPos) -> Cell {
        self.locate(pos)
            .and_then(|(section, x, y, z)| {
                self.sections[section]
                    .as_ref()
                    .map(|section| section.get(x, y, z))
            })
            .unwrap_or_else(Cell::empty)
    }

    /// Writes the cell at `pos`. Positions outside the column are ignored.
    pub fn set(&mut self, pos: BlockPos, cell: Cell) {
        let Some((section, x, y, z)) = self.locate(pos) else {
            return;
        };
        self.sections[section]
            .get_or_insert_with(ChunkSection::new_empty)
            .set(x, y, z, cell);
    }

    /// Indices and base y levels of sections holding anything but air.
    pub fn non_empty_sections(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, section)| section.as_ref().is_some_and(|s| !s.has_only_air()))
            .map(|(index, _)| (index, self.min_y + (index * SECTION_SIZE) as i32))
    }

    /// Iterates all liquid cells of the chunk.
    pub fn liquids(&self) -> impl Iterator<Item = (BlockPos, LiquidState)> + '_ {
        let base_x = self.pos.0.x * 16;
        let base_z = self.pos.0.y * 16;
        self.non_empty_sections().flat_map(move |(index, base_y)| {
            let section = self.sections[index].as_ref();
            (0..SECTION_VOLUME).filter_map(move |i| {
                let cell = section?.cells[i];
                let liquid = cell.liquid()?;
                let x = (i % SECTION_SIZE) as i32;
                let z = ((i / SECTION_SIZE) % SECTION_SIZE) as i32;
                let y = (i / (SECTION_SIZE * SECTION_SIZE)) as i32;
                Some((BlockPos::new(base_x + x, base_y + y, base_z + z), liquid))
            })
        })
    }
}
