//! `Region` — a set of floor cells.
//!
//! Regions describe visual-trigger areas of sequences and visibility targets
//! of the event-capture driver.

use rustc_hash::FxHashSet;

use ped_core::CellId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    cells: FxHashSet<CellId>,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cell: CellId) -> bool {
        self.cells.insert(cell)
    }

    #[inline]
    pub fn contains(&self, cell: CellId) -> bool {
        self.cells.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in ascending id order, so geometric scans are deterministic.
    pub fn sorted_cells(&self) -> Vec<CellId> {
        let mut cells: Vec<CellId> = self.cells.iter().copied().collect();
        cells.sort_unstable();
        cells
    }

    pub fn iter(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.iter().copied()
    }
}

impl FromIterator<CellId> for Region {
    fn from_iter<I: IntoIterator<Item = CellId>>(iter: I) -> Self {
        Self { cells: iter.into_iter().collect() }
    }
}
