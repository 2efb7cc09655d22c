//! Sparse 2-D index matrix with staleness versioning.
//!
//! Maps a local subframe coordinate (matrix coordinates include the buffer
//! margin) to the pool slot expected to hold it. A `Cached` cell is only
//! meaningful while the recorded version still matches the slot's current
//! version; a recycled slot invalidates the cell without any matrix write.

/// State of one index-matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Never attempted.
    NotCached,
    /// Attempted and confirmed absent; do not retry while the coverage
    /// geometry is unchanged.
    NotPresent,
    /// Expected to be resident in `slot`, valid while the slot's version
    /// still equals `version`.
    Cached {
        /// Pool slot index.
        slot: usize,
        /// Slot version recorded at load time.
        version: u64,
    },
}

/// 2-D lookup from local subframe coordinate to cache slot.
pub struct IndexMatrix {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl IndexMatrix {
    /// Create a matrix of the given dimensions with all cells `NotCached`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellState::NotCached; width * height],
        }
    }

    /// Matrix width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Matrix height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell state at `(x, y)`, or `None` when the coordinate falls outside
    /// the matrix.
    pub fn get(&self, x: i32, y: i32) -> Option<CellState> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width + x as usize])
    }

    /// Set the cell state at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, state: CellState) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.cells[y as usize * self.width + x as usize] = state;
    }

    /// Reset every cell to `NotCached`.
    pub fn clear(&mut self) {
        self.cells.fill(CellState::NotCached);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_matrix_all_not_cached() {
        let matrix = IndexMatrix::new(3, 2);
        assert_eq!(matrix.width(), 3);
        assert_eq!(matrix.height(), 2);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(matrix.get(x, y), Some(CellState::NotCached));
            }
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut matrix = IndexMatrix::new(4, 4);
        matrix.set(2, 3, CellState::Cached { slot: 5, version: 7 });
        assert_eq!(
            matrix.get(2, 3),
            Some(CellState::Cached { slot: 5, version: 7 })
        );
        assert_eq!(matrix.get(3, 2), Some(CellState::NotCached));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut matrix = IndexMatrix::new(2, 2);
        assert_eq!(matrix.get(-1, 0), None);
        assert_eq!(matrix.get(0, -1), None);
        assert_eq!(matrix.get(2, 0), None);
        assert_eq!(matrix.get(0, 2), None);

        // Out-of-bounds writes are ignored, not panics.
        matrix.set(5, 5, CellState::NotPresent);
        assert_eq!(matrix.get(0, 0), Some(CellState::NotCached));
    }

    #[test]
    fn test_clear() {
        let mut matrix = IndexMatrix::new(2, 2);
        matrix.set(0, 0, CellState::NotPresent);
        matrix.set(1, 1, CellState::Cached { slot: 0, version: 1 });
        matrix.clear();
        assert_eq!(matrix.get(0, 0), Some(CellState::NotCached));
        assert_eq!(matrix.get(1, 1), Some(CellState::NotCached));
    }

    #[test]
    fn test_zero_sized_matrix() {
        let matrix = IndexMatrix::new(0, 0);
        assert_eq!(matrix.get(0, 0), None);
    }
}
