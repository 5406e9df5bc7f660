//! The N-dimensional board.
//!
//! A dense row-major grid of nullable player ids. Dimensions are fixed at
//! construction; axis 0 is the outermost. The grid implements "stop"
//! topology: positions outside the bounds simply do not exist.

use crate::core::{Coord, PlayerId};

/// Sentinel for an empty cell in serialized boards.
pub const EMPTY: i64 = -1;

/// A dense N-dimensional grid of nullable player ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    dims: Vec<usize>,
    strides: Vec<usize>,
    cells: Vec<Option<PlayerId>>,
}

impl Board {
    /// Create an empty board with the given dimensions.
    ///
    /// Panics if `dims` is empty or any axis has length zero; the loader
    /// rejects such datapacks before a board is ever built.
    #[must_use]
    pub fn new(dims: &[usize]) -> Self {
        assert!(!dims.is_empty(), "Board must have at least one axis");
        assert!(dims.iter().all(|&d| d > 0), "Board axes must be non-empty");

        let mut strides = vec![1; dims.len()];
        for axis in (0..dims.len() - 1).rev() {
            strides[axis] = strides[axis + 1] * dims[axis + 1];
        }
        let cells = vec![None; dims.iter().product()];

        Self {
            dims: dims.to_vec(),
            strides,
            cells,
        }
    }

    /// Board dimensions, outermost axis first.
    #[must_use]
    pub fn dimensions(&self) -> &[usize] {
        &self.dims
    }

    /// Number of axes.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Whether a coordinate lies on the board.
    ///
    /// A coordinate with the wrong number of axes is out of bounds.
    #[must_use]
    pub fn in_bounds(&self, coord: &Coord) -> bool {
        coord.ndim() == self.ndim()
            && coord
                .as_slice()
                .iter()
                .zip(&self.dims)
                .all(|(&ordinate, &dim)| ordinate < dim)
    }

    fn flat_index(&self, coord: &Coord) -> usize {
        debug_assert!(self.in_bounds(coord));
        coord
            .as_slice()
            .iter()
            .zip(&self.strides)
            .map(|(&ordinate, &stride)| ordinate * stride)
            .sum()
    }

    /// The stone at a coordinate, or `None` for an empty cell.
    #[must_use]
    pub fn get(&self, coord: &Coord) -> Option<PlayerId> {
        self.cells[self.flat_index(coord)]
    }

    /// Place or remove a stone. Overwrites any existing stone.
    pub fn set(&mut self, coord: &Coord, value: Option<PlayerId>) {
        let index = self.flat_index(coord);
        self.cells[index] = value;
    }

    /// Whether a cell is empty.
    #[must_use]
    pub fn is_empty_at(&self, coord: &Coord) -> bool {
        self.get(coord).is_none()
    }

    /// Number of stones currently on the board.
    #[must_use]
    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// The raw cell storage in row-major order. Used by the save codec.
    #[must_use]
    pub(crate) fn cells(&self) -> &[Option<PlayerId>] {
        &self.cells
    }

    /// Rebuild a board from row-major cell storage. Used by the save codec.
    pub(crate) fn from_cells(dims: &[usize], cells: Vec<Option<PlayerId>>) -> Self {
        let mut board = Self::new(dims);
        assert_eq!(board.cells.len(), cells.len());
        board.cells = cells;
        board
    }
}
