//! [`GridMap`] – static color map of the grid.

use gridloc_types::{Cell, GridCellObservation, GridError, Heading};

/// Diagonal neighbour colors of every intersection, in the north-oriented
/// frame.
///
/// Entries are stored column-major: cell `(x, y)` lives at index
/// `x * height + y`.  The map never changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Box<[GridCellObservation]>,
}

/// Number of cells in a `width x height` grid.
///
/// Every cell also carries one particle per heading, so the product must
/// still fit in `usize` after multiplying by four.
///
/// # Errors
///
/// Returns [`GridError::InvalidConfig`] for a zero dimension or a grid too
/// large to index.
pub fn checked_cell_count(width: usize, height: usize) -> Result<usize, GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::InvalidConfig(format!(
            "grid dimensions must be positive, got {width}x{height}"
        )));
    }
    width
        .checked_mul(height)
        .filter(|cells| cells.checked_mul(Heading::ALL.len()).is_some())
        .ok_or_else(|| {
            GridError::InvalidConfig(format!("grid dimensions {width}x{height} are too large"))
        })
}

impl GridMap {
    /// Build a map from `width * height` entries in `x * height + y` order.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidConfig`] for an empty grid or a cell count
    /// that does not match the dimensions.
    pub fn new(
        width: usize,
        height: usize,
        cells: Vec<GridCellObservation>,
    ) -> Result<Self, GridError> {
        let expected = checked_cell_count(width, height)?;
        if cells.len() != expected {
            return Err(GridError::InvalidConfig(format!(
                "expected {expected} cells for a {width}x{height} grid, got {}",
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells: cells.into_boxed_slice(),
        })
    }

    /// A map where every intersection has the same observation.
    pub fn filled(
        width: usize,
        height: usize,
        observation: GridCellObservation,
    ) -> Result<Self, GridError> {
        let count = checked_cell_count(width, height)?;
        Self::new(width, height, vec![observation; count])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// `true` when `(x, y)` is inside `[0, width) x [0, height)`.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// North-oriented observation at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`] outside the grid.  Filter code keeps
    /// every particle in bounds, so this indicates an internal bug.
    pub fn lookup(&self, x: usize, y: usize) -> Result<GridCellObservation, GridError> {
        if x >= self.width || y >= self.height {
            return Err(GridError::OutOfRange {
                x: x as i64,
                y: y as i64,
            });
        }
        Ok(self.cells[x * self.height + y])
    }

    pub fn lookup_cell(&self, cell: Cell) -> Result<GridCellObservation, GridError> {
        self.lookup(cell.x, cell.y)
    }
}
