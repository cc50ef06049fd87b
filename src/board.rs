//! Game grid, piece locking and row clearing

use crate::piece::{Piece, PieceColor, Position};

/// Standard grid dimensions
pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 20;

/// A cell on the grid - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceColor),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Lock attempted with a cell above the grid. Terminal for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOut {
    /// Highest (most negative) row the piece occupied
    pub row: i32,
}

/// The game grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Stored as [row][col], row 0 is the top
    cells: [[Cell; GRID_WIDTH]; GRID_HEIGHT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; GRID_WIDTH]; GRID_HEIGHT],
        }
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        GRID_WIDTH
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        GRID_HEIGHT
    }

    /// Get the cell at column `x`, row `y`
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= GRID_WIDTH || y >= GRID_HEIGHT {
            return None;
        }
        Some(self.cells[y][x])
    }

    /// Whether (x, y) holds a locked block. Out of bounds reads as empty.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|cell| cell.is_filled())
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= GRID_WIDTH || y >= GRID_HEIGHT {
            return false;
        }
        self.cells[y][x] = cell;
        true
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; GRID_WIDTH]> {
        self.cells.iter()
    }

    /// A copy of this grid with `piece` locked at `position`.
    ///
    /// Fails with [`BlockOut`] when any cell of the piece is above row 0; the
    /// grid is left untouched in that case.
    pub fn with_piece(&self, piece: &Piece, position: Position) -> Result<Grid, BlockOut> {
        if let Some(row) = piece.cells_at(position).map(|(_, y)| y).filter(|&y| y < 0).min() {
            return Err(BlockOut { row });
        }

        let mut grid = self.clone();
        let cell = Cell::Filled(piece.color());
        for (x, y) in piece.cells_at(position) {
            grid.set(x, y, cell);
        }
        Ok(grid)
    }

    /// Copy of this grid with every full row removed and empty rows added on
    /// top, plus the number of rows removed
    pub fn clear_completed_rows(&self) -> (Grid, usize) {
        let mut grid = self.clone();
        let mut write_row = GRID_HEIGHT;

        // Compact surviving rows toward the bottom
        for read_row in (0..GRID_HEIGHT).rev() {
            if !self.is_row_full(read_row) {
                write_row -= 1;
                grid.cells[write_row] = self.cells[read_row];
            }
        }

        let cleared = write_row;
        for row in 0..cleared {
            grid.cells[row] = [Cell::Empty; GRID_WIDTH];
        }

        (grid, cleared)
    }

    /// Check if a row is completely filled
    fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// Check if the grid is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }
}
