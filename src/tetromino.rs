//! Tetromino definitions and shapes
//!
//! The 7 standard tetrominoes, each stored as a 0/1 matrix anchored at its
//! top-left corner. The catalog is checked once at startup; everything after
//! that works with validated `Shape` values.

use crate::error::CatalogError;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

const I_MATRIX: &[&[u8]] = &[&[1, 1, 1, 1]];
const J_MATRIX: &[&[u8]] = &[&[1, 0, 0], &[1, 1, 1]];
const L_MATRIX: &[&[u8]] = &[&[0, 0, 1], &[1, 1, 1]];
const O_MATRIX: &[&[u8]] = &[&[1, 1], &[1, 1]];
const S_MATRIX: &[&[u8]] = &[&[0, 1, 1], &[1, 1, 0]];
const T_MATRIX: &[&[u8]] = &[&[0, 1, 0], &[1, 1, 1]];
const Z_MATRIX: &[&[u8]] = &[&[1, 1, 0], &[0, 1, 1]];

impl TetrominoType {
    /// All tetromino types in catalog order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ]
    }

    /// Spawn-orientation matrix, rows top to bottom
    pub fn matrix(&self) -> &'static [&'static [u8]] {
        match self {
            TetrominoType::I => I_MATRIX,
            TetrominoType::J => J_MATRIX,
            TetrominoType::L => L_MATRIX,
            TetrominoType::O => O_MATRIX,
            TetrominoType::S => S_MATRIX,
            TetrominoType::T => T_MATRIX,
            TetrominoType::Z => Z_MATRIX,
        }
    }
}

/// A rectangular occupancy matrix, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Shape {
    /// Build a shape from a 0/1 matrix, rejecting anything irregular
    pub fn from_matrix(kind: TetrominoType, rows: &[&[u8]]) -> Result<Self, CatalogError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        if height == 0 || width == 0 {
            return Err(CatalogError::EmptyShape(kind));
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(CatalogError::RaggedRow {
                    kind,
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                match value {
                    0 => cells.push(false),
                    1 => cells.push(true),
                    _ => {
                        return Err(CatalogError::InvalidCell {
                            kind,
                            row,
                            col,
                            value,
                        });
                    }
                }
            }
        }

        if !cells.iter().any(|&filled| filled) {
            return Err(CatalogError::NoOccupiedCells(kind));
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the cell at (row, col) is occupied; out of range is empty
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[row * self.width + col]
    }

    /// Occupied cells as (row, col) offsets from the top-left anchor
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &filled)| filled)
            .map(|(i, _)| (i / self.width, i % self.width))
    }

    /// 90° clockwise rotation: `rotated[col][height - 1 - row] = self[row][col]`
    pub fn rotated_cw(&self) -> Shape {
        let new_width = self.height;
        let new_height = self.width;
        let mut cells = vec![false; self.cells.len()];
        for (row, col) in self.filled() {
            cells[col * new_width + (self.height - 1 - row)] = true;
        }
        Shape {
            width: new_width,
            height: new_height,
            cells,
        }
    }
}

/// Number of shapes in a catalog
pub const CATALOG_SIZE: usize = 7;

/// The validated set of shapes the factory draws from
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: [(TetrominoType, Shape); CATALOG_SIZE],
}

impl Catalog {
    /// The standard 7-piece catalog
    pub fn standard() -> Result<Self, CatalogError> {
        let matrices: Vec<_> = TetrominoType::all()
            .into_iter()
            .map(|kind| (kind, kind.matrix()))
            .collect();
        Self::from_matrices(&matrices)
    }

    /// Validate a full catalog of raw matrices
    pub fn from_matrices(matrices: &[(TetrominoType, &[&[u8]])]) -> Result<Self, CatalogError> {
        let entries = matrices
            .iter()
            .map(|&(kind, rows)| Shape::from_matrix(kind, rows).map(|shape| (kind, shape)))
            .collect::<Result<Vec<_>, _>>()?;
        let entries = entries
            .try_into()
            .map_err(|rejected: Vec<_>| CatalogError::WrongSize(rejected.len()))?;
        Ok(Self { entries })
    }

    /// Entry by catalog index, wrapping past the end
    pub fn entry(&self, index: usize) -> (TetrominoType, &Shape) {
        let (kind, shape) = &self.entries[index % CATALOG_SIZE];
        (*kind, shape)
    }

    /// Spawn shape for a given type
    pub fn shape(&self, kind: TetrominoType) -> Option<&Shape> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, shape)| shape)
    }
}
