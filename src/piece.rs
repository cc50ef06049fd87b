//! Falling piece values

use std::fmt;

use crate::tetromino::{Shape, TetrominoType};

/// Anchor of a piece's top-left corner in grid coordinates.
/// `y` grows downward and may be negative above the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Cosmetic RGB color assigned at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PieceColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PieceColor {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// An immutable piece: shape plus color. Rotation returns a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: TetrominoType,
    shape: Shape,
    color: PieceColor,
}

impl Piece {
    pub fn new(kind: TetrominoType, shape: Shape, color: PieceColor) -> Self {
        Self { kind, shape, color }
    }

    pub fn kind(&self) -> TetrominoType {
        self.kind
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn color(&self) -> PieceColor {
        self.color
    }

    /// Same piece turned 90° clockwise
    pub fn rotated(&self) -> Piece {
        Piece {
            kind: self.kind,
            shape: self.shape.rotated_cw(),
            color: self.color,
        }
    }

    /// Absolute (x, y) of every occupied cell when anchored at `position`
    pub fn cells_at(&self, position: Position) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled()
            .map(move |(row, col)| (position.x + col as i32, position.y + row as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t_piece() -> Piece {
        let shape = Shape::from_matrix(TetrominoType::T, TetrominoType::T.matrix()).unwrap();
        Piece::new(TetrominoType::T, shape, PieceColor::new(10, 20, 30))
    }

    #[test]
    fn test_cells_at_offsets_anchor() {
        let piece = t_piece();
        let mut cells: Vec<_> = piece.cells_at(Position::new(4, -1)).collect();
        cells.sort();
        assert_eq!(cells, vec![(4, 0), (5, -1), (5, 0), (6, 0)]);
    }

    #[test]
    fn test_rotation_leaves_original_untouched() {
        let piece = t_piece();
        let rotated = piece.rotated();
        assert_ne!(rotated.shape(), piece.shape());
        assert_eq!(piece.shape().width(), 3);
        assert_eq!(rotated.color(), piece.color());
        assert_eq!(rotated.kind(), TetrominoType::T);
    }

    #[test]
    fn test_color_display_token() {
        assert_eq!(PieceColor::new(1, 2, 254).to_string(), "rgb(1, 2, 254)");
    }
}
