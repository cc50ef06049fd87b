//! Collision detection and drop placement
//!
//! Pure functions over borrowed snapshots of a piece, its anchor and the grid.
//! Cells above the grid (negative rows) never collide; top-out is decided at
//! spawn and at lock time, not here.

use crate::board::Grid;
use crate::piece::{Piece, Position};

/// Horizontal span of the current piece and the row it would stop at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuideLine {
    /// Leftmost occupied column
    pub left: i32,
    /// Rightmost occupied column
    pub right: i32,
    /// First blocked row under the span (grid height when nothing blocks)
    pub stop_y: i32,
}

/// Whether `piece` at `position` leaves the grid or overlaps a locked block
pub fn has_collision(piece: &Piece, position: Position, grid: &Grid) -> bool {
    let (width, height) = (grid.width() as i32, grid.height() as i32);
    piece.cells_at(position).any(|(x, y)| {
        x < 0 || x >= width || y >= height || (y >= 0 && grid.is_occupied(x, y))
    })
}

/// Lowest position straight below `position` that does not collide
pub fn hard_drop_position(piece: &Piece, position: Position, grid: &Grid) -> Position {
    let mut landing = position;
    while !has_collision(piece, landing.offset(0, 1), grid) {
        landing.y += 1;
    }
    landing
}

/// Span and stop row of the drop guide for `piece` at `position`
pub fn guide_lines(piece: &Piece, position: Position, grid: &Grid) -> GuideLine {
    let (left, right) = piece
        .cells_at(position)
        .fold((i32::MAX, i32::MIN), |(lo, hi), (x, _)| (lo.min(x), hi.max(x)));

    let height = grid.height() as i32;
    let start = position.y + piece.shape().height() as i32;
    let stop_y = (left..=right)
        .map(|x| {
            let mut y = start;
            while y < height && !grid.is_occupied(x, y) {
                y += 1;
            }
            y
        })
        .min()
        .unwrap_or(height);

    GuideLine {
        left,
        right,
        stop_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, GRID_HEIGHT, GRID_WIDTH};
    use crate::piece::PieceColor;
    use crate::tetromino::{Shape, TetrominoType};

    const GRAY: PieceColor = PieceColor { r: 90, g: 90, b: 90 };

    fn piece(kind: TetrominoType) -> Piece {
        Piece::new(kind, Shape::from_matrix(kind, kind.matrix()).unwrap(), GRAY)
    }

    #[test]
    fn test_spawn_is_clear_on_empty_grid() {
        let grid = Grid::new();
        let spawn = Position::new(GRID_WIDTH as i32 / 2 - 1, 0);
        for kind in TetrominoType::all() {
            assert!(!has_collision(&piece(kind), spawn, &grid), "{kind:?}");
        }
    }

    #[test]
    fn test_walls_and_floor_collide() {
        let grid = Grid::new();
        let o = piece(TetrominoType::O);
        assert!(has_collision(&o, Position::new(-1, 5), &grid));
        assert!(has_collision(&o, Position::new(GRID_WIDTH as i32 - 1, 5), &grid));
        assert!(has_collision(&o, Position::new(4, GRID_HEIGHT as i32 - 1), &grid));
        assert!(!has_collision(&o, Position::new(4, GRID_HEIGHT as i32 - 2), &grid));
    }

    #[test]
    fn test_negative_rows_never_collide() {
        let mut grid = Grid::new();
        // Row 0 occupied under the piece's above-grid cells
        grid.set(4, 0, Cell::Filled(GRAY));
        let i = piece(TetrominoType::I).rotated();
        assert!(!has_collision(&i, Position::new(4, -4), &grid));
        assert!(has_collision(&i, Position::new(4, -3), &grid));
        // Still bounded horizontally above the grid
        assert!(has_collision(&i, Position::new(-1, -4), &grid));
    }

    #[test]
    fn test_locked_block_collides() {
        let mut grid = Grid::new();
        grid.set(5, 10, Cell::Filled(GRAY));
        let t = piece(TetrominoType::T);
        assert!(has_collision(&t, Position::new(4, 9), &grid));
        assert!(!has_collision(&t, Position::new(4, 7), &grid));
    }

    #[test]
    fn test_hard_drop_to_floor() {
        let grid = Grid::new();
        let i = piece(TetrominoType::I);
        assert_eq!(
            hard_drop_position(&i, Position::new(4, 0), &grid),
            Position::new(4, GRID_HEIGHT as i32 - 1)
        );
    }

    #[test]
    fn test_hard_drop_onto_stack() {
        let mut grid = Grid::new();
        grid.set(5, 15, Cell::Filled(GRAY));
        let o = piece(TetrominoType::O);
        assert_eq!(
            hard_drop_position(&o, Position::new(4, 0), &grid),
            Position::new(4, 13)
        );
    }

    #[test]
    fn test_guide_lines_empty_grid() {
        let grid = Grid::new();
        let guide = guide_lines(&piece(TetrominoType::T), Position::new(4, 0), &grid);
        assert_eq!(
            guide,
            GuideLine {
                left: 4,
                right: 6,
                stop_y: GRID_HEIGHT as i32
            }
        );
    }

    #[test]
    fn test_guide_lines_stop_at_nearest_obstruction() {
        let mut grid = Grid::new();
        grid.set(4, 12, Cell::Filled(GRAY));
        grid.set(6, 8, Cell::Filled(GRAY));
        // Outside the span, ignored
        grid.set(7, 3, Cell::Filled(GRAY));
        let guide = guide_lines(&piece(TetrominoType::L), Position::new(4, 0), &grid);
        assert_eq!(guide.left, 4);
        assert_eq!(guide.right, 6);
        assert_eq!(guide.stop_y, 8);
    }
}
