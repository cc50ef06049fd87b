//! Core game state and logic
//!
//! `GameSession` owns the grid and both piece slots and is only changed
//! through the operations below. Each call runs to completion; the host
//! serializes ticks and input so nothing here is reentrant.

use tracing::{debug, info, trace};

use crate::board::{BlockOut, Cell, GRID_WIDTH, Grid};
use crate::collision::{GuideLine, guide_lines, hard_drop_position, has_collision};
use crate::factory::PieceSource;
use crate::piece::{Piece, Position};
use crate::score::Score;

/// Where every new piece is anchored
pub const SPAWN_POSITION: Position = Position {
    x: GRID_WIDTH as i32 / 2 - 1,
    y: 0,
};

/// Reference gravity period in milliseconds
pub const DEFAULT_TICK_MS: u64 = 1500;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    NotStarted,
    Running,
    GameOver,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    Start,
    Abort,
}

/// The main game struct
#[derive(Debug, Clone)]
pub struct GameSession<S> {
    /// Locked blocks only; the falling piece is not part of it
    grid: Grid,
    /// Current falling piece
    current: Option<Piece>,
    /// Piece shown in the preview, spawned after the next lock
    next: Option<Piece>,
    /// Anchor of the current piece
    position: Position,
    score: Score,
    lifecycle: Lifecycle,
    /// Drop guide for the current piece, None when there is nothing falling
    guide: Option<GuideLine>,
    source: S,
}

impl<S: PieceSource> GameSession<S> {
    /// Create an idle session drawing pieces from `source`
    pub fn new(source: S) -> Self {
        Self {
            grid: Grid::new(),
            current: None,
            next: None,
            position: Position::default(),
            score: Score::new(),
            lifecycle: Lifecycle::NotStarted,
            guide: None,
            source,
        }
    }

    /// Start a fresh game on an empty grid. Valid from any state.
    pub fn start(&mut self) {
        self.start_with_grid(Grid::new());
    }

    /// Start a fresh game on a pre-filled grid
    pub fn start_with_grid(&mut self, grid: Grid) {
        let current = self.source.next_piece();
        let next = self.source.next_piece();
        self.score = Score::new();
        self.position = SPAWN_POSITION;

        if has_collision(&current, SPAWN_POSITION, &grid) {
            self.grid = Grid::new();
            self.current = None;
            self.next = None;
            self.guide = None;
            self.lifecycle = Lifecycle::GameOver;
            info!("Spawn blocked at start, game over");
            return;
        }

        self.guide = Some(guide_lines(&current, SPAWN_POSITION, &grid));
        debug!(kind = ?current.kind(), next = ?next.kind(), "Game started");
        self.grid = grid;
        self.current = Some(current);
        self.next = Some(next);
        self.lifecycle = Lifecycle::Running;
        info!("New game running");
    }

    /// Drop everything and go back to the idle state
    pub fn abort(&mut self) {
        if self.lifecycle == Lifecycle::NotStarted {
            return;
        }
        info!(score = self.score.points, "Game aborted");
        self.grid = Grid::new();
        self.current = None;
        self.next = None;
        self.position = Position::default();
        self.guide = None;
        self.lifecycle = Lifecycle::NotStarted;
    }

    /// Gravity step
    pub fn tick(&mut self) -> bool {
        self.move_piece(0, 1)
    }

    /// Try to shift the current piece. Returns true if it moved.
    ///
    /// A blocked downward move locks the piece, clears rows and spawns the
    /// next piece before returning.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        if self.lifecycle != Lifecycle::Running {
            return false;
        }
        let Some(piece) = &self.current else {
            return false;
        };

        let candidate = self.position.offset(dx, dy);
        if !has_collision(piece, candidate, &self.grid) {
            self.guide = Some(guide_lines(piece, candidate, &self.grid));
            self.position = candidate;
            return true;
        }

        if dy > 0 {
            self.lock_current();
        }
        false
    }

    /// Rotate clockwise in place. No wall kicks: a colliding result is rejected.
    pub fn rotate(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Running {
            return false;
        }
        let Some(piece) = &self.current else {
            return false;
        };

        let rotated = piece.rotated();
        if has_collision(&rotated, self.position, &self.grid) {
            trace!(
                kind = ?rotated.kind(),
                x = self.position.x,
                y = self.position.y,
                "Rotation rejected"
            );
            return false;
        }

        self.guide = Some(guide_lines(&rotated, self.position, &self.grid));
        self.current = Some(rotated);
        true
    }

    /// Drop to the landing row and lock immediately
    pub fn hard_drop(&mut self) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }
        let Some(piece) = &self.current else {
            return;
        };

        self.position = hard_drop_position(piece, self.position, &self.grid);
        // The landing row is blocked below, so this always locks
        self.move_piece(0, 1);
    }

    /// Process an action
    pub fn process_action(&mut self, action: Action) {
        match action {
            Action::MoveLeft => {
                self.move_piece(-1, 0);
            }
            Action::MoveRight => {
                self.move_piece(1, 0);
            }
            Action::SoftDrop => {
                self.move_piece(0, 1);
            }
            Action::HardDrop => self.hard_drop(),
            Action::Rotate => {
                self.rotate();
            }
            Action::Start => self.start(),
            Action::Abort => self.abort(),
        }
    }

    /// Lock the current piece, clear rows and spawn the next one
    fn lock_current(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };

        match self.grid.with_piece(&piece, self.position) {
            Err(BlockOut { row }) => {
                self.current = Some(piece);
                self.guide = None;
                self.lifecycle = Lifecycle::GameOver;
                info!(row, score = self.score.points, "Locked above the grid, game over");
            }
            Ok(locked) => {
                let (grid, cleared) = locked.clear_completed_rows();
                self.grid = grid;
                let awarded = self.score.add_clear(cleared);
                debug!(
                    kind = ?piece.kind(),
                    x = self.position.x,
                    y = self.position.y,
                    cleared,
                    awarded,
                    score = self.score.points,
                    "Piece locked"
                );
                self.spawn_next();
            }
        }
    }

    /// Promote the preview piece and draw a new preview
    fn spawn_next(&mut self) {
        let piece = match self.next.take() {
            Some(piece) => piece,
            None => self.source.next_piece(),
        };
        self.next = Some(self.source.next_piece());
        self.position = SPAWN_POSITION;

        if has_collision(&piece, SPAWN_POSITION, &self.grid) {
            self.current = Some(piece);
            self.guide = None;
            self.lifecycle = Lifecycle::GameOver;
            info!(score = self.score.points, lines = self.score.lines, "Spawn blocked, game over");
            return;
        }

        self.guide = Some(guide_lines(&piece, SPAWN_POSITION, &self.grid));
        debug!(kind = ?piece.kind(), color = %piece.color(), "Spawned piece");
        self.current = Some(piece);
    }
}

impl<S> GameSession<S> {
    /// Locked blocks without the falling piece
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Grid with the current piece drawn in, for display
    pub fn display_grid(&self) -> Grid {
        let mut grid = self.grid.clone();
        if let Some(piece) = &self.current {
            let cell = Cell::Filled(piece.color());
            for (x, y) in piece.cells_at(self.position) {
                grid.set(x, y, cell);
            }
        }
        grid
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn next_piece(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn score(&self) -> u64 {
        self.score.points
    }

    pub fn lines(&self) -> u32 {
        self.score.lines
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn guide_line(&self) -> Option<GuideLine> {
        self.guide
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{PieceFactory, SequenceSource};
    use crate::piece::PieceColor;
    use crate::tetromino::{Catalog, Shape, TetrominoType};

    fn piece(kind: TetrominoType) -> Piece {
        let shape = Shape::from_matrix(kind, kind.matrix()).unwrap();
        Piece::new(kind, shape, PieceColor::new(0, 128, 255))
    }

    fn session(kinds: &[TetrominoType]) -> GameSession<SequenceSource> {
        let pieces = kinds.iter().map(|&kind| piece(kind)).collect();
        GameSession::new(SequenceSource::new(pieces).unwrap())
    }

    #[test]
    fn test_new_session_is_idle() {
        let game = session(&[TetrominoType::T]);
        assert_eq!(game.lifecycle(), Lifecycle::NotStarted);
        assert!(game.current_piece().is_none());
        assert!(game.guide_line().is_none());
    }

    #[test]
    fn test_start_spawns_current_and_next() {
        let mut game = session(&[TetrominoType::T, TetrominoType::S]);
        game.start();
        assert_eq!(game.lifecycle(), Lifecycle::Running);
        assert_eq!(game.position(), Position::new(4, 0));
        assert_eq!(game.current_piece().unwrap().kind(), TetrominoType::T);
        assert_eq!(game.next_piece().unwrap().kind(), TetrominoType::S);
        assert_eq!(game.score(), 0);
        assert!(game.guide_line().is_some());
    }

    #[test]
    fn test_actions_ignored_before_start() {
        let mut game = session(&[TetrominoType::O]);
        assert!(!game.move_piece(1, 0));
        assert!(!game.rotate());
        assert!(!game.tick());
        game.hard_drop();
        assert_eq!(game.lifecycle(), Lifecycle::NotStarted);
    }

    #[test]
    fn test_guide_follows_moves() {
        let mut game = session(&[TetrominoType::O]);
        game.start();
        assert!(game.move_piece(-1, 0));
        let guide = game.guide_line().unwrap();
        assert_eq!((guide.left, guide.right), (3, 4));
    }

    #[test]
    fn test_hard_drop_locks_and_spawns() {
        let mut game = session(&[TetrominoType::O, TetrominoType::T]);
        game.start();
        game.hard_drop();
        assert!(game.grid().is_occupied(4, 19));
        assert!(game.grid().is_occupied(5, 18));
        assert_eq!(game.current_piece().unwrap().kind(), TetrominoType::T);
        assert_eq!(game.next_piece().unwrap().kind(), TetrominoType::O);
        assert_eq!(game.position(), SPAWN_POSITION);
        assert!(game.is_running());
    }

    #[test]
    fn test_display_grid_overlays_current_piece() {
        let mut game = session(&[TetrominoType::O]);
        game.start();
        let display = game.display_grid();
        assert_eq!(display.get(4, 0), Some(Cell::Filled(PieceColor::new(0, 128, 255))));
        assert!(!game.grid().is_occupied(4, 0));
    }

    #[test]
    fn test_abort_resets_to_idle() {
        let mut game = session(&[TetrominoType::I]);
        game.start();
        game.hard_drop();
        game.abort();
        assert_eq!(game.lifecycle(), Lifecycle::NotStarted);
        assert!(game.grid().is_empty());
        assert!(game.current_piece().is_none());
        assert!(game.next_piece().is_none());
    }

    #[test]
    fn test_process_action_dispatch() {
        let mut game = session(&[TetrominoType::T]);
        game.process_action(Action::Start);
        game.process_action(Action::MoveRight);
        assert_eq!(game.position(), Position::new(5, 0));
        game.process_action(Action::SoftDrop);
        assert_eq!(game.position(), Position::new(5, 1));
        game.process_action(Action::Rotate);
        assert_eq!(game.current_piece().unwrap().shape().width(), 2);
        game.process_action(Action::Abort);
        assert_eq!(game.lifecycle(), Lifecycle::NotStarted);
    }

    #[test]
    fn test_random_session_keeps_running_until_game_over() {
        let catalog = Catalog::standard().unwrap();
        let mut game = GameSession::new(PieceFactory::with_seed(catalog, 99));
        game.start();
        let mut drops = 0;
        while game.is_running() && drops < 500 {
            game.hard_drop();
            drops += 1;
        }
        // Hard-dropping everything at spawn tops out quickly
        assert_eq!(game.lifecycle(), Lifecycle::GameOver);
    }
}
