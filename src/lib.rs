//! blockfall - a falling-block puzzle engine
//!
//! The engine is a small state machine over a 10x20 grid: pieces spawn at the
//! top, fall one row per tick, lock when they land, and full rows are cleared
//! for 100 points each. [`game::GameSession`] is the entry point; the rest are
//! the pure pieces it is built from.

pub mod board;
pub mod collision;
pub mod error;
pub mod factory;
pub mod game;
pub mod piece;
pub mod score;
pub mod settings;
pub mod tetromino;

pub use board::{Cell, GRID_HEIGHT, GRID_WIDTH, Grid};
pub use collision::GuideLine;
pub use error::{CatalogError, SettingsError};
pub use factory::{PieceFactory, PieceSource, SequenceSource};
pub use game::{Action, GameSession, Lifecycle};
pub use piece::{Piece, PieceColor, Position};
pub use settings::{Settings, SettingsOrigin};
pub use tetromino::{Catalog, Shape, TetrominoType};
