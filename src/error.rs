//! Error types for catalog validation and settings persistence

use thiserror::Error;

use crate::tetromino::TetrominoType;

/// A piece catalog entry that cannot be used as a shape matrix
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("shape for {0:?} has no rows or no columns")]
    EmptyShape(TetrominoType),
    #[error("shape for {kind:?}: row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        kind: TetrominoType,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("shape for {kind:?}: cell ({row}, {col}) is {value}, expected 0 or 1")]
    InvalidCell {
        kind: TetrominoType,
        row: usize,
        col: usize,
        value: u8,
    },
    #[error("shape for {0:?} has no occupied cells")]
    NoOccupiedCells(TetrominoType),
    #[error("catalog defines {0} shapes, expected {}", crate::tetromino::CATALOG_SIZE)]
    WrongSize(usize),
}

/// Failure while loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("settings file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
