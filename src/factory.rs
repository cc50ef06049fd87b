//! Piece generation
//!
//! Every draw picks one of the catalog shapes uniformly and independently, so
//! streaks of the same piece can happen. There is no bag.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::piece::{Piece, PieceColor};
use crate::tetromino::{CATALOG_SIZE, Catalog};

/// Where the game draws its pieces from
pub trait PieceSource {
    fn next_piece(&mut self) -> Piece;
}

/// Uniform random piece generator with random colors
#[derive(Debug, Clone)]
pub struct PieceFactory {
    catalog: Catalog,
    rng: ChaCha8Rng,
}

impl PieceFactory {
    /// Create a factory seeded from system entropy
    pub fn new(catalog: Catalog) -> Self {
        Self::with_seed(catalog, rand::random())
    }

    /// Create a factory with a fixed seed (reproducible sequences)
    pub fn with_seed(catalog: Catalog, seed: u64) -> Self {
        Self {
            catalog,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn random_color(&mut self) -> PieceColor {
        PieceColor::new(
            self.rng.gen_range(0..255),
            self.rng.gen_range(0..255),
            self.rng.gen_range(0..255),
        )
    }
}

impl PieceSource for PieceFactory {
    fn next_piece(&mut self) -> Piece {
        let index = self.rng.gen_range(0..CATALOG_SIZE);
        let color = self.random_color();
        let (kind, shape) = self.catalog.entry(index);
        Piece::new(kind, shape.clone(), color)
    }
}

/// Replays a fixed list of pieces in order, wrapping around at the end
#[derive(Debug, Clone)]
pub struct SequenceSource {
    pieces: Vec<Piece>,
    cursor: usize,
}

impl SequenceSource {
    /// Returns None for an empty list
    pub fn new(pieces: Vec<Piece>) -> Option<Self> {
        if pieces.is_empty() {
            return None;
        }
        Some(Self { pieces, cursor: 0 })
    }
}

impl PieceSource for SequenceSource {
    fn next_piece(&mut self) -> Piece {
        let piece = self.pieces[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.pieces.len();
        piece
    }
}
