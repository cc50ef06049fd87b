//! Scoring: a flat 100 points per cleared row

/// Points awarded per cleared row. No multi-line bonus.
pub const POINTS_PER_ROW: u64 = 100;

/// Score tracking for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Total rows cleared
    pub lines: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lock that cleared `rows` rows; returns the points awarded
    pub fn add_clear(&mut self, rows: usize) -> u64 {
        let awarded = rows as u64 * POINTS_PER_ROW;
        self.points += awarded;
        self.lines += rows as u32;
        awarded
    }
}
