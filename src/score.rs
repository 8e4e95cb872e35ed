//! Score, level and drop-speed progression

use serde::{Deserialize, Serialize};

/// Points per simultaneous line clear, indexed by lines (0-4)
pub const ROW_SCORE: [u64; 5] = [0, 40, 100, 300, 1200];

/// Points per row of a hard drop
pub const HARD_DROP_MULTIPLIER: u64 = 2;

/// Rows per step gained per level, starting from level 0
pub const DROP_SPEED_INCREMENT: f64 = 0.05;

/// One full row per step
pub const MAX_DROP_SPEED: f64 = 1.0;

/// Cumulative cleared rows needed to leave `level`.
///
/// Grows quadratically: 5, 15, 30, 50, 75, ...
pub fn max_rows_for_level(level: u32) -> u32 {
    let next = level + 1;
    5 * next * (next + 1) / 2
}

/// Rows the active piece falls per step at `level`
pub fn drop_speed(level: u32) -> f64 {
    (DROP_SPEED_INCREMENT * (level as f64 + 1.0)).min(MAX_DROP_SPEED)
}

/// Scoring state for one play-through
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level, starting at 0
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lock that cleared `rows` lines at once.
    /// Returns true if the level went up.
    ///
    /// A single tetromino completes at most 4 rows, but rows that were
    /// already full (filled in through `Game::board`) clear with it. Anything
    /// past 4 scores at the 4-row rate and still counts toward the level.
    pub fn register_row_clear(&mut self, rows: usize) -> bool {
        let tier = rows.min(ROW_SCORE.len() - 1);

        self.lines += rows as u32;
        self.points += ROW_SCORE[tier] * (self.level as u64 + 1);

        let level_up = self.lines >= max_rows_for_level(self.level);
        if level_up {
            self.level += 1;
        }
        level_up
    }

    /// Add score for hard drop (2 points per row)
    pub fn register_hard_drop(&mut self, distance: u32) {
        self.points += distance as u64 * HARD_DROP_MULTIPLIER;
    }

    /// Add score for one step of held soft drop
    pub fn register_soft_drop_tick(&mut self) {
        self.points += 1;
    }

    /// Fall speed for the current level
    pub fn drop_speed(&self) -> f64 {
        drop_speed(self.level)
    }

    /// Lines still needed to reach the next level
    pub fn rows_to_next_level(&self) -> u32 {
        max_rows_for_level(self.level).saturating_sub(self.lines)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
