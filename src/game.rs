//! Core game state and logic
//!
//! [`Game`] owns the board, the current/next/held pieces and the score, and
//! advances one logical step per call to [`Game::step`]. Within a step the
//! inputs are handled in a fixed order:
//!
//! 1. hold (ends the step when it happens)
//! 2. hard drop (locks and ends the step)
//! 3. gravity or soft drop
//! 4. one column left/right
//! 5. rotation
//! 6. lock if the piece cannot fall one more row

use crate::bag::{PieceSource, Randomizer};
use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Board};
use crate::input::InputFrame;
use crate::piece::Piece;
use crate::score::Score;
use crate::snapshot::GameSnapshot;
use crate::srs::{RotateOutcome, try_rotate};
use crate::tetromino::{RotationDirection, TetrominoType};
use serde::{Deserialize, Serialize};
use std::mem;

/// Side length of the hold and next preview frames
pub const PREVIEW_SIZE: i32 = 4;

/// Kinds after `next` exposed to renderers
pub const QUEUE_PREVIEW: usize = 5;

/// Dimensions the session is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Frame the held and next pieces are centered in
    pub preview_size: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            preview_size: PREVIEW_SIZE,
        }
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Built but never started
    Ready,
    Playing,
    /// Topped out; everything but the last score has been reset
    GameOver,
}

/// Result of a hold request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldOutcome {
    /// Nothing was held; the current piece went into hold
    Stashed,
    /// Current and held pieces traded places
    Swapped,
    /// Hold was already used by this piece, or the game isn't running
    Rejected,
}

/// What happened during one step, for drivers that play sounds or effects
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepEvents {
    pub hold: Option<HoldOutcome>,
    /// Rows covered by a hard drop
    pub hard_drop: Option<i32>,
    pub rotation: Option<RotateOutcome>,
    pub locked: bool,
    pub lines_cleared: usize,
    pub leveled_up: bool,
    pub game_over: bool,
}

/// The main game struct
pub struct Game {
    /// The game board
    pub board: Board,
    /// Score tracking
    pub score: Score,
    state: GameState,
    config: GameConfig,
    /// Current falling piece
    current: Piece,
    /// Upcoming piece, positioned in the next-preview frame
    next: Piece,
    /// Held piece, positioned in the hold-preview frame
    held: Option<Piece>,
    /// Whether hold has been used this piece
    hold_used: bool,
    /// Final score of the most recent finished game
    last_score: Option<u64>,
    source: Box<dyn PieceSource>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default(), Randomizer::Uniform.build(None))
    }
}

impl Game {
    /// Create a session waiting for [`start`](Self::start)
    pub fn new(config: GameConfig, mut source: Box<dyn PieceSource>) -> Self {
        let current = Self::spawned(Piece::new(source.next_kind()), &config);
        let next = Self::previewed(Piece::new(source.next_kind()), &config);
        Self {
            board: Board::new(config.width, config.height),
            score: Score::new(),
            state: GameState::Ready,
            config,
            current,
            next,
            held: None,
            hold_used: false,
            last_score: None,
            source,
        }
    }

    /// Create a session with a seeded uniform randomizer
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::new(config, Randomizer::Uniform.build(Some(seed)))
    }

    /// Begin a play-through. Restarting a running game resets it first.
    pub fn start(&mut self) {
        if self.state == GameState::Playing {
            self.reset();
        }
        self.state = GameState::Playing;
        tracing::info!(
            current = ?self.current.piece_type,
            next = ?self.next.piece_type,
            "game started"
        );
    }

    /// Clear the board, draw fresh pieces and zero the score.
    /// The last finished score survives.
    pub fn reset(&mut self) {
        self.board.reset();
        self.score.reset();
        self.current = Self::spawned(Piece::new(self.source.next_kind()), &self.config);
        self.next = self.draw_preview();
        self.held = None;
        self.hold_used = false;
    }

    /// Advance the simulation by one logical step
    pub fn step(&mut self, input: &InputFrame) -> StepEvents {
        let mut events = StepEvents::default();
        if self.state != GameState::Playing {
            return events;
        }

        if input.pressed.hold {
            let outcome = self.hold();
            events.hold = Some(outcome);
            if outcome != HoldOutcome::Rejected {
                events.game_over = self.state == GameState::GameOver;
                return events;
            }
        }

        if input.pressed.hard_drop {
            let distance = self.board.drop_distance(&self.current);
            self.current.move_by(0, distance as f64);
            self.score.register_hard_drop(distance as u32);
            events.hard_drop = Some(distance);
            self.lock(&mut events);
            return events;
        }

        let mut d_row = self.score.drop_speed();
        if input.held.soft_drop {
            d_row = 1.0;
            self.score.register_soft_drop_tick();
        }
        if !self.board.collides(&self.current, 0, d_row, 0) {
            self.current.move_by(0, d_row);
        }

        let d_col = if input.held.right {
            1
        } else if input.held.left {
            -1
        } else {
            0
        };
        if d_col != 0 && !self.board.collides(&self.current, d_col, 0.0, 0) {
            self.current.move_by(d_col, 0.0);
            // Resting on something: snap so it can't creep down sub-cell
            if self.board.collides(&self.current, 0, 1.0, 0) {
                self.current.truncate_row();
            }
        }

        if self.current.piece_type.rotates() {
            let direction = if input.pressed.rotate_cw {
                Some(RotationDirection::Clockwise)
            } else if input.pressed.rotate_ccw {
                Some(RotationDirection::CounterClockwise)
            } else {
                None
            };
            if let Some(direction) = direction {
                let outcome = try_rotate(&mut self.current, direction, &self.board);
                if outcome == RotateOutcome::Blocked {
                    tracing::trace!(
                        piece = ?self.current.piece_type,
                        ?direction,
                        "rotation blocked"
                    );
                }
                events.rotation = Some(outcome);
            }
        }

        if self.board.collides(&self.current, 0, 1.0, 0) {
            self.lock(&mut events);
        }

        events
    }

    /// Put the current piece into hold, once per piece
    pub fn hold(&mut self) -> HoldOutcome {
        if self.state != GameState::Playing || self.hold_used {
            return HoldOutcome::Rejected;
        }
        self.hold_used = true;

        let outcome = match self.held.take() {
            None => {
                let fresh = self.draw_preview();
                let next = mem::replace(&mut self.next, fresh);
                let previous = mem::replace(&mut self.current, Self::spawned(next, &self.config));
                self.held = Some(Self::previewed(previous, &self.config));
                HoldOutcome::Stashed
            }
            Some(held) => {
                let previous = mem::replace(&mut self.current, Self::spawned(held, &self.config));
                self.held = Some(Self::previewed(previous, &self.config));
                HoldOutcome::Swapped
            }
        };
        tracing::debug!(?outcome, current = ?self.current.piece_type, "hold");

        self.check_game_over();
        outcome
    }

    /// Lock the current piece and spawn next
    fn lock(&mut self, events: &mut StepEvents) {
        self.current.truncate_row();
        self.board.stamp(&self.current);

        let lines_cleared = self.board.clear_lines();
        let leveled_up = self.score.register_row_clear(lines_cleared);
        tracing::debug!(
            piece = ?self.current.piece_type,
            col = self.current.col,
            row = self.current.grid_row(),
            lines_cleared,
            "piece locked"
        );
        if leveled_up {
            tracing::debug!(
                level = self.score.level,
                speed = self.score.drop_speed(),
                "level up"
            );
        }

        self.hold_used = false;
        let fresh = self.draw_preview();
        let next = mem::replace(&mut self.next, fresh);
        self.current = Self::spawned(next, &self.config);

        events.locked = true;
        events.lines_cleared = lines_cleared;
        events.leveled_up = leveled_up;

        self.check_game_over();
        events.game_over = self.state == GameState::GameOver;
    }

    /// A newly active piece that overlaps the stack gets one chance to sit a
    /// row higher; otherwise the game ends.
    fn check_game_over(&mut self) {
        if !self.board.collides(&self.current, 0, 0.0, 0) {
            return;
        }
        if !self.board.collides(&self.current, 0, -1.0, 0) {
            self.current.move_by(0, -1.0);
            return;
        }

        let final_score = self.score.points;
        tracing::info!(
            score = final_score,
            level = self.score.level,
            lines = self.score.lines,
            "game over"
        );
        self.last_score = Some(final_score);
        self.reset();
        self.state = GameState::GameOver;
    }

    fn draw_preview(&mut self) -> Piece {
        Self::previewed(Piece::new(self.source.next_kind()), &self.config)
    }

    /// Place a piece at the top center of the board
    fn spawned(mut piece: Piece, config: &GameConfig) -> Piece {
        piece.set_top_center(config.width as i32, 0);
        piece
    }

    /// Place a piece, unrotated, in the middle of a preview frame
    fn previewed(mut piece: Piece, config: &GameConfig) -> Piece {
        piece.set_center(config.preview_size, config.preview_size);
        piece.reset_rotation();
        piece
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn held(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    pub fn hold_used(&self) -> bool {
        self.hold_used
    }

    pub fn last_score(&self) -> Option<u64> {
        self.last_score
    }

    /// Kinds that will follow `next`, in order
    pub fn preview(&self, count: usize) -> Vec<TetrominoType> {
        self.source.peek(count)
    }

    /// Row the current piece would land on if hard dropped
    pub fn ghost_row(&self) -> i32 {
        self.current.grid_row() + self.board.drop_distance(&self.current)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::ScriptedSource;
    use crate::board::Cell;
    use crate::input::{Action, Buttons};
    use crate::tetromino::Rotation;

    fn scripted(kinds: &[TetrominoType]) -> Game {
        let mut game = Game::new(GameConfig::default(), Box::new(ScriptedSource::new(kinds)));
        game.start();
        game
    }

    fn fill_row_except(board: &mut Board, row: i32, gaps: &[i32]) {
        for col in 0..board.width() as i32 {
            if !gaps.contains(&col) {
                board.set(col, row, Cell::Filled(1));
            }
        }
    }

    #[test]
    fn test_new_game_waits_for_start() {
        let mut game = Game::with_seed(GameConfig::default(), 3);
        assert_eq!(game.state(), GameState::Ready);
        let row = game.current().row;
        assert_eq!(game.step(&InputFrame::idle()), StepEvents::default());
        assert_eq!(game.current().row, row);
        game.start();
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_spawn_and_preview_positions() {
        let game = scripted(&[TetrominoType::T, TetrominoType::I]);
        assert_eq!(game.current().piece_type, TetrominoType::T);
        assert_eq!((game.current().col, game.current().row), (4, 0.0));
        assert_eq!(game.next().piece_type, TetrominoType::I);
        assert_eq!((game.next().col, game.next().row), (0, 0.0));
        assert!(game.held().is_none());
    }

    #[test]
    fn test_gravity_moves_fractionally() {
        let mut game = scripted(&[TetrominoType::T]);
        game.step(&InputFrame::idle());
        assert!((game.current().row - 0.05).abs() < 1e-9);
        assert_eq!(game.score.points, 0);
    }

    #[test]
    fn test_soft_drop_moves_a_row_and_scores() {
        let mut game = scripted(&[TetrominoType::T]);
        game.step(&InputFrame::hold_down(&[Action::SoftDrop]));
        assert_eq!(game.current().row, 1.0);
        assert_eq!(game.score.points, 1);
    }

    #[test]
    fn test_horizontal_move_blocked_by_wall() {
        let mut game = scripted(&[TetrominoType::O]);
        for _ in 0..10 {
            game.step(&InputFrame::hold_down(&[Action::MoveLeft]));
        }
        // O's box has an empty first column, so it stops at col -1
        assert_eq!(game.current().col, -1);
    }

    #[test]
    fn test_right_wins_over_left() {
        let mut game = scripted(&[TetrominoType::T]);
        game.step(&InputFrame::hold_down(&[Action::MoveLeft, Action::MoveRight]));
        assert_eq!(game.current().col, 5);
    }

    #[test]
    fn test_rotation_uses_fresh_press_only() {
        let mut game = scripted(&[TetrominoType::T]);
        let events = game.step(&InputFrame::tap(&[Action::RotateCW]));
        assert_eq!(events.rotation, Some(RotateOutcome::InPlace));
        assert_eq!(game.current().rotation, Rotation::East);

        let events = game.step(&InputFrame::hold_down(&[Action::RotateCW]));
        assert_eq!(events.rotation, None);
        assert_eq!(game.current().rotation, Rotation::East);
    }

    #[test]
    fn test_o_piece_skips_rotation() {
        let mut game = scripted(&[TetrominoType::O]);
        let events = game.step(&InputFrame::tap(&[Action::RotateCCW]));
        assert_eq!(events.rotation, None);
        assert_eq!(game.current().rotation, Rotation::North);
    }

    #[test]
    fn test_hard_drop_o_lands_on_floor() {
        let mut game = scripted(&[TetrominoType::O, TetrominoType::T]);
        assert_eq!(game.ghost_row(), 22);

        let events = game.step(&InputFrame::tap(&[Action::HardDrop]));
        assert_eq!(events.hard_drop, Some(22));
        assert!(events.locked);
        assert_eq!(events.lines_cleared, 0);
        assert_eq!(game.score.points, 44);
        for (col, row) in [(4, 22), (5, 22), (4, 23), (5, 23)] {
            assert_eq!(game.board.get(col, row), Some(Cell::Filled(3)));
        }
        assert_eq!(game.current().piece_type, TetrominoType::T);
        assert_eq!(game.current().row, 0.0);
    }

    #[test]
    fn test_hard_drop_clears_lines_and_shifts() {
        let mut game = scripted(&[TetrominoType::O]);
        fill_row_except(&mut game.board, 23, &[4, 5]);
        fill_row_except(&mut game.board, 22, &[4, 5]);
        game.board.set(0, 21, Cell::Filled(6));

        let events = game.step(&InputFrame::tap(&[Action::HardDrop]));
        assert_eq!(events.lines_cleared, 2);
        assert_eq!(game.score.lines, 2);
        assert_eq!(game.score.points, 44 + 100);
        assert_eq!(game.board.get(0, 23), Some(Cell::Filled(6)));
        assert_eq!(game.board.get(1, 23), Some(Cell::Empty));
    }

    #[test]
    fn test_sideways_onto_ledge_snaps_row() {
        let mut game = scripted(&[TetrominoType::I]);
        // Vertical I in column 5, falling fractionally
        game.step(&InputFrame::tap(&[Action::RotateCW]));
        assert_eq!(game.current().rotation, Rotation::East);
        assert!((game.current().row - 0.05).abs() < 1e-9);

        // Column 6 has a block right under where the I would rest
        game.board.set(6, 4, Cell::Filled(2));
        let frame = InputFrame {
            held: Buttons::from_actions(&[Action::MoveRight, Action::RotateCCW]),
            pressed: Buttons::from_actions(&[Action::RotateCCW]),
        };
        let events = game.step(&frame);

        // Turning flat lifts it off the ledge, so it keeps falling from a whole row
        assert_eq!(events.rotation, Some(RotateOutcome::InPlace));
        assert!(!events.locked);
        assert_eq!(game.current().rotation, Rotation::North);
        assert_eq!(game.current().col, 4);
        assert_eq!(game.current().row, 0.0);
    }

    #[test]
    fn test_sideways_in_open_air_keeps_fraction() {
        let mut game = scripted(&[TetrominoType::T]);
        game.step(&InputFrame::hold_down(&[Action::MoveLeft]));
        assert_eq!(game.current().col, 3);
        assert!((game.current().row - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_prefilled_rows_clear_with_the_lock() {
        let mut game = scripted(&[TetrominoType::O]);
        for row in 19..24 {
            fill_row_except(&mut game.board, row, &[]);
        }

        let events = game.step(&InputFrame::tap(&[Action::HardDrop]));
        assert_eq!(events.hard_drop, Some(17));
        assert_eq!(events.lines_cleared, 5);
        assert!(events.leveled_up);
        assert_eq!(game.score.points, 34 + 1200);
        assert_eq!(game.score.lines, 5);
        assert_eq!(game.board.get(4, 23), Some(Cell::Filled(3)));
        assert_eq!(game.board.get(5, 22), Some(Cell::Filled(3)));
    }

    #[test]
    fn test_preview_follows_next() {
        let mut game = scripted(&[TetrominoType::J, TetrominoType::L, TetrominoType::S]);
        assert_eq!(game.next().piece_type, TetrominoType::L);
        assert_eq!(
            game.preview(3),
            [TetrominoType::S, TetrominoType::J, TetrominoType::L]
        );
        game.step(&InputFrame::tap(&[Action::HardDrop]));
        assert_eq!(game.next().piece_type, TetrominoType::S);
        assert_eq!(game.preview(1), [TetrominoType::J]);
    }

    #[test]
    fn test_piece_locks_once_it_cannot_fall() {
        let mut game = scripted(&[TetrominoType::O, TetrominoType::S]);
        let mut locked = false;
        for _ in 0..30 {
            let events = game.step(&InputFrame::hold_down(&[Action::SoftDrop]));
            if events.locked {
                locked = true;
                break;
            }
        }
        assert!(locked);
        assert_eq!(game.board.get(4, 23), Some(Cell::Filled(3)));
        assert_eq!(game.current().piece_type, TetrominoType::S);
        assert!(!game.hold_used());
    }

    #[test]
    fn test_hold_then_swap() {
        let mut game = scripted(&[TetrominoType::T, TetrominoType::I, TetrominoType::Z]);
        game.step(&InputFrame::tap(&[Action::RotateCW]));

        assert_eq!(game.hold(), HoldOutcome::Stashed);
        let held = game.held().unwrap();
        assert_eq!(held.piece_type, TetrominoType::T);
        assert_eq!(held.rotation, Rotation::North);
        assert_eq!((held.col, held.row), (1, 1.0));
        assert_eq!(game.current().piece_type, TetrominoType::I);
        assert_eq!((game.current().col, game.current().row), (3, 0.0));
        assert_eq!(game.next().piece_type, TetrominoType::Z);

        // Lock the I so hold is available again
        game.step(&InputFrame::tap(&[Action::HardDrop]));
        assert_eq!(game.current().piece_type, TetrominoType::Z);
        assert_eq!(game.hold(), HoldOutcome::Swapped);
        assert_eq!(game.current().piece_type, TetrominoType::T);
        assert_eq!(game.held().unwrap().piece_type, TetrominoType::Z);
    }

    #[test]
    fn test_second_hold_is_rejected() {
        let mut game = scripted(&[TetrominoType::J, TetrominoType::L, TetrominoType::S]);
        let events = game.step(&InputFrame::tap(&[Action::Hold]));
        assert_eq!(events.hold, Some(HoldOutcome::Stashed));

        let current = game.current().clone();
        let held = game.held().cloned();
        assert_eq!(game.hold(), HoldOutcome::Rejected);
        assert_eq!(game.current(), &current);
        assert_eq!(game.held().cloned(), held);
    }

    #[test]
    fn test_rejected_hold_still_moves() {
        let mut game = scripted(&[TetrominoType::J, TetrominoType::L]);
        game.hold();
        let events = game.step(&InputFrame::tap(&[Action::Hold, Action::MoveRight]));
        assert_eq!(events.hold, Some(HoldOutcome::Rejected));
        assert_eq!(game.current().col, 5);
    }

    #[test]
    fn test_spawn_overlap_shifts_up_once() {
        let mut game = scripted(&[TetrominoType::I]);
        fill_row_except(&mut game.board, 1, &[0]);

        assert_eq!(game.hold(), HoldOutcome::Stashed);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.current().row, -1.0);
        assert!(!game.board.collides(game.current(), 0, 0.0, 0));
    }

    #[test]
    fn test_spawn_into_full_top_is_game_over() {
        let mut game = scripted(&[TetrominoType::O]);
        for row in 1..BOARD_HEIGHT as i32 {
            fill_row_except(&mut game.board, row, &[0]);
        }
        game.score.points = 321;

        let events = game.step(&InputFrame::tap(&[Action::Hold]));
        assert!(events.game_over);
        assert!(game.is_game_over());
        assert_eq!(game.last_score(), Some(321));
        assert!(game.board.is_empty());
        assert_eq!(game.score, Score::default());
        assert!(game.held().is_none());

        // Steps are ignored until the driver starts a new game
        assert_eq!(game.step(&InputFrame::tap(&[Action::HardDrop])), StepEvents::default());
        game.start();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.last_score(), Some(321));
    }

    #[test]
    fn test_restart_while_playing_resets() {
        let mut game = scripted(&[TetrominoType::O]);
        game.step(&InputFrame::tap(&[Action::HardDrop]));
        assert!(!game.board.is_empty());
        game.start();
        assert!(game.board.is_empty());
        assert_eq!(game.score.points, 0);
        assert_eq!(game.last_score(), None);
    }
}
