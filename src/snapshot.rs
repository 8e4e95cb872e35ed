//! Read-only views of a running session for renderers

use crate::game::{Game, GameState, QUEUE_PREVIEW};
use crate::piece::Piece;
use crate::tetromino::{Rotation, TetrominoType};
use serde::{Deserialize, Serialize};

/// Where a piece is and which cells it covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceView {
    pub kind: TetrominoType,
    pub rotation: Rotation,
    pub col: i32,
    pub row: f64,
    /// Absolute (col, row) of each block
    pub cells: [(i32, i32); 4],
    pub color: u8,
}

impl From<&Piece> for PieceView {
    fn from(piece: &Piece) -> Self {
        Self {
            kind: piece.piece_type,
            rotation: piece.rotation,
            col: piece.col,
            row: piece.row,
            cells: piece.cells(),
            color: piece.piece_type.color_index(),
        }
    }
}

/// Everything a front-end needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub width: usize,
    pub height: usize,
    /// Colour index per cell, top row first
    pub cells: Vec<Vec<Option<u8>>>,
    pub current: PieceView,
    pub ghost_row: i32,
    pub next: PieceView,
    /// Kinds after `next`
    pub queue: Vec<TetrominoType>,
    pub held: Option<PieceView>,
    pub hold_used: bool,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub rows_to_next_level: u32,
    pub state: GameState,
    pub last_score: Option<u64>,
}

impl GameSnapshot {
    pub fn capture(game: &Game) -> Self {
        let board = &game.board;
        Self {
            width: board.width(),
            height: board.height(),
            cells: board
                .rows()
                .map(|row| row.iter().map(|cell| cell.color()).collect())
                .collect(),
            current: game.current().into(),
            ghost_row: game.ghost_row(),
            next: game.next().into(),
            queue: game.preview(QUEUE_PREVIEW),
            held: game.held().map(PieceView::from),
            hold_used: game.hold_used(),
            score: game.score.points,
            level: game.score.level,
            lines: game.score.lines,
            rows_to_next_level: game.score.rows_to_next_level(),
            state: game.state(),
            last_score: game.last_score(),
        }
    }
}
