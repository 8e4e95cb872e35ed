//! Active falling piece geometry
//!
//! A `Piece` knows nothing about the board. Callers probe legality through
//! [`Board::collides`](crate::board::Board::collides) before mutating it.

use crate::tetromino::{Rotation, TetrominoType};
use serde::{Deserialize, Serialize};

/// One occurrence of a tetromino
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// The type of tetromino, fixed for the piece's whole life
    pub piece_type: TetrominoType,
    /// Current rotation state
    pub rotation: Rotation,
    /// Column of the bounding box's left edge
    pub col: i32,
    /// Row of the bounding box's top edge. Fractional while falling;
    /// grid lookups truncate it toward zero.
    pub row: f64,
}

impl Piece {
    /// Create a piece at the origin in its spawn orientation
    pub fn new(piece_type: TetrominoType) -> Self {
        Self {
            piece_type,
            rotation: Rotation::North,
            col: 0,
            row: 0.0,
        }
    }

    /// Translate without any legality check
    pub fn move_by(&mut self, d_col: i32, d_row: f64) {
        self.col += d_col;
        self.row += d_row;
    }

    /// Apply a signed number of quarter turns without any collision check
    pub fn rotate(&mut self, delta: i32) {
        self.rotation = self.rotation.offset(delta);
    }

    /// Drop the fractional part of the row
    pub fn truncate_row(&mut self) {
        self.row = self.row.trunc();
    }

    pub fn reset_rotation(&mut self) {
        self.rotation = Rotation::North;
    }

    /// Put the bounding box's top-left corner at (col, row)
    pub fn set_left_corner(&mut self, col: i32, row: f64) {
        self.col = col;
        self.row = row;
    }

    /// Center the bounding box horizontally on a frame of `width` columns,
    /// with its top edge at `row`
    pub fn set_top_center(&mut self, width: i32, row: i32) {
        let half = self.piece_type.bounding_box() / 2;
        self.set_left_corner(width / 2 - half, row as f64);
    }

    /// Center the bounding box inside a `width` x `height` frame
    pub fn set_center(&mut self, width: i32, height: i32) {
        let half = self.piece_type.bounding_box() / 2;
        self.set_left_corner(width / 2 - half, (height / 2 - half) as f64);
    }

    /// Whole-cell row the piece occupies
    pub fn grid_row(&self) -> i32 {
        self.row as i32
    }

    /// Absolute (col, row) of all 4 blocks at the truncated row
    pub fn cells(&self) -> [(i32, i32); 4] {
        let (col, row) = (self.col, self.grid_row());
        self.piece_type
            .shape(self.rotation)
            .map(|(dc, dr)| (col + dc, row + dr))
    }
}
