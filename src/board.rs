//! Game board representation and collision detection

use crate::piece::Piece;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 24;

/// Text glyph per colour index; the last one is the border marker
const CELL_GLYPHS: [char; 8] = ['I', 'J', 'L', 'O', 'S', 'T', 'Z', '#'];

/// A cell on the board - either empty or filled with a colour index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(u8),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    pub fn color(&self) -> Option<u8> {
        match self {
            Cell::Empty => None,
            Cell::Filled(color) => Some(*color),
        }
    }
}

/// The game board
///
/// Coordinates are (col, row) with row 0 at the top and `height - 1` the floor.
/// Everything outside the grid counts as occupied, so no piece can ever be
/// placed partly off the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Row-major storage (row * width + col)
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

impl Board {
    /// Create a new empty board
    ///
    /// # Panics
    /// If either dimension is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board must be at least 1x1");
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(row * self.width + col)
    }

    /// Get the cell at (col, row)
    /// Returns None if out of bounds
    pub fn get(&self, col: i32, row: i32) -> Option<Cell> {
        self.index(col, row).map(|idx| self.cells[idx])
    }

    /// Set a cell at (col, row)
    /// Returns false if out of bounds
    pub fn set(&mut self, col: i32, row: i32, cell: Cell) -> bool {
        match self.index(col, row) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// True if (col, row) is outside the grid or filled
    pub fn is_occupied(&self, col: i32, row: i32) -> bool {
        self.get(col, row).is_none_or(|cell| cell.is_filled())
    }

    /// Would `piece` overlap anything after moving by (d_col, d_row) and
    /// turning by `d_rotation` quarter turns? Zero deltas test the piece
    /// where it stands.
    pub fn collides(&self, piece: &Piece, d_col: i32, d_row: f64, d_rotation: i32) -> bool {
        let rotation = piece.rotation.offset(d_rotation);
        let col = piece.col + d_col;
        let row = (piece.row + d_row) as i32;
        piece
            .piece_type
            .shape(rotation)
            .iter()
            .any(|&(dc, dr)| self.is_occupied(col + dc, row + dr))
    }

    /// Write the piece into the grid at its current position
    ///
    /// # Panics
    /// If any block lies outside the grid. In debug builds, also if the
    /// piece overlaps filled cells.
    pub fn stamp(&mut self, piece: &Piece) {
        debug_assert!(
            !self.collides(piece, 0, 0.0, 0),
            "stamping {:?} over occupied cells at ({}, {})",
            piece.piece_type,
            piece.col,
            piece.row
        );
        let color = piece.piece_type.color_index();
        for (col, row) in piece.cells() {
            assert!(
                self.set(col, row, Cell::Filled(color)),
                "stamping {:?} outside the board at ({col}, {row})",
                piece.piece_type
            );
        }
    }

    /// Clear completed lines and return the number cleared
    ///
    /// Rows are scanned bottom to top. A full row is removed by shifting
    /// everything above it down one row, and the same row index is checked
    /// again since new content just slid into it.
    pub fn clear_lines(&mut self) -> usize {
        let mut lines_cleared = 0;
        let mut row = self.height;

        while row > 0 {
            if self.is_row_full(row - 1) {
                self.collapse_row(row - 1);
                lines_cleared += 1;
            } else {
                row -= 1;
            }
        }

        lines_cleared
    }

    /// Remove `row` by shifting every row above it down; the top row empties
    fn collapse_row(&mut self, row: usize) {
        let width = self.width;
        self.cells.copy_within(0..row * width, width);
        self.cells[..width].fill(Cell::Empty);
    }

    /// Check if a line is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        row < self.height && self.row(row).iter().all(|cell| cell.is_filled())
    }

    /// How many whole rows the piece can fall before the next one down collides
    pub fn drop_distance(&self, piece: &Piece) -> i32 {
        let mut distance = 0;
        while !self.collides(piece, 0, (distance + 1) as f64, 0) {
            distance += 1;
        }
        distance
    }

    /// Empty every cell
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }

    /// The cells of one row, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    /// Iterate rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }
}

impl fmt::Display for Board {
    /// One line per row, `.` for empty cells and the piece letter otherwise
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let ch = match cell.color() {
                    None => '.',
                    Some(color) => CELL_GLYPHS.get(color as usize).copied().unwrap_or('?'),
                };
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}
