//! Rotation with wall kicks
//!
//! A rotation is first tried in place. If that collides, the kick offsets for
//! the piece's class, the direction, and the *current* rotation state are
//! tried in order and the first one that fits wins.

use crate::board::Board;
use crate::piece::Piece;
use crate::tetromino::{Rotation, RotationDirection, TetrominoType};
use serde::{Deserialize, Serialize};

/// A (col, row) translation tried together with a rotation
pub type Kick = (i32, i32);

/// Which kick table a piece uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceClass {
    I,
    Standard,
}

/// Kick class per kind, in catalog order
const CLASS_OF: [PieceClass; 7] = [
    PieceClass::I,        // I
    PieceClass::Standard, // J
    PieceClass::Standard, // L
    PieceClass::Standard, // O
    PieceClass::Standard, // S
    PieceClass::Standard, // T
    PieceClass::Standard, // Z
];

impl PieceClass {
    pub fn of(piece_type: TetrominoType) -> PieceClass {
        CLASS_OF[piece_type.index()]
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

type KickTable = [[[Kick; 4]; 4]; 2];

/// Clockwise kicks indexed by [class][from rotation]
const CLOCKWISE_KICKS: KickTable = [
    [
        [(-2, 0), (1, 0), (-2, 1), (1, -2)],
        [(-1, 0), (2, 0), (-1, -2), (2, 1)],
        [(2, 0), (-1, 0), (2, -1), (-1, 2)],
        [(1, 0), (-2, 0), (1, 2), (-2, -1)],
    ],
    [
        [(-1, 0), (-1, -1), (0, 2), (-1, 2)],
        [(1, 0), (1, 1), (0, -2), (1, -2)],
        [(1, 0), (1, -1), (0, 2), (1, 2)],
        [(-1, 0), (-1, 1), (0, -2), (-1, -2)],
    ],
];

/// Counter-clockwise kicks indexed by [class][from rotation]
const COUNTER_CLOCKWISE_KICKS: KickTable = [
    [
        [(-1, 0), (2, 0), (-1, -2), (2, 1)],
        [(2, 0), (-1, 0), (2, -1), (-1, 2)],
        [(1, 0), (-2, 0), (1, 2), (-2, -1)],
        [(-2, 0), (1, 0), (-2, 1), (1, -2)],
    ],
    [
        [(1, 0), (1, -1), (0, 2), (1, 2)],
        [(1, 0), (1, 1), (0, -2), (1, -2)],
        [(-1, 0), (-1, -1), (0, 2), (-1, 2)],
        [(-1, 0), (-1, 1), (0, -2), (-1, -2)],
    ],
];

/// Kick candidates for rotating a piece of `class` out of state `from`
pub fn get_wall_kicks(
    class: PieceClass,
    from: Rotation,
    direction: RotationDirection,
) -> &'static [Kick; 4] {
    let table = match direction {
        RotationDirection::Clockwise => &CLOCKWISE_KICKS,
        RotationDirection::CounterClockwise => &COUNTER_CLOCKWISE_KICKS,
    };
    &table[class.index()][from.index()]
}

/// Result of a rotation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotateOutcome {
    /// Rotated where it stood
    InPlace,
    /// Rotated and translated by the kick at `index` in the candidate list
    Kicked { offset: Kick, index: usize },
    /// Every candidate collided; the piece is unchanged
    Blocked,
    /// The piece kind never rotates
    Unsupported,
}

impl RotateOutcome {
    pub fn rotated(&self) -> bool {
        matches!(self, RotateOutcome::InPlace | RotateOutcome::Kicked { .. })
    }
}

/// Try to rotate `piece` one quarter turn in `direction`, using wall kicks
pub fn try_rotate(piece: &mut Piece, direction: RotationDirection, board: &Board) -> RotateOutcome {
    if !piece.piece_type.rotates() {
        return RotateOutcome::Unsupported;
    }

    let delta = direction.delta();
    if !board.collides(piece, 0, 0.0, delta) {
        piece.rotate(delta);
        return RotateOutcome::InPlace;
    }

    let kicks = get_wall_kicks(PieceClass::of(piece.piece_type), piece.rotation, direction);
    for (index, &(d_col, d_row)) in kicks.iter().enumerate() {
        if !board.collides(piece, d_col, d_row as f64, delta) {
            piece.rotate(delta);
            piece.move_by(d_col, d_row as f64);
            return RotateOutcome::Kicked {
                offset: (d_col, d_row),
                index,
            };
        }
    }

    RotateOutcome::Blocked
}
