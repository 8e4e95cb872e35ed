//! Tetromino definitions and shapes
//!
//! All 7 tetrominoes with their 4 rotation states. Offsets are (col, row)
//! relative to the top-left corner of the piece's bounding box, with row
//! increasing downward.

use serde::{Deserialize, Serialize};

/// Number of rotation states every piece cycles through
pub const NUM_ROTATIONS: u8 = 4;

/// Colour index reserved for the border drawn around a grid.
/// Never stored inside a [`Board`](crate::board::Board).
pub const BORDER_COLOR: u8 = 7;

/// The 7 tetromino types, in colour-index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoType {
    I, // Cyan - long bar
    J, // Blue
    L, // Orange
    O, // Yellow - square
    S, // Green
    T, // Purple
    Z, // Red
}

type Shape = [(i32, i32); 4];

/// Cell offsets indexed by [kind][rotation]
const SHAPES: [[Shape; 4]; 7] = [
    // I
    [
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
        [(0, 2), (1, 2), (2, 2), (3, 2)],
        [(1, 0), (1, 1), (1, 2), (1, 3)],
    ],
    // J
    [
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(2, 0), (1, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(0, 2), (1, 2), (1, 1), (1, 0)],
    ],
    // L
    [
        [(0, 1), (1, 1), (2, 1), (2, 0)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 2), (0, 1), (1, 1), (2, 1)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
    // O - every state is the same square
    [
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
    ],
    // S
    [
        [(0, 1), (1, 1), (1, 0), (2, 0)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
        [(0, 2), (1, 2), (1, 1), (2, 1)],
        [(0, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // T
    [
        [(0, 1), (1, 1), (1, 0), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (1, 2), (2, 1)],
        [(1, 0), (1, 1), (0, 1), (1, 2)],
    ],
    // Z
    [
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(2, 0), (2, 1), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (1, 2), (2, 2)],
        [(1, 0), (1, 1), (0, 1), (0, 2)],
    ],
];

/// Bounding-box side length per kind
const BOUNDING_BOX: [i32; 7] = [4, 3, 3, 4, 3, 3, 3];

impl TetrominoType {
    /// Get all tetromino types, in colour-index order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ]
    }

    /// Look up a kind by its colour index.
    ///
    /// # Panics
    /// If `index` is not in `0..7`.
    pub fn from_index(index: usize) -> TetrominoType {
        assert!(index < 7, "tetromino index {index} out of range");
        Self::all()[index]
    }

    /// Position of this kind in the catalog
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Colour index written into the grid when this kind locks
    pub fn color_index(&self) -> u8 {
        *self as u8
    }

    /// Cell offsets for this kind at a given rotation
    pub fn shape(&self, rotation: Rotation) -> &'static [(i32, i32); 4] {
        &SHAPES[self.index()][rotation.index()]
    }

    /// Side length of the square that contains every rotation state
    pub fn bounding_box(&self) -> i32 {
        BOUNDING_BOX[self.index()]
    }

    /// The O piece looks the same in every state and never rotates
    pub fn rotates(&self) -> bool {
        !matches!(self, TetrominoType::O)
    }
}

/// Rotation states, 0 = spawn orientation, each step is a quarter turn clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    North, // Spawn state
    East,  // Clockwise from North
    South, // 180 from North
    West,  // Counter-clockwise from North
}

impl Rotation {
    /// # Panics
    /// If `index` is not in `0..4`.
    pub fn from_index(index: usize) -> Rotation {
        match index {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            3 => Rotation::West,
            _ => panic!("rotation state {index} out of range"),
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Apply a signed number of quarter turns. Positive is clockwise.
    pub fn offset(&self, delta: i32) -> Rotation {
        let n = NUM_ROTATIONS as i32;
        Rotation::from_index((self.index() as i32 + delta).rem_euclid(n) as usize)
    }

    /// Rotate clockwise: North → East → South → West → North
    pub fn cw(&self) -> Rotation {
        self.offset(1)
    }

    /// Rotate counter-clockwise: North → West → South → East → North
    pub fn ccw(&self) -> Rotation {
        self.offset(-1)
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// Quarter-turn delta: +1 clockwise, -1 counter-clockwise
    pub fn delta(&self) -> i32 {
        match self {
            RotationDirection::Clockwise => 1,
            RotationDirection::CounterClockwise => -1,
        }
    }
}
