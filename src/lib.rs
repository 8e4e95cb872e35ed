//! STACKFALL - a falling-block puzzle simulation core
//!
//! The crate owns the rules only: the grid, piece geometry and rotation with
//! wall kicks, line clears, hold/next bookkeeping and score/level
//! progression. Rendering, input devices, audio and frame timing belong to
//! whatever drives [`Game::step`].
//!
//! ```
//! use stackfall::{Action, Game, GameConfig, InputFrame};
//!
//! let mut game = Game::with_seed(GameConfig::default(), 42);
//! game.start();
//! game.step(&InputFrame::tap(&[Action::HardDrop]));
//! assert!(game.score.points > 0);
//! ```

pub mod bag;
pub mod board;
pub mod game;
pub mod input;
pub mod piece;
pub mod score;
pub mod settings;
pub mod snapshot;
pub mod srs;
pub mod tetromino;

pub use bag::{Bag, PieceSource, Randomizer, ScriptedSource, UniformSource};
pub use board::{Board, Cell};
pub use game::{Game, GameConfig, GameState, HoldOutcome, StepEvents};
pub use input::{Action, Buttons, InputFrame, InputLatch};
pub use piece::Piece;
pub use score::Score;
pub use settings::Settings;
pub use snapshot::{GameSnapshot, PieceView};
pub use srs::{PieceClass, RotateOutcome, try_rotate};
pub use tetromino::{Rotation, RotationDirection, TetrominoType};
