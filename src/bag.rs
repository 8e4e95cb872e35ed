//! Piece randomizers
//!
//! The session draws every new piece from a [`PieceSource`]. The default is a
//! uniform pick over all 7 kinds; a 7-bag shuffle and a scripted queue (for
//! tests and replays of a fixed sequence) are also provided.

use crate::tetromino::TetrominoType;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Anything that can hand out piece kinds
pub trait PieceSource {
    fn next_kind(&mut self) -> TetrominoType;

    /// The next `count` kinds `next_kind` will return, without drawing them
    fn peek(&self, count: usize) -> Vec<TetrominoType>;
}

/// Which randomizer to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Randomizer {
    #[default]
    Uniform,
    Bag,
}

impl Randomizer {
    /// Build a boxed source, seeded from the OS when `seed` is None
    pub fn build(self, seed: Option<u64>) -> Box<dyn PieceSource> {
        let seed = seed.unwrap_or_else(rand::random);
        match self {
            Randomizer::Uniform => Box::new(UniformSource::with_seed(seed)),
            Randomizer::Bag => Box::new(Bag::with_seed(seed)),
        }
    }
}

/// Every kind equally likely on every draw
#[derive(Debug, Clone)]
pub struct UniformSource {
    rng: ChaCha8Rng,
}

impl UniformSource {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl PieceSource for UniformSource {
    fn next_kind(&mut self) -> TetrominoType {
        TetrominoType::from_index(self.rng.gen_range(0..7))
    }

    fn peek(&self, count: usize) -> Vec<TetrominoType> {
        let mut ahead = self.clone();
        (0..count).map(|_| ahead.next_kind()).collect()
    }
}

/// The 7-bag piece randomizer
///
/// All 7 pieces are shuffled and dealt out before reshuffling.
#[derive(Debug, Clone)]
pub struct Bag {
    /// Preview queue for upcoming pieces
    queue: VecDeque<TetrominoType>,
    rng: ChaCha8Rng,
}

impl Bag {
    pub fn with_seed(seed: u64) -> Self {
        let mut bag = Self {
            queue: VecDeque::with_capacity(14),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        bag.refill();
        bag
    }

    /// Preview the next N pieces without removing them
    pub fn preview(&self, count: usize) -> Vec<TetrominoType> {
        if count <= self.queue.len() {
            return self.queue.iter().take(count).copied().collect();
        }
        // Past the queued bags: deal from a copy so the shuffles match
        let mut ahead = self.clone();
        (0..count).map(|_| ahead.next_kind()).collect()
    }

    /// Append a new shuffled bag
    fn refill(&mut self) {
        let mut new_bag = TetrominoType::all();
        new_bag.shuffle(&mut self.rng);
        self.queue.extend(new_bag);
    }
}

impl PieceSource for Bag {
    fn next_kind(&mut self) -> TetrominoType {
        loop {
            if let Some(kind) = self.queue.pop_front() {
                // Keep at least a full bag visible to preview()
                if self.queue.len() < 7 {
                    self.refill();
                }
                return kind;
            }
            self.refill();
        }
    }

    fn peek(&self, count: usize) -> Vec<TetrominoType> {
        self.preview(count)
    }
}

/// Plays back a fixed list of kinds, cycling when it runs out
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: Vec<TetrominoType>,
    cursor: usize,
}

impl ScriptedSource {
    /// # Panics
    /// If `script` is empty.
    pub fn new(script: impl Into<Vec<TetrominoType>>) -> Self {
        let script = script.into();
        assert!(!script.is_empty(), "scripted piece source needs at least one kind");
        Self { script, cursor: 0 }
    }
}

impl PieceSource for ScriptedSource {
    fn next_kind(&mut self) -> TetrominoType {
        let kind = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        kind
    }

    fn peek(&self, count: usize) -> Vec<TetrominoType> {
        (self.cursor..self.cursor + count)
            .map(|i| self.script[i % self.script.len()])
            .collect()
    }
}
