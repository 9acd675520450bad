//! RNG module - piece selection
//!
//! Three selection rules are supported:
//!
//! - **Uniform**: every draw picks one of the seven kinds with equal odds.
//! - **SevenBag**: one of each kind per shuffled bag of seven.
//! - **Cycle**: a fixed sequence repeated forever (deterministic tests, demos).
//!
//! All randomness comes from a seedable `StdRng`, so the same seed always
//! produces the same game.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::{EngineError, Result};
use crate::types::PieceKind;

/// How the next piece is chosen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Randomizer {
    #[default]
    Uniform,
    SevenBag,
    Cycle(Vec<PieceKind>),
}

impl Randomizer {
    pub fn validate(&self) -> Result<()> {
        match self {
            Randomizer::Cycle(seq) if seq.is_empty() => Err(EngineError::EmptyCycle),
            _ => Ok(()),
        }
    }
}

/// Seeded piece generator
#[derive(Debug, Clone)]
pub struct PieceRandomizer {
    rule: Randomizer,
    rng: StdRng,
    /// Current bag for `SevenBag`
    bag: [PieceKind; 7],
    /// Index into current bag, or into the cycle sequence
    index: usize,
    /// Piece drawn ahead by `peek`
    peeked: Option<PieceKind>,
}

impl PieceRandomizer {
    /// Create a generator; `seed = None` draws a seed from the OS.
    pub fn new(rule: Randomizer, seed: Option<u64>) -> Result<Self> {
        rule.validate()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut randomizer = Self {
            rule,
            rng,
            bag: PieceKind::ALL,
            index: 0,
            peeked: None,
        };
        if randomizer.rule == Randomizer::SevenBag {
            randomizer.refill_bag();
        }
        Ok(randomizer)
    }

    pub fn rule(&self) -> &Randomizer {
        &self.rule
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.bag.shuffle(&mut self.rng);
        self.index = 0;
    }

    /// Draw the next piece
    pub fn draw(&mut self) -> PieceKind {
        match self.peeked.take() {
            Some(piece) => piece,
            None => self.generate(),
        }
    }

    /// Look at the piece the next `draw` will return.
    pub fn peek(&mut self) -> PieceKind {
        match self.peeked {
            Some(piece) => piece,
            None => {
                let piece = self.generate();
                self.peeked = Some(piece);
                piece
            }
        }
    }

    fn generate(&mut self) -> PieceKind {
        match self.rule {
            Randomizer::Uniform => PieceKind::ALL[self.rng.random_range(0..PieceKind::ALL.len())],
            Randomizer::SevenBag => {
                if self.index >= self.bag.len() {
                    self.refill_bag();
                }
                let piece = self.bag[self.index];
                self.index += 1;
                piece
            }
            Randomizer::Cycle(ref seq) => {
                let piece = seq[self.index % seq.len()];
                self.index = (self.index + 1) % seq.len();
                piece
            }
        }
    }
}
