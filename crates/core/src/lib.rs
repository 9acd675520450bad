//! Board engine - pure, deterministic, and testable
//!
//! This crate contains the rules of a falling-block puzzle: grid storage,
//! piece shapes and rotation, collision, locking, line clearing, scoring and
//! gravity. It has no dependencies on terminal or input code, so it can be
//! driven by a UI loop, a test, or a benchmark alike.
//!
//! # Module Structure
//!
//! - [`board`]: width x height grid with line clearing
//! - [`pieces`]: the seven tetromino matrices and clockwise rotation
//! - [`engine`]: active piece, collision, lock, gravity and game over
//! - [`rng`]: seedable piece selection (uniform, 7-bag or fixed cycle)
//! - [`scoring`]: line clear points and milestones
//! - [`config`]: engine tuning and validation
//! - [`snapshot`]: read-only engine view for renderers
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tetris_board_core::{BoardEngine, EngineConfig, Randomizer};
//! use tetris_board_core::types::{GameAction, PieceKind};
//!
//! let config = EngineConfig::default()
//!     .with_randomizer(Randomizer::Cycle(vec![PieceKind::O]));
//! let mut engine = BoardEngine::new(config).unwrap();
//!
//! engine.apply_action(GameAction::MoveLeft);
//! engine.apply_action(GameAction::HardDrop);
//! engine.tick(Duration::from_millis(16));
//!
//! assert_eq!(engine.pieces_locked(), 1);
//! assert_eq!(engine.score(), 0);
//! ```
//!
//! # Timing
//!
//! Gravity runs on accumulated time. Call [`BoardEngine::tick`] every frame with
//! the elapsed duration; once more than the drop interval has accumulated the
//! piece steps down one row (500ms by default, 15x faster while soft dropping).

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_board_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::EngineConfig;
pub use engine::{ActivePiece, BoardEngine, LockEvent};
pub use error::{EngineError, Result};
pub use pieces::{base_shape, ShapeMatrix};
pub use rng::{PieceRandomizer, Randomizer};
pub use scoring::{line_clear_score, milestone_crossed, Milestone};
pub use snapshot::EngineSnapshot;
