//! Terminal front end for the board engine.
//!
//! Renders an [`EngineSnapshot`](crate::core::EngineSnapshot) into a simple
//! framebuffer of styled cells and flushes it to the terminal with crossterm.
//! Reward effects (milestone banner, fireworks) draw on top of the same buffer.
//!
//! Everything except [`TerminalRenderer`] is pure and unit-tested.

pub mod effects;
pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tetris_board_core as core;
pub use tetris_board_types as types;

pub use effects::{Fireworks, Particle, RewardBanner, Rewards, EFFECT_DURATION};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, BoardLayout, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
