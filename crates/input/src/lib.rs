//! Terminal input.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] and provides a
//! held-key handler (delayed auto-shift, soft drop hold) that works in
//! terminals without key-release events.

pub mod handler;
pub mod map;

pub use tetris_board_types as types;

pub use handler::{HorizontalDirection, InputHandler};
pub use map::{handle_key_event, is_held_action, should_quit};
