//! Tetris board (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof so the binary, integration
//! tests and benches can use `tetris_board::{core,input,term,types}`.

pub use tetris_board_core as core;
pub use tetris_board_input as input;
pub use tetris_board_term as term;
pub use tetris_board_types as types;
