//! Error types for the board engine.
//!
//! Every engine operation is total once an engine exists; errors only arise
//! while validating construction parameters.

use thiserror::Error;

/// Result type alias for engine construction
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while building a board or an engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Width or height is zero
    #[error("Invalid board dimensions: {width}x{height} (both must be at least 1)")]
    InvalidDimensions {
        /// Requested width
        width: u16,
        /// Requested height
        height: u16,
    },

    /// Gravity would fire on every tick
    #[error("Drop interval must be greater than zero")]
    ZeroDropInterval,

    /// Score scale of zero would make every clear worthless
    #[error("Score scale must be at least 1")]
    ZeroScoreScale,

    /// Soft drop factor divides the drop interval
    #[error("Soft drop factor must be at least 1")]
    ZeroSoftDropFactor,

    /// Cycle randomizer was given no pieces
    #[error("Cycle randomizer needs at least one piece")]
    EmptyCycle,

    /// A prepared board does not match the configured dimensions
    #[error("Board is {actual_width}x{actual_height}, config expects {width}x{height}")]
    BoardSizeMismatch {
        width: u16,
        height: u16,
        actual_width: u16,
        actual_height: u16,
    },

    /// Unrecognized character in a textual board description
    #[error("Invalid cell {ch:?} at row {row}, column {col}")]
    InvalidCell { ch: char, row: usize, col: usize },
}
